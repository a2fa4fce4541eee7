//! Rendering of extraction results.

use rust_decimal::Decimal;
use serde::Serialize;

use rcpt_core::refine::{ReceiptSource, Resolution};
use rcpt_core::{ExtractionResult, PaymentMethod, ReceiptData};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing into a directory.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Everything reported for one transcript.
#[derive(Debug, Serialize)]
pub struct ReceiptReport {
    #[serde(flatten)]
    pub receipt: ReceiptData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    pub source: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip)]
    pub processing_time_ms: u64,
}

impl ReceiptReport {
    /// Combine the local extraction with the resolved record.
    pub fn new(local: ExtractionResult, resolution: Resolution) -> Self {
        let source = source_label(&resolution.source);
        let processing_time_ms = local.processing_time_ms;

        // The refined record replaces the local one wholesale, so local-only
        // fields and warnings are dropped with it
        if resolution.source == ReceiptSource::Refined {
            let warnings = resolution
                .receipt
                .missing_fields()
                .into_iter()
                .map(|field| format!("Could not extract {}", field))
                .collect();
            return Self {
                receipt: resolution.receipt,
                time: None,
                subtotal: None,
                payment_method: None,
                source,
                warnings,
                processing_time_ms,
            };
        }

        Self {
            receipt: resolution.receipt,
            time: local.time,
            subtotal: local.subtotal,
            payment_method: local.payment_method,
            source,
            warnings: local.warnings,
            processing_time_ms,
        }
    }
}

pub fn source_label(source: &ReceiptSource) -> String {
    match source {
        ReceiptSource::Local => "local".to_string(),
        ReceiptSource::Refined => "refined".to_string(),
        ReceiptSource::LocalAfterRefinementError(msg) => {
            format!("local (refinement failed: {})", msg)
        }
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn format_report(report: &ReceiptReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &ReceiptReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let receipt = &report.receipt;

    wtr.write_record([
        "vendor",
        "date",
        "time",
        "total",
        "subtotal",
        "tax",
        "currency",
        "payment_method",
        "source",
    ])?;

    wtr.write_record([
        opt(&receipt.vendor),
        opt(&receipt.date),
        opt(&report.time),
        opt(&receipt.total),
        opt(&report.subtotal),
        opt(&receipt.tax),
        opt(&receipt.currency),
        opt(&report.payment_method),
        report.source.clone(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ReceiptReport) -> String {
    let receipt = &report.receipt;
    let currency = receipt.currency.as_deref().unwrap_or("");
    let mut output = String::new();

    output.push_str(&format!("Vendor:   {}\n", receipt.vendor.as_deref().unwrap_or("-")));
    output.push_str(&format!("Date:     {}", receipt.date.as_deref().unwrap_or("-")));
    if let Some(time) = &report.time {
        output.push_str(&format!(" {}", time));
    }
    output.push('\n');

    if let Some(subtotal) = report.subtotal {
        output.push_str(&format!("Subtotal: {} {}\n", subtotal, currency));
    }
    if let Some(tax) = receipt.tax {
        output.push_str(&format!("Tax:      {} {}\n", tax, currency));
    }
    match receipt.total {
        Some(total) => output.push_str(&format!("Total:    {} {}\n", total, currency)),
        None => output.push_str("Total:    -\n"),
    }
    if let Some(method) = &report.payment_method {
        output.push_str(&format!("Payment:  {}\n", method));
    }

    output.push_str(&format!("Source:   {}\n", report.source));
    for warning in &report.warnings {
        output.push_str(&format!("Warning:  {}\n", warning));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rcpt_core::refine::{resolve, RefinedReceipt};
    use rcpt_core::{HeuristicReceiptParser, ReceiptParser};

    fn report(text: &str) -> ReceiptReport {
        let local = HeuristicReceiptParser::new().parse(text);
        let resolution = resolve(local.receipt.clone(), None);
        ReceiptReport::new(local, resolution)
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_report(&report("ACME Market\nTotal 5.00"), OutputFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("vendor,date,time,total"));
        assert!(rows[1].starts_with("ACME Market,,,5.00"));
        assert!(rows[1].ends_with("local"));
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let text = format_report(&report("thank you"), OutputFormat::Text).unwrap();
        assert!(text.contains("Date:     -"));
        assert!(text.contains("Total:    -"));
        assert!(text.contains("Warning:  Could not extract date"));
    }

    #[test]
    fn test_refined_report_recomputes_warnings() {
        let local = HeuristicReceiptParser::new().parse("thank you");
        let refined = RefinedReceipt {
            vendor: Some("ACME".to_string()),
            date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        let resolution = resolve(local.receipt.clone(), Some(Ok(refined)));
        let report = ReceiptReport::new(local, resolution);

        assert_eq!(report.source, "refined");
        assert_eq!(report.warnings, vec!["Could not extract total".to_string()]);
    }
    #[test]
    fn test_refined_report_omits_local_only_fields() {
        let text = "ACME Market\nDate: 04/13/2025 08:15\nSubtotal 4.00\nTotal 5.00\nCash";
        let local = HeuristicReceiptParser::new().parse(text);
        assert!(local.subtotal.is_some());
        assert!(local.time.is_some());

        let refined = RefinedReceipt {
            vendor: Some("Acme".to_string()),
            date: Some("04/13/2025".to_string()),
            total: Some(Decimal::new(900, 2)),
            ..Default::default()
        };
        let resolution = resolve(local.receipt.clone(), Some(Ok(refined)));
        let report = ReceiptReport::new(local, resolution);

        assert_eq!(report.time, None);
        assert_eq!(report.subtotal, None);
        assert_eq!(report.payment_method, None);

        let csv = format_report(&report, OutputFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows[1], "Acme,04/13/2025,,9.00,,,,,refined");

        let text = format_report(&report, OutputFormat::Text).unwrap();
        assert!(!text.contains("Subtotal:"));
        assert!(!text.contains("Payment:"));
    }
}
