//! Remote refinement contract.
//!
//! A chat-completions service can re-read the transcript and return a
//! cleaner record. This module owns everything about that exchange except
//! the HTTP call itself: the prompt, the request body, response decoding and
//! the precedence between the refined and the local record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RefinementError;
use crate::models::config::RefinementConfig;
use crate::models::receipt::ReceiptData;

/// System message sent ahead of the extraction prompt.
pub const SYSTEM_PROMPT: &str =
    "You are a precise receipt data extraction expert. Always return clean, valid JSON only.";

const PROMPT_INSTRUCTIONS: &str = r#"You are an expert receipt OCR parser. The following text comes from noisy mobile OCR (random line breaks, missing spaces, character errors like 0/O, S/5). Extract exactly these fields and return ONLY a valid JSON object.

Extract:
1. Vendor/Store name: the business name at the top or most prominent
2. Total amount: the final amount due/paid (Total, Amount Due, Balance Due, Paid)
3. Tax/VAT amount: Tax, VAT, GST, HST, Sales Tax, MWST, IVA, TVA, BTW
4. Date: prefer the transaction/purchase date
5. Currency: the ISO 4217 currency code (e.g. USD, GBP, EUR, CAD)

Rules:
- Currency: use explicit symbols ($, €, £, ¥) or codes first. Without either, infer it from the address, city, country or phone number format.
- Date format: $ / USD / US-style English uses MM/DD/YYYY; € / £ / other languages use DD/MM/YYYY. If ambiguous, prefer the reading that is a valid date.
- Clean numbers: remove letters stuck to digits ("12O.50" is 120.50). In €/£ contexts a comma is the decimal separator; with $ it separates thousands.
- If the total is not labelled, use the largest amount near the bottom.
- Return numbers as plain decimals (42.90, 1099.00), never with currency symbols or thousands separators.
- If uncertain or missing, use null.

Return ONLY this JSON (no trailing commas, no comments, no explanations):

{
  "vendor": "string or null",
  "total": number or null,
  "tax": number or null,
  "date": "MM/DD/YYYY" or "DD/MM/YYYY" or null,
  "currency": "ISO_CODE" or null
}

OCR Text:
"#;

/// Build the user prompt for a transcript.
pub fn build_prompt(transcript: &str) -> String {
    format!("{}{}", PROMPT_INSTRUCTIONS, transcript)
}

/// Fields returned by the refinement service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedReceipt {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl ChatRequest {
    /// Request asking the service to extract fields from `transcript`.
    pub fn new(config: &RefinementConfig, transcript: &str) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: build_prompt(transcript) },
            ],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Remove a surrounding markdown code fence, if present.
pub fn strip_code_fences(content: &str) -> &str {
    let mut cleaned = content.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Decode a chat-completions response body into refined fields.
pub fn parse_chat_response(body: &str) -> Result<RefinedReceipt, RefinementError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| RefinementError::InvalidJson(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(RefinementError::NoContent)?;

    let cleaned = strip_code_fences(&content);
    debug!("Refinement content: {} characters", cleaned.len());

    serde_json::from_str(cleaned).map_err(|e| RefinementError::InvalidJson(e.to_string()))
}

/// Where the final record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptSource {
    /// Heuristic record; refinement was not attempted.
    Local,
    /// Record from the refinement service.
    Refined,
    /// Heuristic record after refinement failed.
    LocalAfterRefinementError(String),
}

/// The record to report plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub receipt: ReceiptData,
    pub source: ReceiptSource,
}

/// Pick the record to report.
///
/// A successful refinement replaces the local record entirely; any failure
/// keeps the local record.
pub fn resolve(
    local: ReceiptData,
    refined: Option<Result<RefinedReceipt, RefinementError>>,
) -> Resolution {
    match refined {
        None => Resolution { receipt: local, source: ReceiptSource::Local },
        Some(Ok(refined)) => Resolution {
            receipt: ReceiptData::from_refinement(refined, local.raw_text),
            source: ReceiptSource::Refined,
        },
        Some(Err(e)) => {
            warn!("Refinement failed, keeping local result: {}", e);
            Resolution {
                receipt: local,
                source: ReceiptSource::LocalAfterRefinementError(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn body(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn test_prompt_ends_with_transcript() {
        let prompt = build_prompt("ACME\nTOTAL 5.00");
        assert!(prompt.ends_with("OCR Text:\nACME\nTOTAL 5.00"));
        assert!(prompt.contains("MM/DD/YYYY"));
    }

    #[test]
    fn test_request_body() {
        let config = RefinementConfig::default();
        let request = ChatRequest::new(&config, "ACME");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["top_p"], 1.0);
        assert_eq!(json["presence_penalty"], 0.0);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_parse_fenced_response() {
        let content = "```json\n{\"vendor\": \"ACME\", \"total\": 42.90, \"tax\": null, \"date\": \"04/13/2025\", \"currency\": \"USD\"}\n```";
        let refined = parse_chat_response(&body(content)).unwrap();

        assert_eq!(refined.vendor.as_deref(), Some("ACME"));
        assert_eq!(refined.total, Some(dec("42.90")));
        assert_eq!(refined.tax, None);
        assert_eq!(refined.date.as_deref(), Some("04/13/2025"));
        assert_eq!(refined.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_chat_response(r#"{"choices": []}"#),
            Err(RefinementError::NoContent)
        );
        assert!(matches!(
            parse_chat_response(&body("not json at all")),
            Err(RefinementError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_chat_response("<html>"),
            Err(RefinementError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_resolve_precedence() {
        let mut local = ReceiptData::new("ACME\nTOTAL 5.00");
        local.vendor = Some("ACME".to_string());
        local.total = Some(dec("5.00"));

        let resolution = resolve(local.clone(), None);
        assert_eq!(resolution.source, ReceiptSource::Local);
        assert_eq!(resolution.receipt, local);

        let refined = RefinedReceipt { vendor: Some("Acme Corp".to_string()), ..Default::default() };
        let resolution = resolve(local.clone(), Some(Ok(refined)));
        assert_eq!(resolution.source, ReceiptSource::Refined);
        assert_eq!(resolution.receipt.vendor.as_deref(), Some("Acme Corp"));
        // Refined record replaces every field, not only the ones it carries
        assert_eq!(resolution.receipt.total, None);
        assert_eq!(resolution.receipt.raw_text, local.raw_text);

        let resolution = resolve(local.clone(), Some(Err(RefinementError::NoContent)));
        assert_eq!(
            resolution.source,
            ReceiptSource::LocalAfterRefinementError("no content in response".to_string())
        );
        assert_eq!(resolution.receipt, local);
    }
}
