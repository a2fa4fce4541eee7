//! Receipt data models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::refine::RefinedReceipt;

/// Structured fields recovered from a receipt transcript.
///
/// Every optional field is either absent or taken from text present in
/// `raw_text`. A record is built once per parse and not mutated afterwards;
/// a refinement step produces a separate record instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptData {
    /// Vendor/store name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Transaction date, in the textual form it was detected in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Tax/VAT amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Total amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// The original transcript.
    pub raw_text: String,
}

impl ReceiptData {
    /// Create an empty record carrying only the transcript.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            vendor: None,
            date: None,
            tax: None,
            total: None,
            currency: None,
            raw_text: raw_text.into(),
        }
    }

    /// Build the overriding record from a refinement response.
    pub fn from_refinement(refined: RefinedReceipt, raw_text: impl Into<String>) -> Self {
        Self {
            vendor: refined.vendor,
            date: refined.date,
            tax: refined.tax,
            total: refined.total,
            currency: refined.currency,
            raw_text: raw_text.into(),
        }
    }

    /// Names of the core fields (vendor, date, total) that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.vendor.is_none() {
            missing.push("vendor");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.total.is_none() {
            missing.push("total");
        }
        missing
    }

    /// True when nothing beyond the raw transcript was recovered.
    pub fn is_raw_only(&self) -> bool {
        self.vendor.is_none()
            && self.date.is_none()
            && self.tax.is_none()
            && self.total.is_none()
            && self.currency.is_none()
    }
}

/// Payment method printed on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Card,
    Visa,
    Mastercard,
    Amex,
    ApplePay,
    PayPal,
}

impl PaymentMethod {
    /// Keywords in detection priority order.
    const KEYWORDS: [(&'static str, PaymentMethod); 9] = [
        ("cash", PaymentMethod::Cash),
        ("credit", PaymentMethod::Credit),
        ("debit", PaymentMethod::Debit),
        ("card", PaymentMethod::Card),
        ("visa", PaymentMethod::Visa),
        ("mastercard", PaymentMethod::Mastercard),
        ("amex", PaymentMethod::Amex),
        ("apple pay", PaymentMethod::ApplePay),
        ("paypal", PaymentMethod::PayPal),
    ];

    /// Detect the payment method from free text.
    ///
    /// The first keyword (in priority order) found anywhere in the
    /// lower-cased text wins, regardless of where it appears.
    pub fn detect(text: &str) -> Option<Self> {
        let lowercased = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lowercased.contains(keyword))
            .map(|(_, method)| *method)
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Credit => "Credit",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Card => "Card",
            PaymentMethod::Visa => "Visa",
            PaymentMethod::Mastercard => "Mastercard",
            PaymentMethod::Amex => "Amex",
            PaymentMethod::ApplePay => "Apple Pay",
            PaymentMethod::PayPal => "Paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
