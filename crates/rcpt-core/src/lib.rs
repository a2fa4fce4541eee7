//! Core library for receipt OCR text processing.
//!
//! This crate provides:
//! - Heuristic extraction of vendor, date and total from OCR transcripts
//! - Optional tax, subtotal, payment method and currency detection
//! - The request/response contract for remote refinement
//! - Receipt data models and configuration

pub mod error;
pub mod models;
pub mod receipt;
pub mod refine;

pub use error::{RcptError, RefinementError, Result};
pub use models::{ExtractionConfig, PaymentMethod, RcptConfig, ReceiptData, RefinementConfig};
pub use receipt::rules::is_meaningful_transcript;
pub use receipt::{
    EntityRecognizer, ExtractionResult, HeuristicReceiptParser, NoEntities, ReceiptParser,
    SuffixEntityRecognizer,
};
pub use refine::{ReceiptSource, RefinedReceipt, Resolution};
