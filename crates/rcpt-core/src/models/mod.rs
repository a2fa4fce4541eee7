//! Data models and configuration.

pub mod config;
pub mod receipt;

pub use config::{ExtractionConfig, RcptConfig, RefinementConfig};
pub use receipt::{PaymentMethod, ReceiptData};
