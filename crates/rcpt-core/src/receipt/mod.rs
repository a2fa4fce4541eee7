//! Receipt field extraction module.

pub mod entities;
mod parser;
pub mod rules;

pub use entities::{EntityRecognizer, NoEntities, SuffixEntityRecognizer};
pub use parser::{ExtractionResult, HeuristicReceiptParser, ReceiptParser};
