pub mod cost;
pub mod engine;
pub mod ranking;
pub mod report;

pub use crate::domain::model::{CostedQuote, ProductOutcome, RankedQuote, ReportMode};
pub use crate::domain::ports::{ConfigProvider, QuoteRepository, Storage, UnitPolicy};
pub use crate::utils::error::Result;
