pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{LocalStorage, Snapshot, SnapshotRepository};
pub use core::{engine::ReportEngine, report::ReportGenerator};
pub use domain::model::{Prescription, Product, Quote, ReportMode, Store};
pub use utils::error::{RankerError, Result};
