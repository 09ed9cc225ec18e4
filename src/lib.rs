pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;
pub use crate::config::{toml_config::TomlConfig, CleanupConfig};

pub use crate::adapters::http::GeoServerClient;
pub use crate::adapters::reporter::{ConsoleReporter, MemoryReporter};
pub use crate::core::driver::CleanupDriver;
pub use crate::domain::model::{ApiResponse, CleanupSummary, DeleteOutcome, LayerId, ProgressEvent};
pub use crate::utils::error::{CleanupError, Result};
