pub mod deleter;
pub mod driver;
pub mod extract;
pub mod prober;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{ApiResponse, CleanupSummary, DeleteOutcome, LayerId, ProgressEvent};
pub use crate::domain::ports::{ConfigProvider, GeoServerApi, ProgressReporter};
pub use crate::utils::error::Result;
