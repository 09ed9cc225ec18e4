use crate::domain::model::{ApiResponse, LayerId, ProgressEvent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// GeoServer endpoints the cleanup needs.
#[async_trait]
pub trait GeoServerApi: Send + Sync {
    /// WMS 1.1.1 GetCapabilities document.
    async fn get_capabilities(&self) -> Result<ApiResponse>;
    async fn delete_layer(&self, layer: &LayerId) -> Result<ApiResponse>;
    async fn delete_layer_group(&self, group: &LayerId) -> Result<ApiResponse>;
    /// REST lookup of a single layer, used to confirm a deletion.
    async fn get_layer(&self, layer: &LayerId) -> Result<ApiResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn username(&self) -> &str;
    fn password(&self) -> &str;
    fn workspace(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn max_iterations(&self) -> usize;
    fn verify_deletion(&self) -> bool;
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}
