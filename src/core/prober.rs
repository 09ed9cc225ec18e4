use crate::core::extract::{self, METADATA_FAILURE_MARKER};
use crate::domain::model::LayerId;
use crate::domain::ports::GeoServerApi;
use crate::utils::error::Result;

/// 查詢 GetCapabilities，找出第一個 metadata 產生失敗的 layer
pub async fn probe_bad_layer<A: GeoServerApi + ?Sized>(api: &A) -> Result<Option<LayerId>> {
    let response = api.get_capabilities().await?;
    tracing::debug!(
        "Capabilities response status: {}, {} bytes",
        response.status,
        response.body.len()
    );

    let bad_layer = extract::find_bad_layer(&response.body);
    match &bad_layer {
        Some(layer) => tracing::info!("Bad layer reported by capabilities: {}", layer),
        None if response.body.contains(METADATA_FAILURE_MARKER) => {
            // 有錯誤訊息但抓不到 UUID，無法處理
            tracing::warn!("Capabilities report a metadata failure, but no layer id could be extracted");
        }
        None => tracing::debug!("No bad layers reported"),
    }

    Ok(bad_layer)
}
