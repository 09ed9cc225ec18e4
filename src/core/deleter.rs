use crate::core::extract;
use crate::domain::model::{DeleteOutcome, LayerId, ProgressEvent};
use crate::domain::ports::{GeoServerApi, ProgressReporter};
use crate::utils::error::{CleanupError, Result};

/// Deletes one layer, falling back to removing the blocking layer group
/// and retrying exactly once.
pub async fn delete_layer<A, R>(api: &A, reporter: &R, layer: &LayerId) -> Result<DeleteOutcome>
where
    A: GeoServerApi + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let response = api.delete_layer(layer).await?;
    reporter.report(&ProgressEvent::LayerDeleteAttempted {
        layer: layer.clone(),
        status: response.status,
    });

    if !response.is_internal_error() {
        return Ok(DeleteOutcome::Deleted {
            status: response.status,
        });
    }

    if !extract::is_group_reference_error(&response.body) {
        tracing::error!("Deleting layer {} failed with status {}", layer, response.status);
        reporter.report(&ProgressEvent::ServerErrorBody {
            body: response.body.clone(),
        });
        reporter.report(&ProgressEvent::DeletionAborted);
        return Err(CleanupError::DeletionFailed {
            layer: layer.to_string(),
            status: response.status,
            body: response.body,
        });
    }

    let Some(group) = extract::find_layer_group(&response.body) else {
        tracing::error!("Layer {} is held by a layer group that could not be identified", layer);
        reporter.report(&ProgressEvent::ServerErrorBody {
            body: response.body.clone(),
        });
        reporter.report(&ProgressEvent::DeletionAborted);
        return Err(CleanupError::MissingLayerGroupId {
            layer: layer.to_string(),
            body: response.body,
        });
    };

    // 先刪掉參照這個 layer 的 layer group
    tracing::info!("Layer {} is referenced by layer group {}, removing the group", layer, group);
    let group_response = api.delete_layer_group(&group).await?;
    reporter.report(&ProgressEvent::LayerGroupDeleted {
        group: group.clone(),
        status: group_response.status,
    });
    if group_response.is_internal_error() {
        // group 刪不掉不中止，交給重試結果決定
        tracing::warn!("Deleting layer group {} returned status {}", group, group_response.status);
        reporter.report(&ProgressEvent::ServerErrorBody {
            body: group_response.body,
        });
    }

    // 只重試一次
    let retry = api.delete_layer(layer).await?;
    reporter.report(&ProgressEvent::LayerDeleteRetried {
        layer: layer.clone(),
        status: retry.status,
    });
    if retry.is_internal_error() {
        tracing::error!("Retrying deletion of layer {} failed with status {}", layer, retry.status);
        reporter.report(&ProgressEvent::ServerErrorBody {
            body: retry.body.clone(),
        });
        reporter.report(&ProgressEvent::DeletionAborted);
        return Err(CleanupError::DeletionFailed {
            layer: layer.to_string(),
            status: retry.status,
            body: retry.body,
        });
    }

    Ok(DeleteOutcome::DeletedAfterGroupRemoval {
        group,
        group_status: group_response.status,
        status: retry.status,
    })
}

/// 確認 layer 已經不存在：404 表示已刪除，2xx 表示仍存在
pub async fn verify_deleted<A, R>(api: &A, reporter: &R, layer: &LayerId) -> Result<()>
where
    A: GeoServerApi + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let response = api.get_layer(layer).await?;
    if response.is_not_found() {
        reporter.report(&ProgressEvent::LayerVerified {
            layer: layer.clone(),
        });
        return Ok(());
    }

    if response.is_success() {
        tracing::error!(
            "Layer {} still resolves after deletion (status {})",
            layer,
            response.status
        );
        return Err(CleanupError::LayerStillPresent {
            layer: layer.to_string(),
            status: response.status,
        });
    }

    // 401/403/500 之類的回應無法判斷 layer 是否還在
    tracing::error!(
        "Could not look up layer {} after deletion (status {})",
        layer,
        response.status
    );
    reporter.report(&ProgressEvent::ServerErrorBody {
        body: response.body.clone(),
    });
    Err(CleanupError::VerificationFailed {
        layer: layer.to_string(),
        status: response.status,
        body: response.body,
    })
}
