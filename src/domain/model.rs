use chrono::{DateTime, Utc};
use std::fmt;

/// UUID 形狀的 GeoServer 資源名稱 (layer 或 layer group)
///
/// Only constructed through the UUID pattern in [`crate::core::extract`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub(crate) String);

impl LayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP 回應的最小表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// GeoServer reports every failed REST delete as a plain 500.
    pub fn is_internal_error(&self) -> bool {
        self.status == 500
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// How a layer deletion completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted {
        status: u16,
    },
    DeletedAfterGroupRemoval {
        group: LayerId,
        group_status: u16,
        status: u16,
    },
}

impl DeleteOutcome {
    pub fn removed_group(&self) -> Option<&LayerId> {
        match self {
            DeleteOutcome::Deleted { .. } => None,
            DeleteOutcome::DeletedAfterGroupRemoval { group, .. } => Some(group),
        }
    }
}

/// 一次清理執行的統計
#[derive(Debug, Clone)]
pub struct CleanupSummary {
    pub iterations: usize,
    pub culled_layers: Vec<LayerId>,
    pub removed_groups: Vec<LayerId>,
    /// Layer a dry run would have culled.
    pub pending_layer: Option<LayerId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CleanupSummary {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            culled_layers: Vec::new(),
            removed_groups: Vec::new(),
            pending_layer: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, layer: LayerId, outcome: &DeleteOutcome) {
        if let Some(group) = outcome.removed_group() {
            self.removed_groups.push(group.clone());
        }
        self.culled_layers.push(layer);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

impl Default for CleanupSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// 進度事件，Display 輸出為給操作人員看的文字行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started,
    LayerDeleteAttempted { layer: LayerId, status: u16 },
    LayerGroupDeleted { group: LayerId, status: u16 },
    LayerDeleteRetried { layer: LayerId, status: u16 },
    ServerErrorBody { body: String },
    DeletionAborted,
    LayerVerified { layer: LayerId },
    DryRunCandidate { layer: Option<LayerId> },
    Finished,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started => write!(f, "Begin culling of Bad Layers"),
            ProgressEvent::LayerDeleteAttempted { layer, status } => {
                write!(f, "Culling {}, response was {}", layer, status)
            }
            ProgressEvent::LayerGroupDeleted { group, status } => {
                write!(f, "Culled Layer Group {}, response was {}", group, status)
            }
            ProgressEvent::LayerDeleteRetried { layer, status } => {
                write!(f, "Retry culling {}, response was {}", layer, status)
            }
            ProgressEvent::ServerErrorBody { body } => write!(f, "{}", body),
            ProgressEvent::DeletionAborted => write!(f, "Could not delete layer. Exiting."),
            ProgressEvent::LayerVerified { layer } => write!(f, "Verified {} is gone", layer),
            ProgressEvent::DryRunCandidate { layer: Some(layer) } => {
                write!(f, "Dry run: would cull {}", layer)
            }
            ProgressEvent::DryRunCandidate { layer: None } => {
                write!(f, "Dry run: no Bad Layers found")
            }
            ProgressEvent::Finished => write!(f, "Done culling Bad Layers"),
        }
    }
}
