use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Could not delete layer {layer}: server responded with status {status}")]
    DeletionFailed {
        layer: String,
        status: u16,
        body: String,
    },

    #[error("Layer {layer} is referenced by a layer group, but no group id was found in the response")]
    MissingLayerGroupId { layer: String, body: String },

    #[error("Could not confirm deletion of layer {layer}: lookup returned status {status}")]
    VerificationFailed {
        layer: String,
        status: u16,
        body: String,
    },

    #[error("Layer {layer} still exists after deletion (lookup returned status {status})")]
    LayerStillPresent { layer: String, status: u16 },

    #[error("Bad layers were still reported after {limit} iterations")]
    IterationLimitReached { limit: usize },
}

/// 錯誤分類，用於日誌與診斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Server,
    Consistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 可能是暫時性問題，稍後重跑即可
    Medium,
    /// 需要人工介入
    High,
}

impl CleanupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanupError::Transport(_) => ErrorCategory::Network,
            CleanupError::IoError(_)
            | CleanupError::MissingConfigError { .. }
            | CleanupError::InvalidConfigValueError { .. }
            | CleanupError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CleanupError::DeletionFailed { .. }
            | CleanupError::MissingLayerGroupId { .. }
            | CleanupError::VerificationFailed { .. } => ErrorCategory::Server,
            CleanupError::LayerStillPresent { .. } | CleanupError::IterationLimitReached { .. } => {
                ErrorCategory::Consistency
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
        }
    }

    /// Raw server response attached to the error, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            CleanupError::DeletionFailed { body, .. }
            | CleanupError::MissingLayerGroupId { body, .. }
            | CleanupError::VerificationFailed { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CleanupError::Transport(_) => {
                "Check that GeoServer is reachable from this host, or raise --timeout-seconds"
            }
            CleanupError::IoError(_) => "Check that the configuration file exists and is readable",
            CleanupError::MissingConfigError { .. } => {
                "Pass the value with -g/-u/-p or set it in the [geoserver] section of the config file"
            }
            CleanupError::InvalidConfigValueError { .. }
            | CleanupError::ConfigValidationError { .. } => {
                "Fix the configuration value and run again"
            }
            CleanupError::DeletionFailed { .. } | CleanupError::MissingLayerGroupId { .. } => {
                "Inspect the GeoServer response above and remove the layer manually"
            }
            CleanupError::VerificationFailed { .. } => {
                "Check the credentials and GeoServer logs, then confirm the layer is gone before rerunning"
            }
            CleanupError::LayerStillPresent { .. } => {
                "GeoServer reported a successful delete but kept the layer; check the catalog and server logs"
            }
            CleanupError::IterationLimitReached { .. } => {
                "GeoServer keeps reporting bad layers; run with --verify-deletion or raise --max-iterations"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanupError::Transport(e) if e.is_timeout() => {
                "GeoServer did not answer before the request timed out".to_string()
            }
            CleanupError::Transport(_) => "Could not reach GeoServer".to_string(),
            CleanupError::DeletionFailed { layer, .. }
            | CleanupError::MissingLayerGroupId { layer, .. } => {
                format!("Could not delete layer {}", layer)
            }
            CleanupError::VerificationFailed { layer, status, .. } => format!(
                "Could not confirm that layer {} was deleted (status {})",
                layer, status
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
