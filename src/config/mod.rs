#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::driver::DEFAULT_MAX_ITERATIONS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CleanupError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;

pub const DEFAULT_WORKSPACE: &str = "piazza";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// 清理工具的完整設定，由 CLI 或 TOML 組合而成後注入 driver
#[derive(Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub workspace: String,
    pub timeout_seconds: u64,
    pub max_iterations: usize,
    pub verify_deletion: bool,
}

impl CleanupConfig {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            workspace: DEFAULT_WORKSPACE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verify_deletion: false,
        }
    }
}

// 密碼不寫進日誌
impl fmt::Debug for CleanupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"***")
            .field("workspace", &self.workspace)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_iterations", &self.max_iterations)
            .field("verify_deletion", &self.verify_deletion)
            .finish()
    }
}

impl ConfigProvider for CleanupConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn workspace(&self) -> &str {
        &self.workspace
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn verify_deletion(&self) -> bool {
        self.verify_deletion
    }
}

impl Validate for CleanupConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("geoserver.endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("geoserver.username", &self.username)?;
        if self.password.is_empty() {
            return Err(CleanupError::InvalidConfigValueError {
                field: "geoserver.password".to_string(),
                value: String::new(),
                reason: "Password cannot be empty".to_string(),
            });
        }
        validation::validate_path_segment("geoserver.workspace", &self.workspace)?;
        validation::validate_range(
            "http.timeout_seconds",
            self.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_positive_number("cleanup.max_iterations", self.max_iterations, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> CleanupConfig {
        CleanupConfig::new("http://localhost:8080/", "admin", "geoserver")
    }

    #[test]
    fn test_defaults() {
        let config = valid_config();
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.workspace, "piazza");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_iterations, 100);
        assert!(!config.verify_deletion);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = valid_config();
        config.endpoint = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.username = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.password = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_iterations = 0;
        match config.validate() {
            Err(CleanupError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "cleanup.max_iterations")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut config = valid_config();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.endpoint = "http://host:8080/?x=1".to_string();
        match config.validate() {
            Err(CleanupError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "geoserver.endpoint")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("geoserver\""));
        assert!(rendered.contains("***"));
    }
}
