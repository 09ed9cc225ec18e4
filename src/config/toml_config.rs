use crate::config::{CleanupConfig, DEFAULT_TIMEOUT_SECONDS, DEFAULT_WORKSPACE};
use crate::core::driver::DEFAULT_MAX_ITERATIONS;
use crate::utils::error::{CleanupError, Result};
use crate::utils::validation::validate_required_field;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// TOML 設定檔，所有欄位皆可省略，缺的由 CLI 補上
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub geoserver: GeoServerSection,
    #[serde(default)]
    pub cleanup: CleanupSection,
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoServerSection {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub workspace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CleanupSection {
    pub max_iterations: Option<usize>,
    pub verify_deletion: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CleanupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CleanupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOSERVER_PASSWORD})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CleanupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Values set in `overrides` win over values in `self`.
    pub fn overlay(self, overrides: TomlConfig) -> TomlConfig {
        TomlConfig {
            geoserver: GeoServerSection {
                endpoint: overrides.geoserver.endpoint.or(self.geoserver.endpoint),
                username: overrides.geoserver.username.or(self.geoserver.username),
                password: overrides.geoserver.password.or(self.geoserver.password),
                workspace: overrides.geoserver.workspace.or(self.geoserver.workspace),
            },
            cleanup: CleanupSection {
                max_iterations: overrides.cleanup.max_iterations.or(self.cleanup.max_iterations),
                verify_deletion: overrides
                    .cleanup
                    .verify_deletion
                    .or(self.cleanup.verify_deletion),
            },
            http: HttpSection {
                timeout_seconds: overrides.http.timeout_seconds.or(self.http.timeout_seconds),
            },
        }
    }

    /// Resolves the final configuration; endpoint and credentials are required.
    pub fn into_cleanup_config(self) -> Result<CleanupConfig> {
        let endpoint = validate_required_field("geoserver.endpoint (-g)", &self.geoserver.endpoint)?;
        let username = validate_required_field("geoserver.username (-u)", &self.geoserver.username)?;
        let password = validate_required_field("geoserver.password (-p)", &self.geoserver.password)?;

        let mut config = CleanupConfig::new(endpoint.as_str(), username.as_str(), password.as_str());
        config.workspace = self
            .geoserver
            .workspace
            .unwrap_or_else(|| DEFAULT_WORKSPACE.to_string());
        config.timeout_seconds = self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        config.max_iterations = self.cleanup.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        config.verify_deletion = self.cleanup.verify_deletion.unwrap_or(false);
        Ok(config)
    }
}
