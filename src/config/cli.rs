use crate::config::toml_config::{CleanupSection, GeoServerSection, HttpSection, TomlConfig};
use crate::config::CleanupConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;

#[derive(Clone, Parser)]
#[command(name = "geoserver-cleanup")]
#[command(about = "Cull corrupted layers from GeoServer")]
pub struct CliArgs {
    /// GeoServer URI
    #[arg(short = 'g', value_name = "URI")]
    pub geoserver_uri: Option<String>,

    /// GeoServer UserName
    #[arg(short = 'u', value_name = "USERNAME")]
    pub username: Option<String>,

    /// GeoServer Password
    #[arg(short = 'p', value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<String>,

    /// Workspace holding the layer groups
    #[arg(long)]
    pub workspace: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Give up after deleting this many layers
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Confirm through the REST API that each deleted layer is gone
    #[arg(long)]
    pub verify_deletion: bool,

    /// Report the first bad layer without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// 命令列參數轉成與設定檔相同的結構，方便疊加
    pub fn as_overrides(&self) -> TomlConfig {
        TomlConfig {
            geoserver: GeoServerSection {
                endpoint: self.geoserver_uri.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
                workspace: self.workspace.clone(),
            },
            cleanup: CleanupSection {
                max_iterations: self.max_iterations,
                // 旗標只能開啟，沒給就沿用設定檔
                verify_deletion: self.verify_deletion.then_some(true),
            },
            http: HttpSection {
                timeout_seconds: self.timeout_seconds,
            },
        }
    }

    pub fn resolve(&self) -> Result<CleanupConfig> {
        let base = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        base.overlay(self.as_overrides()).into_cleanup_config()
    }
}
