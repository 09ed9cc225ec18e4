use clap::Parser;
use geoserver_cleanup::utils::{logger, validation::Validate};
use geoserver_cleanup::{CleanupDriver, CliArgs, ConsoleReporter, GeoServerClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, args.log_format);

    tracing::info!("Starting geoserver-cleanup");

    // 組合並驗證配置
    let config = match args.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    let client = match GeoServerClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let driver = CleanupDriver::from_config(client, ConsoleReporter, &config).with_dry_run(args.dry_run);

    match driver.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Culled {} layers and {} layer groups in {} iterations",
                summary.culled_layers.len(),
                summary.removed_groups.len(),
                summary.iterations
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Cleanup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            if let Some(body) = e.response_body() {
                tracing::debug!("GeoServer response body: {}", body);
            }
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
