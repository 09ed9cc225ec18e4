use crate::core::deleter::{delete_layer, verify_deleted};
use crate::core::prober::probe_bad_layer;
use crate::domain::model::{CleanupSummary, ProgressEvent};
use crate::domain::ports::{ConfigProvider, GeoServerApi, ProgressReporter};
use crate::utils::error::{CleanupError, Result};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Probe-then-delete loop that runs until capabilities report no bad layer.
pub struct CleanupDriver<A: GeoServerApi, R: ProgressReporter> {
    api: A,
    reporter: R,
    max_iterations: usize,
    verify_deletion: bool,
    dry_run: bool,
}

impl<A: GeoServerApi, R: ProgressReporter> CleanupDriver<A, R> {
    pub fn new(api: A, reporter: R) -> Self {
        Self {
            api,
            reporter,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verify_deletion: false,
            dry_run: false,
        }
    }

    pub fn from_config<C: ConfigProvider>(api: A, reporter: R, config: &C) -> Self {
        Self::new(api, reporter)
            .with_max_iterations(config.max_iterations())
            .with_verification(config.verify_deletion())
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_verification(mut self, verify_deletion: bool) -> Self {
        self.verify_deletion = verify_deletion;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    #[cfg(test)]
    pub(crate) fn reporter(&self) -> &R {
        &self.reporter
    }

    pub async fn run(&self) -> Result<CleanupSummary> {
        let mut summary = CleanupSummary::new();
        self.reporter.report(&ProgressEvent::Started);
        tracing::info!(
            "Starting cleanup (max iterations: {}, verify deletion: {}, dry run: {})",
            self.max_iterations,
            self.verify_deletion,
            self.dry_run
        );

        if self.dry_run {
            let candidate = probe_bad_layer(&self.api).await?;
            self.reporter.report(&ProgressEvent::DryRunCandidate {
                layer: candidate.clone(),
            });
            summary.pending_layer = candidate;
            summary.finish();
            return Ok(summary);
        }

        while let Some(layer) = probe_bad_layer(&self.api).await? {
            if summary.iterations >= self.max_iterations {
                tracing::error!(
                    "Layer {} is still reported after {} deletions, giving up",
                    layer,
                    summary.iterations
                );
                return Err(CleanupError::IterationLimitReached {
                    limit: self.max_iterations,
                });
            }
            summary.iterations += 1;
            tracing::debug!("Iteration {}: culling {}", summary.iterations, layer);

            let outcome = delete_layer(&self.api, &self.reporter, &layer).await?;
            // 預設只相信 status code，開啟驗證時才再查一次
            if self.verify_deletion {
                verify_deleted(&self.api, &self.reporter, &layer).await?;
            }
            summary.record(layer, &outcome);
        }

        summary.finish();
        self.reporter.report(&ProgressEvent::Finished);
        tracing::info!(
            "Cleanup finished: {} layers culled, {} layer groups removed in {}ms",
            summary.culled_layers.len(),
            summary.removed_groups.len(),
            summary.elapsed().num_milliseconds()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::reporter::MemoryReporter;
    use crate::core::extract::{GROUP_REFERENCE_MARKER, METADATA_FAILURE_MARKER};
    use crate::core::test_support::{layer_id, ScriptedGeoServer};
    use crate::domain::model::ApiResponse;

    const LAYER: &str = "123e4567-e89b-12d3-a456-426614174000";
    const GROUP: &str = "abcd1234-ab12-ab12-ab12-abcdef123456";

    fn bad_capabilities(id: &str) -> ApiResponse {
        ApiResponse::new(
            200,
            format!(
                "<ServiceExceptionReport><ServiceException>{} piazza:{}</ServiceException></ServiceExceptionReport>",
                METADATA_FAILURE_MARKER, id
            ),
        )
    }

    #[tokio::test]
    async fn test_single_bad_layer_then_clean() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER)])
            .with_layer_deletes(vec![ApiResponse::new(200, "")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new());

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.culled_layers, vec![layer_id(LAYER)]);
        assert!(summary.removed_groups.is_empty());
        assert_eq!(
            driver.api().calls(),
            vec![
                "GET capabilities".to_string(),
                format!("DELETE layer {}", LAYER),
                "GET capabilities".to_string(),
            ]
        );
        assert_eq!(
            driver.reporter().lines(),
            vec![
                "Begin culling of Bad Layers".to_string(),
                format!("Culling {}, response was 200", LAYER),
                "Done culling Bad Layers".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_clean_server_finishes_immediately() {
        let driver = CleanupDriver::new(ScriptedGeoServer::new(), MemoryReporter::new());

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.iterations, 0);
        assert!(summary.culled_layers.is_empty());
        assert_eq!(driver.api().calls(), vec!["GET capabilities".to_string()]);
    }

    #[tokio::test]
    async fn test_group_fallback_continues_loop() {
        let second = "00000000-1111-2222-3333-444444444444";
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER), bad_capabilities(second)])
            .with_layer_deletes(vec![
                ApiResponse::new(500, format!("{} {}", GROUP_REFERENCE_MARKER, GROUP)),
                ApiResponse::new(200, ""),
                ApiResponse::new(200, ""),
            ])
            .with_group_deletes(vec![ApiResponse::new(200, "")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new());

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.culled_layers, vec![layer_id(LAYER), layer_id(second)]);
        assert_eq!(summary.removed_groups, vec![layer_id(GROUP)]);
        assert_eq!(driver.api().group_delete_count(), 1);
        assert_eq!(driver.api().layer_delete_count(), 3);
    }

    #[tokio::test]
    async fn test_unrecoverable_delete_stops_loop() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER), bad_capabilities(LAYER)])
            .with_layer_deletes(vec![ApiResponse::new(500, "Internal error")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new());

        let err = driver.run().await.unwrap_err();

        assert_eq!(err.exit_code(), 1);
        // 失敗後不再重新查詢
        assert_eq!(
            driver.api().calls(),
            vec!["GET capabilities".to_string(), format!("DELETE layer {}", LAYER)]
        );
        assert!(!driver
            .reporter()
            .lines()
            .contains(&"Done culling Bad Layers".to_string()));
    }

    #[tokio::test]
    async fn test_iteration_cap_stops_livelock() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![
                bad_capabilities(LAYER),
                bad_capabilities(LAYER),
                bad_capabilities(LAYER),
            ])
            .with_layer_deletes(vec![ApiResponse::new(200, ""), ApiResponse::new(200, "")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new()).with_max_iterations(2);

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, CleanupError::IterationLimitReached { limit: 2 }));
        assert_eq!(driver.api().layer_delete_count(), 2);
    }

    #[tokio::test]
    async fn test_verification_catches_persisting_layer() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER)])
            .with_layer_deletes(vec![ApiResponse::new(200, "")])
            .with_layer_lookups(vec![ApiResponse::new(200, "{}")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new()).with_verification(true);

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, CleanupError::LayerStillPresent { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_verification_passes_when_layer_is_gone() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER)])
            .with_layer_deletes(vec![ApiResponse::new(200, "")])
            .with_layer_lookups(vec![ApiResponse::new(404, "No such layer")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new()).with_verification(true);

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.culled_layers.len(), 1);
        assert!(driver
            .reporter()
            .lines()
            .contains(&format!("Verified {} is gone", LAYER)));
    }

    #[tokio::test]
    async fn test_dry_run_never_deletes() {
        let api = ScriptedGeoServer::new().with_capabilities(vec![bad_capabilities(LAYER)]);
        let driver = CleanupDriver::new(api, MemoryReporter::new()).with_dry_run(true);

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.pending_layer, Some(layer_id(LAYER)));
        assert!(summary.culled_layers.is_empty());
        assert_eq!(driver.api().calls(), vec!["GET capabilities".to_string()]);
        assert_eq!(
            driver.reporter().lines().last().unwrap(),
            &format!("Dry run: would cull {}", LAYER)
        );
    }

    #[tokio::test]
    async fn test_dry_run_on_clean_server_reports_nothing_to_cull() {
        let driver =
            CleanupDriver::new(ScriptedGeoServer::new(), MemoryReporter::new()).with_dry_run(true);

        let summary = driver.run().await.unwrap();

        assert_eq!(summary.iterations, 0);
        assert!(summary.pending_layer.is_none());
        assert!(summary.culled_layers.is_empty());
        assert!(summary.finished_at.is_some());
        assert_eq!(driver.api().calls(), vec!["GET capabilities".to_string()]);
        assert_eq!(
            driver.reporter().lines(),
            vec![
                "Begin culling of Bad Layers".to_string(),
                "Dry run: no Bad Layers found".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_verification_lookup_error_is_server_failure() {
        let api = ScriptedGeoServer::new()
            .with_capabilities(vec![bad_capabilities(LAYER)])
            .with_layer_deletes(vec![ApiResponse::new(200, "")])
            .with_layer_lookups(vec![ApiResponse::new(401, "Unauthorized")]);
        let driver = CleanupDriver::new(api, MemoryReporter::new()).with_verification(true);

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, CleanupError::VerificationFailed { status: 401, .. }));
        assert!(!err.recovery_suggestion().contains("kept the layer"));
        assert!(!driver
            .reporter()
            .lines()
            .contains(&"Done culling Bad Layers".to_string()));
    }
}
