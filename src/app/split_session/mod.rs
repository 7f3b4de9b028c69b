// Split session - Orchestrates one planning/execution cycle

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::{SplitError, SplitResult};
use crate::domain::model::{CutPointSet, ScenePoint, SplitStrategy, VideoMetadata};
use crate::planner::request_builder::SplitRequestBuilder;
use crate::planner::SplitPlanner;
use crate::ports::{MediaEnginePort, PlatformPort};
use crate::progress::ProgressReporter;
use crate::reconcile::{ExecutionReconciler, Outcome};

/// Session owning one source video, one planner, and at most one
/// in-flight execution. All state is in-memory and lives for one
/// planning/execution cycle; nothing is persisted.
pub struct SplitSession {
    engine: Arc<dyn MediaEnginePort>,
    platform: Arc<dyn PlatformPort>,
    metadata: Option<VideoMetadata>,
    planner: Option<SplitPlanner>,
    in_flight: AtomicBool,
}

impl SplitSession {
    pub fn new(engine: Arc<dyn MediaEnginePort>, platform: Arc<dyn PlatformPort>) -> Self {
        Self {
            engine,
            platform,
            metadata: None,
            planner: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Probe a source video and make it the session's subject.
    /// Changing the path invalidates previous metadata and any manual
    /// cut points.
    pub async fn load_source(&mut self, path: &Path) -> SplitResult<&VideoMetadata> {
        if self
            .metadata
            .as_ref()
            .map(|meta| meta.path != path)
            .unwrap_or(false)
        {
            self.metadata = None;
            self.planner = None;
        }

        let metadata = self.engine.probe_metadata(path).await?;
        info!(
            source = %metadata.filename,
            duration = metadata.duration,
            "loaded source video"
        );
        self.planner = Some(SplitPlanner::new(&metadata));
        Ok(self.metadata.insert(metadata))
    }

    /// Let the user pick a source interactively. Returns Ok(None) on
    /// cancellation, which is not an error.
    pub async fn pick_source(&mut self) -> SplitResult<Option<PathBuf>> {
        match self.platform.select_file_path().await {
            Some(path) => {
                self.load_source(&path).await?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// Let the user pick an output directory. `None` on cancellation.
    pub async fn pick_output_dir(&self) -> Option<PathBuf> {
        self.platform.select_directory_path().await
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    /// Add a manual cut point. Safe to call while an execution is
    /// pending: it touches planner-local state, not the in-flight
    /// request.
    pub fn add_point(&mut self, point: f64) -> SplitResult<()> {
        self.planner
            .as_mut()
            .ok_or(SplitError::NoSourceLoaded)?
            .add_point(point)
    }

    /// Remove one manual cut point by index.
    pub fn remove_point(&mut self, index: usize) -> SplitResult<Option<f64>> {
        Ok(self
            .planner
            .as_mut()
            .ok_or(SplitError::NoSourceLoaded)?
            .remove_point(index))
    }

    pub fn manual_points(&self) -> &[f64] {
        self.planner
            .as_ref()
            .map(|planner| planner.manual_points())
            .unwrap_or(&[])
    }

    /// Run scene detection for the loaded source.
    pub async fn detect_scenes(
        &self,
        threshold: f32,
        min_duration: f64,
    ) -> SplitResult<Vec<ScenePoint>> {
        let metadata = self.metadata.as_ref().ok_or(SplitError::NoSourceLoaded)?;
        self.engine
            .detect_scenes(&metadata.path, threshold, min_duration)
            .await
    }

    /// Produce the cut point set for a strategy, running scene
    /// detection first when the strategy needs it.
    pub async fn plan(&self, strategy: &SplitStrategy) -> SplitResult<CutPointSet> {
        let metadata = self.metadata.as_ref().ok_or(SplitError::NoSourceLoaded)?;
        let planner = self.planner.as_ref().ok_or(SplitError::NoSourceLoaded)?;

        let scenes = match strategy {
            SplitStrategy::SceneBased {
                threshold,
                min_scene_duration,
            } => {
                strategy.validate()?;
                Some(
                    self.engine
                        .detect_scenes(&metadata.path, *threshold, *min_scene_duration)
                        .await?,
                )
            }
            _ => None,
        };

        planner.plan(strategy, metadata, scenes.as_deref())
    }

    /// Plan, build, and execute a split, reconciling the engine's raw
    /// result into an outcome.
    ///
    /// Validation failures surface before anything is dispatched, and
    /// the session stays usable for a retry after any failure. Only
    /// one execution may be in flight at a time.
    pub async fn execute(
        &self,
        strategy: &SplitStrategy,
        output_dir: Option<&Path>,
        output_format: &str,
        reporter: &ProgressReporter,
    ) -> SplitResult<Outcome> {
        let metadata = self.metadata.as_ref().ok_or(SplitError::NoSourceLoaded)?;

        let plan = self.plan(strategy).await?;
        if plan.is_empty() {
            return Err(SplitError::NoCutPoints);
        }

        let request =
            SplitRequestBuilder::build(&metadata.path, output_dir, output_format, strategy)?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SplitError::ExecutionInFlight);
        }

        reporter.start();
        let progress_handle = reporter.clone();
        let progress = move |completed: usize, total: usize| {
            progress_handle.segment_done(completed, total);
        };

        let result = self.engine.execute(&request, plan.points(), &progress).await;
        self.in_flight.store(false, Ordering::SeqCst);

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                reporter.failed();
                return Err(e);
            }
        };

        let outcome = ExecutionReconciler::reconcile(&raw, Some(plan.segment_count()));
        match &outcome {
            Outcome::Failed { reason } => {
                warn!(%reason, "split failed");
                reporter.failed();
            }
            Outcome::PartialFailure { files, errors } => {
                warn!(
                    produced = files.len(),
                    errors = errors.len(),
                    "split finished with errors"
                );
                reporter.done();
            }
            Outcome::Completed { files } => {
                info!(
                    produced = files.len(),
                    elapsed = raw.elapsed_seconds,
                    "split complete"
                );
                reporter.done();
            }
        }
        Ok(outcome)
    }

    /// Open a produced file, only offered on confirmed outcomes.
    pub async fn open_file(&self, path: &Path) -> SplitResult<()> {
        self.platform.open_file(path).await
    }

    /// Reveal a produced file in the platform file manager.
    pub async fn reveal(&self, path: &Path) -> SplitResult<()> {
        self.platform.reveal_in_file_manager(path).await
    }
}
