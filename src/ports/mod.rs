// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::SplitResult;
use crate::domain::model::{ScenePoint, SegmentResult, SplitRequest, VideoMetadata};

/// Per-segment progress hook: (completed, total). The engine calls it
/// after each segment when granular progress is observable.
pub type SegmentProgress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Port for the external media-processing engine.
#[async_trait]
pub trait MediaEnginePort: Send + Sync {
    /// Probe source metadata. Fails when the engine is unavailable or
    /// the file does not exist.
    async fn probe_metadata(&self, path: &Path) -> SplitResult<VideoMetadata>;

    /// Detect scene changes above `threshold`, reporting raw scene
    /// points at least `min_duration` seconds apart.
    async fn detect_scenes(
        &self,
        path: &Path,
        threshold: f32,
        min_duration: f64,
    ) -> SplitResult<Vec<ScenePoint>>;

    /// Execute a split request against the planned cut points.
    ///
    /// In-engine failures come back as a `SegmentResult` with
    /// `success == false` (or with per-segment errors alongside the
    /// surviving files); only engine-level faults are `Err`.
    async fn execute(
        &self,
        request: &SplitRequest,
        cut_points: &[f64],
        progress: SegmentProgress<'_>,
    ) -> SplitResult<SegmentResult>;
}

/// Port for host platform operations: interactive pickers and file
/// management around confirmed outcomes.
#[async_trait]
pub trait PlatformPort: Send + Sync {
    /// Interactive video file picker. `None` means the user cancelled,
    /// which is not an error.
    async fn select_file_path(&self) -> Option<PathBuf>;

    /// Interactive output directory picker. `None` means cancelled.
    async fn select_directory_path(&self) -> Option<PathBuf>;

    async fn path_exists(&self, path: &Path) -> bool;

    /// Open a produced file with the default application.
    async fn open_file(&self, path: &Path) -> SplitResult<()>;

    /// Reveal a produced file in the platform file manager.
    async fn reveal_in_file_manager(&self, path: &Path) -> SplitResult<()>;
}
