//! SplitX Video Splitter Library
//!
//! Splits a video into segments by one of three strategies: fixed time
//! intervals, detected scene changes, or manually chosen timestamps.
//! The core plans and validates cut points, builds the execution
//! request, and reconciles the engine's results back into a typed
//! outcome; the actual cutting is delegated to an ffmpeg-class engine
//! behind the `ports` contracts.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod planner;
pub mod ports;
pub mod progress;
pub mod reconcile;

// Re-export commonly used types
pub use app::SplitSession;
pub use domain::errors::{SplitError, SplitResult};
pub use domain::model::{
    CutPointSet, ScenePoint, SegmentResult, SplitRequest, SplitStrategy, TimeCode, VideoMetadata,
};
pub use planner::request_builder::SplitRequestBuilder;
pub use planner::scene_ingest::SceneIngestor;
pub use planner::SplitPlanner;
pub use ports::{MediaEnginePort, PlatformPort};
pub use progress::{ProgressReporter, ProgressSink, ProgressState};
pub use reconcile::{ExecutionReconciler, Outcome, SegmentFile};
