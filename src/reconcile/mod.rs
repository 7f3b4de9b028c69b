//! Execution reconciliation - interprets the engine's raw result
//! payload into a typed, user-facing outcome

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::domain::model::SegmentResult;

/// One produced segment file, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentFile {
    pub filename: String,
    pub filepath: String,
}

/// The reconciled result of one execution request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    /// Every segment was produced cleanly.
    Completed { files: Vec<SegmentFile> },
    /// The engine succeeded overall but reported errors; the produced
    /// files are still listed so the user can recover them.
    PartialFailure {
        files: Vec<SegmentFile>,
        errors: Vec<String>,
    },
    /// The engine failed outright.
    Failed { reason: String },
}

/// Maps raw engine results to outcomes.
pub struct ExecutionReconciler;

impl ExecutionReconciler {
    /// Classify a raw result.
    ///
    /// A mismatch between the produced file count and
    /// `expected_segment_count` is informational only; the engine's own
    /// success flag and error list drive the classification.
    pub fn reconcile(raw: &SegmentResult, expected_segment_count: Option<usize>) -> Outcome {
        if !raw.success {
            return Outcome::Failed {
                reason: raw.errors.join("; "),
            };
        }

        let files: Vec<SegmentFile> = raw
            .produced_files
            .iter()
            .map(|path| SegmentFile {
                filename: Self::filename_of(path),
                filepath: path.display().to_string(),
            })
            .collect();

        if let Some(expected) = expected_segment_count {
            if files.len() != expected {
                warn!(
                    produced = files.len(),
                    expected, "segment count differs from plan"
                );
            }
        }

        if raw.errors.is_empty() {
            Outcome::Completed { files }
        } else {
            Outcome::PartialFailure {
                files,
                errors: raw.errors.clone(),
            }
        }
    }

    /// Last path component, or "unknown" when it cannot be extracted.
    /// Never blocks the overall result.
    fn filename_of(path: &Path) -> String {
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}
