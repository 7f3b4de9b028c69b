//! Scene ingestion - normalizes engine-reported scene points into cut
//! points

use tracing::debug;

use crate::domain::model::{CutPointSet, ScenePoint};

/// Folds raw scene detection output into a usable cut point set.
///
/// The engine reports scene points unsorted and with near-duplicates
/// around hard cuts; clusters closer together than the minimum scene
/// duration collapse to their earliest point, which marks the actual
/// onset of the new scene.
pub struct SceneIngestor {
    min_scene_duration: f64,
}

impl SceneIngestor {
    pub fn new(min_scene_duration: f64) -> Self {
        Self { min_scene_duration }
    }

    /// Sort by time, collapse clusters keeping the earliest point of
    /// each, and discard anything at or beyond `ceiling`.
    pub fn ingest(&self, raw: &[ScenePoint], ceiling: f64) -> CutPointSet {
        let mut times: Vec<f64> = raw
            .iter()
            .map(|scene| scene.time_seconds)
            .filter(|time| time.is_finite() && *time >= 0.0)
            .collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut set = CutPointSet::new(ceiling);
        let mut last_kept: Option<f64> = None;
        for time in times {
            if let Some(last) = last_kept {
                if time - last < self.min_scene_duration {
                    debug!(time, last, "collapsing scene point into cluster");
                    continue;
                }
            }
            match set.insert(time) {
                Ok(()) => last_kept = Some(time),
                Err(crate::domain::errors::SplitError::DuplicatePoint { .. }) => continue,
                Err(_) => {
                    // At or beyond the ceiling; later points only get
                    // closer to the end, so nothing else can be kept.
                    debug!(time, ceiling, "discarding scene point past ceiling");
                    break;
                }
            }
        }
        set
    }
}
