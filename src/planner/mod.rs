//! Split planning - turns a strategy plus video metadata into a
//! validated, ordered set of cut points

pub mod request_builder;
pub mod scene_ingest;

use tracing::{debug, info};

use crate::domain::errors::{SplitError, SplitResult};
use crate::domain::model::{CutPointSet, ScenePoint, SplitStrategy, VideoMetadata};
use crate::planner::scene_ingest::SceneIngestor;

/// Planner for one source video. Holds the manually refined cut point
/// set; `plan` itself is a pure function over its inputs.
pub struct SplitPlanner {
    manual_points: CutPointSet,
}

impl SplitPlanner {
    /// Create a planner bounded by the video's cut ceiling.
    pub fn new(metadata: &VideoMetadata) -> Self {
        Self {
            manual_points: CutPointSet::for_video(metadata),
        }
    }

    /// Add a manual cut point. Out-of-order inserts still yield a
    /// sorted set; exact duplicates are rejected.
    pub fn add_point(&mut self, point: f64) -> SplitResult<()> {
        self.manual_points.insert(point)?;
        debug!(point, "added manual cut point");
        Ok(())
    }

    /// Remove one manual cut point by index. Returns the removed
    /// value, or None when the index is past the end.
    pub fn remove_point(&mut self, index: usize) -> Option<f64> {
        let removed = self.manual_points.remove(index);
        if let Some(point) = removed {
            debug!(point, "removed manual cut point");
        }
        removed
    }

    /// The manually refined points, sorted ascending.
    pub fn manual_points(&self) -> &[f64] {
        self.manual_points.points()
    }

    /// Produce the cut point set for a strategy.
    ///
    /// `detected_scenes` feeds the scene-based strategy and is ignored
    /// by the others. Every returned point lies in `[0, duration - 1)`.
    pub fn plan(
        &self,
        strategy: &SplitStrategy,
        metadata: &VideoMetadata,
        detected_scenes: Option<&[ScenePoint]>,
    ) -> SplitResult<CutPointSet> {
        strategy.validate()?;

        match strategy {
            SplitStrategy::TimeBased {
                segment_duration,
                segment_count,
            } => self.plan_time_based(metadata, *segment_duration, *segment_count),
            SplitStrategy::SceneBased {
                min_scene_duration, ..
            } => {
                let scenes = detected_scenes.unwrap_or(&[]);
                let ingestor = SceneIngestor::new(*min_scene_duration);
                Ok(ingestor.ingest(scenes, metadata.cut_ceiling()))
            }
            SplitStrategy::ManualPoints { points } => self.plan_manual(metadata, points),
        }
    }

    fn plan_time_based(
        &self,
        metadata: &VideoMetadata,
        segment_duration: f64,
        segment_count: Option<u32>,
    ) -> SplitResult<CutPointSet> {
        let duration = metadata.duration;
        let effective = match segment_count {
            Some(count) => duration / count as f64,
            None => segment_duration,
        };
        if effective <= 0.0 || effective.is_nan() {
            return Err(SplitError::InvalidDuration { seconds: effective });
        }

        let count = match segment_count {
            Some(count) => count as u64,
            None => (duration / effective).ceil() as u64,
        };

        let mut set = CutPointSet::for_video(metadata);
        for i in 1..count {
            let point = i as f64 * effective;
            // Never emit a point that would leave a trailing segment
            // shorter than one second.
            if point >= set.ceiling() {
                break;
            }
            set.insert(point)?;
        }

        info!(
            cut_points = set.len(),
            segment_seconds = effective,
            "planned time-based split"
        );
        Ok(set)
    }

    fn plan_manual(&self, metadata: &VideoMetadata, points: &[f64]) -> SplitResult<CutPointSet> {
        let mut set = CutPointSet::for_video(metadata);
        for &point in points {
            set.insert(point)?;
        }
        info!(cut_points = set.len(), "planned manual split");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(duration: f64) -> VideoMetadata {
        VideoMetadata {
            path: "/videos/input.mp4".into(),
            filename: "input.mp4".to_string(),
            duration,
            width: 1280,
            height: 720,
            fps: 25.0,
            bitrate: 2_000_000,
            format: "mp4".to_string(),
            size_bytes: 50_000_000,
        }
    }

    fn scene(time_seconds: f64) -> ScenePoint {
        ScenePoint {
            time_seconds,
            confidence: 1.0,
            frame_number: 0,
        }
    }

    #[test]
    fn test_time_based_fixed_interval() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::TimeBased {
            segment_duration: 60.0,
            segment_count: None,
        };
        let set = planner.plan(&strategy, &meta, None).unwrap();
        assert_eq!(
            set.points(),
            &[60.0, 120.0, 180.0, 240.0, 300.0, 360.0, 420.0, 480.0, 540.0]
        );
    }

    #[test]
    fn test_time_based_drops_points_at_ceiling() {
        // 599 is the ceiling for a 600s video; stride 599.5 would put
        // the first point past it.
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::TimeBased {
            segment_duration: 599.5,
            segment_count: None,
        };
        let set = planner.plan(&strategy, &meta, None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_time_based_with_count() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::TimeBased {
            segment_duration: 0.0,
            segment_count: Some(4),
        };
        let set = planner.plan(&strategy, &meta, None).unwrap();
        assert_eq!(set.points(), &[150.0, 300.0, 450.0]);
    }

    #[test]
    fn test_time_based_invalid_duration() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::TimeBased {
            segment_duration: -3.0,
            segment_count: None,
        };
        assert!(matches!(
            planner.plan(&strategy, &meta, None),
            Err(SplitError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_scene_based_collapses_clusters() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::SceneBased {
            threshold: 0.3,
            min_scene_duration: 2.0,
        };
        let scenes = vec![scene(1.0), scene(1.5), scene(10.0), scene(10.2)];
        let set = planner.plan(&strategy, &meta, Some(&scenes)).unwrap();
        assert_eq!(set.points(), &[1.0, 10.0]);
    }

    #[test]
    fn test_scene_based_rejects_bad_threshold() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::SceneBased {
            threshold: 0.05,
            min_scene_duration: 2.0,
        };
        assert!(matches!(
            planner.plan(&strategy, &meta, Some(&[])),
            Err(SplitError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_manual_point_at_ceiling_rejected() {
        // 01:30:00 on a 5400s video sits exactly at duration, past the
        // 5399s ceiling; 01:29:00 is fine.
        let meta = metadata(5400.0);
        let planner = SplitPlanner::new(&meta);

        let rejected = SplitStrategy::ManualPoints {
            points: vec![5400.0],
        };
        assert!(matches!(
            planner.plan(&rejected, &meta, None),
            Err(SplitError::PointOutOfRange { point, ceiling })
                if point == 5400.0 && ceiling == 5399.0
        ));

        let accepted = SplitStrategy::ManualPoints {
            points: vec![5340.0],
        };
        let set = planner.plan(&accepted, &meta, None).unwrap();
        assert_eq!(set.points(), &[5340.0]);
    }

    #[test]
    fn test_manual_duplicate_rejected() {
        let meta = metadata(600.0);
        let planner = SplitPlanner::new(&meta);
        let strategy = SplitStrategy::ManualPoints {
            points: vec![30.0, 90.0, 30.0],
        };
        assert!(matches!(
            planner.plan(&strategy, &meta, None),
            Err(SplitError::DuplicatePoint { point }) if point == 30.0
        ));
    }

    #[test]
    fn test_manual_upsert_keeps_sorted() {
        let meta = metadata(600.0);
        let mut planner = SplitPlanner::new(&meta);
        planner.add_point(300.0).unwrap();
        planner.add_point(60.0).unwrap();
        planner.add_point(180.0).unwrap();
        assert_eq!(planner.manual_points(), &[60.0, 180.0, 300.0]);

        assert!(matches!(
            planner.add_point(180.0),
            Err(SplitError::DuplicatePoint { .. })
        ));

        assert_eq!(planner.remove_point(0), Some(60.0));
        assert_eq!(planner.manual_points(), &[180.0, 300.0]);
        assert_eq!(planner.remove_point(9), None);
    }

    #[test]
    fn test_all_strategies_respect_bounds() {
        let meta = metadata(120.0);
        let planner = SplitPlanner::new(&meta);
        let strategies = vec![
            SplitStrategy::TimeBased {
                segment_duration: 7.0,
                segment_count: None,
            },
            SplitStrategy::TimeBased {
                segment_duration: 0.0,
                segment_count: Some(9),
            },
            SplitStrategy::ManualPoints {
                points: vec![5.0, 50.5, 118.9],
            },
        ];
        for strategy in strategies {
            let set = planner.plan(&strategy, &meta, None).unwrap();
            for &point in set.points() {
                assert!(point >= 0.0 && point < 119.0, "{} out of bounds", point);
            }
        }
    }
}
