// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::SplitError;

/// Textual time codec. Converts between seconds and the `H:MM:SS` /
/// `MM:SS` forms used on the command line and in display output.
pub struct TimeCode;

impl TimeCode {
    /// Parse a time string to seconds.
    ///
    /// Accepts `H:MM:SS`, `MM:SS`, or a bare (possibly fractional)
    /// number of seconds.
    pub fn parse(input: &str) -> Result<f64, SplitError> {
        let trimmed = input.trim();

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.len() {
            1 => {
                let seconds: f64 =
                    trimmed.parse().map_err(|_| SplitError::InvalidTimeFormat {
                        input: input.to_string(),
                    })?;
                if seconds.is_nan() || seconds < 0.0 {
                    return Err(SplitError::InvalidTimeFormat {
                        input: input.to_string(),
                    });
                }
                Ok(seconds)
            }
            2 => {
                let minutes = Self::parse_component(parts[0], input)?;
                let seconds = Self::parse_component(parts[1], input)?;
                Ok(minutes * 60.0 + seconds)
            }
            3 => {
                let hours = Self::parse_component(parts[0], input)?;
                let minutes = Self::parse_component(parts[1], input)?;
                let seconds = Self::parse_component(parts[2], input)?;
                Ok(hours * 3600.0 + minutes * 60.0 + seconds)
            }
            _ => Err(SplitError::InvalidTimeFormat {
                input: input.to_string(),
            }),
        }
    }

    fn parse_component(part: &str, original: &str) -> Result<f64, SplitError> {
        let value: f64 = part.parse().map_err(|_| SplitError::InvalidTimeFormat {
            input: original.to_string(),
        })?;
        if value.is_nan() || value < 0.0 {
            return Err(SplitError::InvalidTimeFormat {
                input: original.to_string(),
            });
        }
        Ok(value)
    }

    /// Format seconds as `HH:MM:SS` when at least an hour, `MM:SS`
    /// otherwise. Fractional seconds are floored.
    pub fn format(seconds: f64) -> String {
        let total = seconds.floor().max(0.0) as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let secs = total % 60;

        if seconds >= 3600.0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }
}

/// Metadata probed from a source video. Immutable once fetched and
/// invalidated whenever the source path changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub path: PathBuf,
    pub filename: String,
    /// Total duration in seconds, always > 0 for a successful probe.
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub bitrate: u64,
    pub format: String,
    pub size_bytes: u64,
}

impl VideoMetadata {
    /// Exclusive upper bound for cut points: a point at or beyond this
    /// would leave a trailing segment shorter than one second.
    pub fn cut_ceiling(&self) -> f64 {
        self.duration - 1.0
    }
}

fn default_min_scene_duration() -> f64 {
    2.0
}

/// Split strategy. Exactly one variant is active; the serde tag names
/// match the request wire shape (`time`, `scenes`, `manual`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SplitStrategy {
    #[serde(rename = "time")]
    TimeBased {
        segment_duration: f64,
        segment_count: Option<u32>,
    },
    #[serde(rename = "scenes")]
    SceneBased {
        threshold: f32,
        #[serde(default = "default_min_scene_duration")]
        min_scene_duration: f64,
    },
    #[serde(rename = "manual")]
    ManualPoints { points: Vec<f64> },
}

impl SplitStrategy {
    /// Validate strategy parameters. Called by the planner and
    /// re-checked by the request builder, since strategies can be
    /// supplied directly by an external caller.
    pub fn validate(&self) -> Result<(), SplitError> {
        match self {
            SplitStrategy::TimeBased {
                segment_duration,
                segment_count,
            } => {
                if let Some(count) = segment_count {
                    if *count == 0 {
                        return Err(SplitError::InvalidDuration { seconds: 0.0 });
                    }
                } else if *segment_duration <= 0.0 || segment_duration.is_nan() {
                    return Err(SplitError::InvalidDuration {
                        seconds: *segment_duration,
                    });
                }
                Ok(())
            }
            SplitStrategy::SceneBased { threshold, .. } => {
                if !(0.1..=1.0).contains(threshold) {
                    return Err(SplitError::InvalidThreshold {
                        threshold: *threshold,
                    });
                }
                Ok(())
            }
            SplitStrategy::ManualPoints { points } => {
                if points.is_empty() {
                    return Err(SplitError::EmptyManualSet);
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::TimeBased {
                segment_duration,
                segment_count,
            } => match segment_count {
                Some(count) => write!(f, "time-based ({} segments)", count),
                None => write!(f, "time-based (every {}s)", segment_duration),
            },
            SplitStrategy::SceneBased { threshold, .. } => {
                write!(f, "scene-based (threshold {})", threshold)
            }
            SplitStrategy::ManualPoints { points } => {
                write!(f, "manual ({} points)", points.len())
            }
        }
    }
}

/// An ordered set of cut points in seconds.
///
/// Invariants: sorted ascending, no duplicates, every point in
/// `[0, ceiling)` where `ceiling = duration - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPointSet {
    points: Vec<f64>,
    ceiling: f64,
}

impl CutPointSet {
    /// Create an empty set bounded by `ceiling` (exclusive).
    pub fn new(ceiling: f64) -> Self {
        Self {
            points: Vec::new(),
            ceiling,
        }
    }

    /// Create a set bounded by the metadata's cut ceiling.
    pub fn for_video(metadata: &VideoMetadata) -> Self {
        Self::new(metadata.cut_ceiling())
    }

    /// Insert a cut point, keeping the set sorted. Insertion order
    /// does not matter; the result is always sorted ascending.
    pub fn insert(&mut self, point: f64) -> Result<(), SplitError> {
        if point.is_nan() || point < 0.0 || point >= self.ceiling {
            return Err(SplitError::PointOutOfRange {
                point,
                ceiling: self.ceiling,
            });
        }
        match self
            .points
            .binary_search_by(|p| p.partial_cmp(&point).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(_) => Err(SplitError::DuplicatePoint { point }),
            Err(index) => {
                self.points.insert(index, point);
                Ok(())
            }
        }
    }

    /// Remove exactly one point by index. Later indices shift down.
    pub fn remove(&mut self, index: usize) -> Option<f64> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of segments this set will produce (cuts + 1).
    pub fn segment_count(&self) -> usize {
        self.points.len() + 1
    }
}

/// Fully specified execution order sent to the media engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: String,
    pub strategy: SplitStrategy,
}

/// Raw result payload reported by the media engine after executing a
/// split. Field names follow the engine wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentResult {
    pub success: bool,
    #[serde(rename = "output_files")]
    pub produced_files: Vec<PathBuf>,
    pub errors: Vec<String>,
    #[serde(rename = "processing_time")]
    pub elapsed_seconds: f64,
}

/// A detected scene change reported by the media engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenePoint {
    #[serde(rename = "time")]
    pub time_seconds: f64,
    pub confidence: f32,
    pub frame_number: u64,
}
