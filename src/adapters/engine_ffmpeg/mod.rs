//! FFmpeg engine adapter
//!
//! Shells out to the ffmpeg/ffprobe binaries for metadata probing,
//! scene detection, and segment execution.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::{SplitError, SplitResult};
use crate::domain::model::{ScenePoint, SegmentResult, SplitRequest, VideoMetadata};
use crate::ports::{MediaEnginePort, SegmentProgress};

const SUPPORTED_FORMATS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// FFmpeg-based media engine.
pub struct FfmpegEngine {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegEngine {
    /// Locate the ffmpeg/ffprobe binaries, trying the common install
    /// locations before falling back to PATH lookup.
    pub async fn discover() -> Self {
        let ffmpeg_path = Self::find_binary(&[
            "ffmpeg",
            "/usr/local/bin/ffmpeg",
            "/opt/homebrew/bin/ffmpeg",
            "/usr/bin/ffmpeg",
        ])
        .await;
        let ffprobe_path = Self::find_binary(&[
            "ffprobe",
            "/usr/local/bin/ffprobe",
            "/opt/homebrew/bin/ffprobe",
            "/usr/bin/ffprobe",
        ])
        .await;

        debug!(%ffmpeg_path, %ffprobe_path, "resolved engine binaries");
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    /// Create an engine with explicit binary paths.
    pub fn with_paths(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    async fn find_binary(candidates: &[&str]) -> String {
        for candidate in candidates {
            let runs = Command::new(candidate)
                .arg("-version")
                .output()
                .await
                .map(|output| output.status.success())
                .unwrap_or(false);
            if runs {
                return candidate.to_string();
            }
        }
        candidates[0].to_string()
    }

    fn validate_source(path: &Path) -> SplitResult<()> {
        if !path.exists() {
            return Err(SplitError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        if !path.is_file() {
            return Err(SplitError::UnsupportedFormat {
                message: format!("{} is not a file", path.display()),
            });
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_FORMATS.contains(&extension.as_str()) {
            return Err(SplitError::UnsupportedFormat {
                message: format!("unsupported container: {}", extension),
            });
        }
        Ok(())
    }

    fn parse_metadata(path: &Path, json: &Value) -> SplitResult<VideoMetadata> {
        let format = json
            .get("format")
            .ok_or_else(|| SplitError::EngineFailure {
                message: "ffprobe output has no format section".to_string(),
            })?;

        let duration: f64 = format
            .get("duration")
            .and_then(|d| d.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        if duration <= 0.0 {
            return Err(SplitError::UnsupportedFormat {
                message: format!("could not determine duration of {}", path.display()),
            });
        }

        let size_bytes: u64 = format
            .get("size")
            .and_then(|s| s.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let format_name = format
            .get("format_name")
            .and_then(|f| f.as_str())
            .unwrap_or("unknown");
        let bitrate: u64 = format
            .get("bit_rate")
            .and_then(|b| b.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let streams = json
            .get("streams")
            .and_then(|s| s.as_array())
            .ok_or_else(|| SplitError::EngineFailure {
                message: "ffprobe output has no streams section".to_string(),
            })?;
        let video_stream = streams
            .iter()
            .find(|stream| {
                stream.get("codec_type").and_then(|t| t.as_str()) == Some("video")
            })
            .ok_or_else(|| SplitError::UnsupportedFormat {
                message: format!("no video stream in {}", path.display()),
            })?;

        let width = video_stream
            .get("width")
            .and_then(|w| w.as_u64())
            .unwrap_or(0) as u32;
        let height = video_stream
            .get("height")
            .and_then(|h| h.as_u64())
            .unwrap_or(0) as u32;
        let fps = video_stream
            .get("r_frame_rate")
            .and_then(|r| r.as_str())
            .and_then(Self::parse_rational)
            .unwrap_or(0.0);

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(VideoMetadata {
            path: path.to_path_buf(),
            filename,
            duration,
            width,
            height,
            fps,
            bitrate,
            format: format_name.to_string(),
            size_bytes,
        })
    }

    /// Parse an ffprobe rational like "30000/1001".
    fn parse_rational(raw: &str) -> Option<f64> {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() != 2 {
            return None;
        }
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den == 0.0 {
            None
        } else {
            Some(num / den)
        }
    }

    /// Scene detection output arrives as `showinfo` lines on stderr;
    /// each carries a `pts_time:` field.
    fn parse_scene_output(stderr: &[u8], min_duration: f64) -> Vec<ScenePoint> {
        let output = String::from_utf8_lossy(stderr);
        let mut scenes = Vec::new();
        let mut last_time = 0.0;

        for line in output.lines() {
            if !line.contains("pts_time:") {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            for window in parts.windows(2) {
                if window[0] == "pts_time:" {
                    if let Ok(time) = window[1].parse::<f64>() {
                        if time - last_time >= min_duration {
                            scenes.push(ScenePoint {
                                time_seconds: time,
                                confidence: 1.0,
                                frame_number: 0,
                            });
                            last_time = time;
                        }
                    }
                    break;
                }
            }
        }
        scenes
    }

    async fn probe_duration(&self, path: &Path) -> SplitResult<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| SplitError::EngineUnavailable {
                message: format!("failed to run ffprobe: {}", e),
            })?;

        if !output.status.success() {
            return Err(SplitError::EngineFailure {
                message: format!("ffprobe failed for {}", path.display()),
            });
        }

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .map_err(|_| SplitError::EngineFailure {
                message: "ffprobe reported an unparsable duration".to_string(),
            })
    }

    /// Cut one segment by re-encoding, for frame-accurate boundaries.
    async fn cut_segment(
        &self,
        request: &SplitRequest,
        start: f64,
        end: f64,
        index: usize,
    ) -> SplitResult<std::path::PathBuf> {
        let stem = request
            .source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("segment");
        let output_path = request.output_dir.join(format!(
            "segment_{}_{:03}.{}",
            stem,
            index + 1,
            request.output_format
        ));

        let duration = end - start;
        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .args(["-ss", &start.to_string()])
            .arg("-i")
            .arg(&request.source_path)
            .args(["-t", &duration.to_string()])
            .args(["-c:v", "libx264", "-c:a", "aac"])
            .args(["-preset", "fast", "-crf", "23"])
            .args(["-avoid_negative_ts", "make_zero"])
            .arg(&output_path)
            .output()
            .await
            .map_err(|e| SplitError::EngineUnavailable {
                message: format!("failed to run ffmpeg: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SplitError::EngineFailure {
                message: format!("segment {}: {}", index + 1, stderr.trim()),
            });
        }

        Ok(output_path)
    }
}

#[async_trait]
impl MediaEnginePort for FfmpegEngine {
    async fn probe_metadata(&self, path: &Path) -> SplitResult<VideoMetadata> {
        Self::validate_source(path)?;

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| SplitError::EngineUnavailable {
                message: format!("failed to run ffprobe: {}", e),
            })?;

        if !output.status.success() {
            return Err(SplitError::EngineFailure {
                message: format!(
                    "ffprobe failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let json: Value =
            serde_json::from_slice(&output.stdout).map_err(|e| SplitError::EngineFailure {
                message: format!("failed to parse ffprobe output: {}", e),
            })?;

        Self::parse_metadata(path, &json)
    }

    async fn detect_scenes(
        &self,
        path: &Path,
        threshold: f32,
        min_duration: f64,
    ) -> SplitResult<Vec<ScenePoint>> {
        Self::validate_source(path)?;
        info!(threshold, min_duration, "detecting scene changes");

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(path)
            .args([
                "-vf",
                &format!("select='gt(scene,{})',showinfo", threshold),
                "-f",
                "null",
                "-",
            ])
            .output()
            .await
            .map_err(|e| SplitError::EngineUnavailable {
                message: format!("failed to run ffmpeg: {}", e),
            })?;

        let scenes = Self::parse_scene_output(&output.stderr, min_duration);
        info!(count = scenes.len(), "scene detection finished");
        Ok(scenes)
    }

    async fn execute(
        &self,
        request: &SplitRequest,
        cut_points: &[f64],
        progress: SegmentProgress<'_>,
    ) -> SplitResult<SegmentResult> {
        Self::validate_source(&request.source_path)?;
        let started = Instant::now();

        let total_duration = self.probe_duration(&request.source_path).await?;

        // Expand cut points into adjacent (start, end) ranges, with a
        // final range running to the end of the video.
        let mut segments = Vec::new();
        let mut start = 0.0;
        for &end in cut_points {
            segments.push((start, end));
            start = end;
        }
        if start < total_duration {
            segments.push((start, total_duration));
        }

        let total = segments.len();
        let mut produced_files = Vec::new();
        let mut errors = Vec::new();

        for (index, &(seg_start, seg_end)) in segments.iter().enumerate() {
            info!(
                "processing segment {} of {}: {:.2}s - {:.2}s",
                index + 1,
                total,
                seg_start,
                seg_end
            );
            match self.cut_segment(request, seg_start, seg_end, index).await {
                Ok(path) => {
                    produced_files.push(path);
                    progress(index + 1, total);
                }
                Err(SplitError::EngineUnavailable { message }) => {
                    // The binary itself is gone; no point continuing.
                    return Err(SplitError::EngineUnavailable { message });
                }
                Err(e) => {
                    warn!("segment {} failed: {}", index + 1, e);
                    errors.push(e.to_string());
                }
            }
        }

        let success = errors.is_empty() || !produced_files.is_empty();
        Ok(SegmentResult {
            success,
            produced_files,
            errors,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rational() {
        assert_eq!(FfmpegEngine::parse_rational("30/1"), Some(30.0));
        assert_eq!(
            FfmpegEngine::parse_rational("30000/1001"),
            Some(30000.0 / 1001.0)
        );
        assert_eq!(FfmpegEngine::parse_rational("30/0"), None);
        assert_eq!(FfmpegEngine::parse_rational("30"), None);
    }

    #[test]
    fn test_parse_scene_output() {
        let stderr = b"[Parsed_showinfo_1 @ 0x1] n:0 pts:900 pts_time: 1.0 pos:100\n\
            [Parsed_showinfo_1 @ 0x1] n:1 pts:1800 pts_time: 1.5 pos:200\n\
            [Parsed_showinfo_1 @ 0x1] n:2 pts:9000 pts_time: 10.0 pos:300\n";
        let scenes = FfmpegEngine::parse_scene_output(stderr, 2.0);
        let times: Vec<f64> = scenes.iter().map(|s| s.time_seconds).collect();
        assert_eq!(times, vec![10.0]);

        let scenes = FfmpegEngine::parse_scene_output(stderr, 0.2);
        let times: Vec<f64> = scenes.iter().map(|s| s.time_seconds).collect();
        assert_eq!(times, vec![1.0, 1.5, 10.0]);
    }

    #[test]
    fn test_validate_source_missing_file() {
        let result = FfmpegEngine::validate_source(Path::new("/definitely/missing.mp4"));
        assert!(matches!(result, Err(SplitError::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_source_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not a video").unwrap();
        let result = FfmpegEngine::validate_source(&path);
        assert!(matches!(result, Err(SplitError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_validate_source_accepts_supported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mkv");
        std::fs::write(&path, b"").unwrap();
        assert!(FfmpegEngine::validate_source(&path).is_ok());
    }

    #[test]
    fn test_metadata_parse_from_ffprobe_json() {
        let json: Value = serde_json::from_str(
            r#"{
                "format": {
                    "duration": "600.5",
                    "size": "1000000",
                    "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                    "bit_rate": "4000000"
                },
                "streams": [
                    {"codec_type": "audio"},
                    {"codec_type": "video", "width": 1920, "height": 1080,
                     "r_frame_rate": "30000/1001"}
                ]
            }"#,
        )
        .unwrap();
        let metadata = FfmpegEngine::parse_metadata(Path::new("/v/clip.mp4"), &json).unwrap();
        assert_eq!(metadata.filename, "clip.mp4");
        assert_eq!(metadata.duration, 600.5);
        assert_eq!(metadata.width, 1920);
        assert_eq!(metadata.height, 1080);
        assert!((metadata.fps - 29.97).abs() < 0.01);
        assert_eq!(metadata.bitrate, 4_000_000);
    }

    #[test]
    fn test_metadata_parse_rejects_zero_duration() {
        let json: Value = serde_json::from_str(
            r#"{
                "format": {"duration": "0"},
                "streams": [{"codec_type": "video"}]
            }"#,
        )
        .unwrap();
        let result = FfmpegEngine::parse_metadata(Path::new("/v/clip.mp4"), &json);
        assert!(matches!(result, Err(SplitError::UnsupportedFormat { .. })));
    }
}
