//! Split request construction

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::{SplitError, SplitResult};
use crate::domain::model::{SplitRequest, SplitStrategy};

/// Builds the execution request handed to the media engine.
pub struct SplitRequestBuilder;

impl SplitRequestBuilder {
    /// Build a fully specified request.
    ///
    /// The strategy is validated again here rather than trusted: a
    /// request can be assembled by an external caller that never went
    /// through the planner. An empty `output_dir` falls back to the
    /// source file's parent directory.
    pub fn build(
        source_path: &Path,
        output_dir: Option<&Path>,
        output_format: &str,
        strategy: &SplitStrategy,
    ) -> SplitResult<SplitRequest> {
        strategy.validate()?;

        let output_dir = match output_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => Self::derive_output_dir(source_path)?,
        };

        let output_format = if output_format.is_empty() {
            "mp4".to_string()
        } else {
            output_format.to_string()
        };

        debug!(
            source = %source_path.display(),
            output = %output_dir.display(),
            format = %output_format,
            "built split request"
        );

        Ok(SplitRequest {
            source_path: source_path.to_path_buf(),
            output_dir,
            output_format,
            strategy: strategy.clone(),
        })
    }

    fn derive_output_dir(source_path: &Path) -> SplitResult<PathBuf> {
        match source_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            _ => Err(SplitError::MissingOutputDirectory {
                source_path: source_path.display().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_explicit_output_dir() {
        let strategy = SplitStrategy::TimeBased {
            segment_duration: 60.0,
            segment_count: None,
        };
        let request = SplitRequestBuilder::build(
            Path::new("/videos/input.mp4"),
            Some(Path::new("/out")),
            "mp4",
            &strategy,
        )
        .unwrap();
        assert_eq!(request.output_dir, PathBuf::from("/out"));
        assert_eq!(request.output_format, "mp4");
    }

    #[test]
    fn test_build_derives_output_dir_from_source_parent() {
        let strategy = SplitStrategy::ManualPoints { points: vec![30.0] };
        let request =
            SplitRequestBuilder::build(Path::new("/videos/input.mp4"), None, "mkv", &strategy)
                .unwrap();
        assert_eq!(request.output_dir, PathBuf::from("/videos"));
    }

    #[test]
    fn test_build_fails_without_any_output_dir() {
        let strategy = SplitStrategy::ManualPoints { points: vec![30.0] };
        let result = SplitRequestBuilder::build(Path::new("input.mp4"), None, "mp4", &strategy);
        assert!(matches!(
            result,
            Err(SplitError::MissingOutputDirectory { .. })
        ));
    }

    #[test]
    fn test_build_revalidates_strategy() {
        let strategy = SplitStrategy::SceneBased {
            threshold: 2.0,
            min_scene_duration: 2.0,
        };
        let result = SplitRequestBuilder::build(
            Path::new("/videos/input.mp4"),
            Some(Path::new("/out")),
            "mp4",
            &strategy,
        );
        assert!(matches!(result, Err(SplitError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_build_defaults_format() {
        let strategy = SplitStrategy::TimeBased {
            segment_duration: 60.0,
            segment_count: None,
        };
        let request = SplitRequestBuilder::build(
            Path::new("/videos/input.mp4"),
            Some(Path::new("/out")),
            "",
            &strategy,
        )
        .unwrap();
        assert_eq!(request.output_format, "mp4");
    }
}
