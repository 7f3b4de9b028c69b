//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use crate::adapters::{FfmpegEngine, NativePlatform};
use crate::app::SplitSession;
use crate::cli::args::{InspectArgs, ScenesArgs, SplitArgs};
use crate::domain::model::{SplitStrategy, TimeCode};
use crate::progress::{LogSink, ProgressReporter};
use crate::reconcile::Outcome;

/// Build a session wired to the real ffmpeg engine and the native
/// platform, with the source loaded from `input` or an interactive
/// picker. Returns None when the user cancels the picker.
async fn open_session(input: Option<&str>) -> Result<Option<SplitSession>> {
    let engine = Arc::new(FfmpegEngine::discover().await);
    let platform = Arc::new(NativePlatform::new());
    let mut session = SplitSession::new(engine, platform);

    match input {
        Some(path) => {
            session.load_source(&PathBuf::from(path)).await?;
        }
        None => {
            if session.pick_source().await?.is_none() {
                println!("No file selected");
                return Ok(None);
            }
        }
    }
    Ok(Some(session))
}

fn resolve_strategy(args: &SplitArgs) -> Result<SplitStrategy> {
    if !args.at.is_empty() {
        let mut points = Vec::with_capacity(args.at.len());
        for raw in &args.at {
            points.push(TimeCode::parse(raw)?);
        }
        return Ok(SplitStrategy::ManualPoints { points });
    }
    if args.scenes {
        return Ok(SplitStrategy::SceneBased {
            threshold: args.threshold,
            min_scene_duration: args.min_scene,
        });
    }
    if args.count.is_some() || args.every.is_some() {
        let segment_duration = match &args.every {
            Some(raw) => TimeCode::parse(raw)?,
            None => 0.0,
        };
        return Ok(SplitStrategy::TimeBased {
            segment_duration,
            segment_count: args.count,
        });
    }
    bail!("choose a strategy: --every, --count, --scenes, or --at");
}

/// Execute the split command
pub async fn split(args: SplitArgs) -> Result<()> {
    let strategy = resolve_strategy(&args)?;
    info!(%strategy, "starting split");

    let Some(session) = open_session(args.input.as_deref()).await? else {
        return Ok(());
    };

    let reporter = ProgressReporter::new();
    reporter.add_sink(Box::new(LogSink));

    let output_dir = if args.pick_output {
        // Cancelling the picker falls back to the default directory.
        session.pick_output_dir().await
    } else {
        args.output_dir.as_ref().map(PathBuf::from)
    };
    let outcome = match session
        .execute(&strategy, output_dir.as_deref(), &args.format, &reporter)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) if e.is_invalid_strategy() => bail!("invalid strategy: {}", e),
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    match &outcome {
        Outcome::Completed { files } | Outcome::PartialFailure { files, .. } => {
            if args.reveal {
                if let Some(first) = files.first() {
                    session.reveal(std::path::Path::new(&first.filepath)).await?;
                }
            }
            Ok(())
        }
        Outcome::Failed { reason } => bail!("split failed: {}", reason),
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Completed { files } => {
            println!("Produced {} segment(s):", files.len());
            for file in files {
                println!("  {}", file.filepath);
            }
        }
        Outcome::PartialFailure { files, errors } => {
            println!("Split finished with {} error(s):", errors.len());
            for error in errors {
                println!("  error: {}", error);
            }
            println!("Recovered {} segment(s):", files.len());
            for file in files {
                println!("  {}", file.filepath);
            }
        }
        Outcome::Failed { reason } => {
            println!("Split failed: {}", reason);
        }
    }
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs) -> Result<()> {
    let Some(session) = open_session(args.input.as_deref()).await? else {
        return Ok(());
    };
    let metadata = session
        .metadata()
        .ok_or_else(|| anyhow::anyhow!("no source loaded"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
    } else {
        println!("File:       {}", metadata.filename);
        println!("Duration:   {}", TimeCode::format(metadata.duration));
        println!("Resolution: {}x{}", metadata.width, metadata.height);
        println!("Frame rate: {:.2} fps", metadata.fps);
        println!("Bitrate:    {} b/s", metadata.bitrate);
        println!("Format:     {}", metadata.format);
        println!("Size:       {}", format_file_size(metadata.size_bytes));
    }
    Ok(())
}

/// Execute the scenes command
pub async fn scenes(args: ScenesArgs) -> Result<()> {
    let Some(session) = open_session(args.input.as_deref()).await? else {
        return Ok(());
    };
    let scenes = session.detect_scenes(args.threshold, args.min_scene).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scenes)?);
    } else {
        println!("Detected {} scene change(s):", scenes.len());
        for (index, scene) in scenes.iter().enumerate() {
            println!(
                "  {:>3}. {}  (confidence {:.2})",
                index + 1,
                TimeCode::format(scene.time_seconds),
                scene.confidence
            );
        }
    }
    Ok(())
}

fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> SplitArgs {
        SplitArgs {
            input: None,
            output_dir: None,
            format: "mp4".to_string(),
            every: None,
            count: None,
            scenes: false,
            threshold: 0.3,
            min_scene: 2.0,
            at: vec![],
            pick_output: false,
            json: false,
            reveal: false,
        }
    }

    #[test]
    fn test_resolve_strategy_every() {
        let mut args = base_args();
        args.every = Some("01:00".to_string());
        let strategy = resolve_strategy(&args).unwrap();
        assert_eq!(
            strategy,
            SplitStrategy::TimeBased {
                segment_duration: 60.0,
                segment_count: None
            }
        );
    }

    #[test]
    fn test_resolve_strategy_manual_parses_timecodes() {
        let mut args = base_args();
        args.at = vec!["30".to_string(), "01:30".to_string()];
        let strategy = resolve_strategy(&args).unwrap();
        assert_eq!(
            strategy,
            SplitStrategy::ManualPoints {
                points: vec![30.0, 90.0]
            }
        );
    }

    #[test]
    fn test_resolve_strategy_requires_a_choice() {
        assert!(resolve_strategy(&base_args()).is_err());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
