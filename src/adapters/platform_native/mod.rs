//! Native platform adapter
//!
//! Interactive file pickers via rfd plus the file-management actions
//! offered after a confirmed outcome (open, reveal).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::{SplitError, SplitResult};
use crate::ports::PlatformPort;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Platform operations backed by the host desktop environment.
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }

    async fn run_opener(program: &str, args: Vec<String>) -> SplitResult<()> {
        let status = Command::new(program)
            .args(&args)
            .status()
            .await
            .map_err(SplitError::Io)?;
        if !status.success() {
            return Err(SplitError::Io(std::io::Error::other(format!(
                "{} exited with {}",
                program, status
            ))));
        }
        Ok(())
    }
}

impl Default for NativePlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformPort for NativePlatform {
    async fn select_file_path(&self) -> Option<PathBuf> {
        // rfd dialogs block, so they run off the async executor.
        tokio::task::spawn_blocking(|| {
            rfd::FileDialog::new()
                .add_filter("Video files", VIDEO_EXTENSIONS)
                .pick_file()
        })
        .await
        .ok()
        .flatten()
    }

    async fn select_directory_path(&self) -> Option<PathBuf> {
        tokio::task::spawn_blocking(|| rfd::FileDialog::new().pick_folder())
            .await
            .ok()
            .flatten()
    }

    async fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn open_file(&self, path: &Path) -> SplitResult<()> {
        debug!(path = %path.display(), "opening file");
        #[cfg(target_os = "macos")]
        let (program, args) = ("open", vec![path.display().to_string()]);
        #[cfg(target_os = "windows")]
        let (program, args) = (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), path.display().to_string()],
        );
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let (program, args) = ("xdg-open", vec![path.display().to_string()]);

        Self::run_opener(program, args).await
    }

    async fn reveal_in_file_manager(&self, path: &Path) -> SplitResult<()> {
        debug!(path = %path.display(), "revealing in file manager");
        #[cfg(target_os = "macos")]
        let (program, args) = ("open", vec!["-R".to_string(), path.display().to_string()]);
        #[cfg(target_os = "windows")]
        let (program, args) = (
            "explorer",
            vec![format!("/select,{}", path.display())],
        );
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let (program, args) = {
            // No portable "reveal" on Linux; open the containing dir.
            let dir = path.parent().unwrap_or(path);
            ("xdg-open", vec![dir.display().to_string()])
        };

        Self::run_opener(program, args).await
    }
}
