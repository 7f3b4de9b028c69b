//! CLI module for SplitX
//!
//! This module handles command-line argument parsing and command
//! execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// SplitX CLI Video Splitter
///
/// Splits a video into segments by fixed intervals, detected scene
/// changes, or manually chosen timestamps.
#[derive(Parser)]
#[command(name = "splitx")]
#[command(about = "SplitX - Split videos by intervals, scenes, or manual cut points")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Split a video into segments
    Split(args::SplitArgs),
    /// Inspect video file information
    Inspect(args::InspectArgs),
    /// Preview detected scene changes
    Scenes(args::ScenesArgs),
}
