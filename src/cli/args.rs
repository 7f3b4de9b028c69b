//! Command-line argument definitions

use clap::Args;

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input video file path (opens a file picker when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output directory (default: the input file's directory)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Output container format
    #[arg(long, default_value = "mp4")]
    pub format: String,

    /// Split every fixed interval (HH:MM:SS, MM:SS, or seconds)
    #[arg(long, conflicts_with_all = ["count", "scenes", "at"])]
    pub every: Option<String>,

    /// Split into a fixed number of equal segments
    #[arg(long, conflicts_with_all = ["scenes", "at"])]
    pub count: Option<u32>,

    /// Split at detected scene changes
    #[arg(long, conflicts_with = "at")]
    pub scenes: bool,

    /// Scene change threshold (0.1 - 1.0)
    #[arg(long, default_value = "0.3")]
    pub threshold: f32,

    /// Minimum scene duration in seconds
    #[arg(long, default_value = "2.0")]
    pub min_scene: f64,

    /// Manual cut point (repeatable; HH:MM:SS, MM:SS, or seconds)
    #[arg(long)]
    pub at: Vec<String>,

    /// Choose the output directory with a folder picker
    #[arg(long, conflicts_with = "output_dir")]
    pub pick_output: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Reveal the first produced segment in the file manager
    #[arg(long)]
    pub reveal: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path (opens a file picker when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the scenes command
#[derive(Args, Debug)]
pub struct ScenesArgs {
    /// Input video file path (opens a file picker when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Scene change threshold (0.1 - 1.0)
    #[arg(long, default_value = "0.3")]
    pub threshold: f32,

    /// Minimum scene duration in seconds
    #[arg(long, default_value = "2.0")]
    pub min_scene: f64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
