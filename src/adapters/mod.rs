// Adapters - Concrete implementations of the ports

pub mod engine_ffmpeg;
pub mod platform_native;

pub use engine_ffmpeg::FfmpegEngine;
pub use platform_native::NativePlatform;
