//! # External Media Tools
//!
//! Probing and encoding are delegated to a [`MediaTool`]. The production
//! implementation shells out to FFmpeg; tests plug in a recording fake.

pub mod ffmpeg;
pub mod request;
pub mod traits;

pub use ffmpeg::FfmpegTool;
pub use request::{EncodeRequest, VideoEncoding};
pub use traits::MediaTool;
