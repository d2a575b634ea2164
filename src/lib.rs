//! # Video Splitter
//!
//! Split a video into clips, optionally reframing each clip to portrait or
//! landscape and drawing a caption on it.
//!
//! All decoding and encoding is done by FFmpeg. This library works out what
//! to ask it: which segments to cut, which filter graph each one needs, and
//! the exact command line for every job.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use video_splitter::{
//!     config::Config,
//!     media::FfmpegTool,
//!     pipeline::{SplitEngine, SplitRequest},
//!     render::{AspectMode, RenderConfig},
//!     split::SplitMode,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let tool = FfmpegTool::locate(&config.tools, config.encoding.clone())?;
//! let engine = SplitEngine::new(Arc::new(tool));
//!
//! let report = engine.split(&SplitRequest {
//!     input: "talk.mp4".into(),
//!     output_dir: "output".into(),
//!     mode: SplitMode::Fixed,
//!     render: RenderConfig::new(AspectMode::Portrait),
//! }).await?;
//!
//! println!("Wrote {} clips", report.outputs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`split`] - Time parsing and segment planning
//! - [`render`] - Aspect handling, captions and filter graph composition
//! - [`media`] - The external tool seam and its FFmpeg implementation
//! - [`pipeline`] - Runs a planned split job by job
//! - [`config`] - Configuration management
//!
//! ## Custom Media Tools
//!
//! Anything implementing [`MediaTool`](media::MediaTool) can stand in for
//! FFmpeg, which is how the pipeline is tested:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use video_splitter::media::{EncodeRequest, MediaTool};
//! use video_splitter::Result;
//!
//! struct DryRun;
//!
//! impl MediaTool for DryRun {
//!     fn name(&self) -> &str {
//!         "dry-run"
//!     }
//!
//!     fn probe_duration(&self, _input: &Path) -> Result<f64> {
//!         Ok(90.0)
//!     }
//!
//!     fn encode(&self, request: &EncodeRequest) -> Result<()> {
//!         println!("would write {:?}", request.output);
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod render;
pub mod split;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, SplitterError},
    media::{FfmpegTool, MediaTool},
    pipeline::{SplitEngine, SplitRequest},
    render::RenderConfig,
    split::SplitMode,
};
