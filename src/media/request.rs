use std::path::PathBuf;

use crate::render::{compose, BitrateCap, FilterGraph, RenderConfig};
use crate::split::SegmentJob;

/// What to do with the video stream
#[derive(Debug, Clone, PartialEq)]
pub enum VideoEncoding {
    /// Re-mux the original bitstream untouched
    StreamCopy,

    /// Decode, filter and encode again
    Reencode {
        filter_graph: FilterGraph,
        bitrate_cap: Option<BitrateCap>,
    },
}

impl VideoEncoding {
    /// Video path implied by a render configuration
    pub fn for_render(config: &RenderConfig) -> Self {
        match compose(config) {
            Some(filter_graph) => Self::Reencode {
                filter_graph,
                bitrate_cap: config.bitrate_cap,
            },
            None => Self::StreamCopy,
        }
    }

    pub fn filter_graph(&self) -> Option<&FilterGraph> {
        match self {
            Self::Reencode { filter_graph, .. } => Some(filter_graph),
            Self::StreamCopy => None,
        }
    }
}

/// A single encoder invocation
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Seek offset; `None` reads from the beginning
    pub start: Option<f64>,
    /// Output length; `None` reads to the end
    pub length: Option<f64>,
    pub video: VideoEncoding,
}

impl EncodeRequest {
    pub fn for_segment<P: Into<PathBuf>>(input: P, job: &SegmentJob, video: VideoEncoding) -> Self {
        Self {
            input: input.into(),
            output: job.output_path.clone(),
            start: Some(job.start),
            length: Some(job.length),
            video,
        }
    }

    /// Whole input, no seek and no length bound
    pub fn whole_file<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q, video: VideoEncoding) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            start: None,
            length: None,
            video,
        }
    }
}
