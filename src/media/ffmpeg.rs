use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::{EncodeConfig, ToolConfig};
use crate::error::{EncodeError, EnvironmentError, InputError, Result};
use crate::media::request::{EncodeRequest, VideoEncoding};
use crate::media::traits::MediaTool;

/// [`MediaTool`] backed by the `ffmpeg` and `ffprobe` command line tools
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    encoding: EncodeConfig,
    log_level: String,
}

impl FfmpegTool {
    /// Resolve both binaries, failing if either is missing.
    pub fn locate(tools: &ToolConfig, encoding: EncodeConfig) -> Result<Self> {
        let ffmpeg = locate_binary("ffmpeg", tools.configured_path("ffmpeg"))?;
        let ffprobe = locate_binary("ffprobe", tools.configured_path("ffprobe"))?;

        info!("Using ffmpeg at {:?}", ffmpeg);
        debug!("Using ffprobe at {:?}", ffprobe);

        Ok(Self::with_paths(ffmpeg, ffprobe, encoding).with_log_level(tools.log_level.clone()))
    }

    /// Build without checking that the binaries exist
    pub fn with_paths<P: Into<PathBuf>, Q: Into<PathBuf>>(ffmpeg: P, ffprobe: Q, encoding: EncodeConfig) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            encoding,
            log_level: "error".to_string(),
        }
    }

    pub fn with_log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.log_level = level.into();
        self
    }

    /// Arguments for `ffprobe` that print only the container duration
    pub fn probe_args(input: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            input.display().to_string(),
        ]
    }

    /// Arguments for `ffmpeg` that carry out `request`
    pub fn encode_args(&self, request: &EncodeRequest) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            self.log_level.clone(),
        ];

        if let Some(start) = request.start {
            args.push("-ss".into());
            args.push(format_seconds(start));
        }

        args.push("-i".into());
        args.push(request.input.display().to_string());

        match &request.video {
            VideoEncoding::Reencode { filter_graph, bitrate_cap } => {
                args.extend([
                    "-vf".to_string(),
                    filter_graph.to_string(),
                    "-c:v".to_string(),
                    self.encoding.video_codec.clone(),
                    "-preset".to_string(),
                    self.encoding.preset.clone(),
                    "-crf".to_string(),
                    self.encoding.crf.to_string(),
                ]);
                if self.encoding.faststart {
                    args.push("-movflags".into());
                    args.push("+faststart".into());
                }
                if let Some(cap) = bitrate_cap {
                    args.push("-x264-params".into());
                    args.push(cap.x264_params());
                }
            }
            VideoEncoding::StreamCopy => {
                args.push("-c:v".into());
                args.push("copy".into());
            }
        }

        args.extend([
            "-c:a".to_string(),
            self.encoding.audio_codec.clone(),
            "-b:a".to_string(),
            self.encoding.audio_bitrate.clone(),
        ]);

        if let Some(length) = request.length {
            args.push("-t".into());
            args.push(format_seconds(length));
        }

        args.push(request.output.display().to_string());
        args
    }
}

impl MediaTool for FfmpegTool {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn probe_duration(&self, input: &Path) -> Result<f64> {
        let probe_failed = |reason: String| InputError::ProbeFailed {
            path: input.display().to_string(),
            reason,
        };

        let output = Command::new(&self.ffprobe)
            .args(Self::probe_args(input))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| probe_failed(format!("failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(probe_failed(format!("ffprobe exited with {}: {}", output.status, stderr.trim())).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout)
            .ok_or_else(|| probe_failed(format!("unexpected ffprobe output: {:?}", stdout.trim())))?;

        debug!("Probed {:?}: {:.3}s", input, duration);
        Ok(duration)
    }

    fn encode(&self, request: &EncodeRequest) -> Result<()> {
        let args = self.encode_args(request);
        debug!("Running: {} {}", self.ffmpeg.display(), args.join(" "));

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EncodeError::SpawnFailed {
                program: self.ffmpeg.display().to_string(),
                reason: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(EncodeError::ToolFailed {
                program: "ffmpeg".to_string(),
                status: output.status.to_string(),
                diagnostic: stderr.trim().to_string(),
            }.into());
        }

        if !stderr.trim().is_empty() {
            warn!("ffmpeg: {}", stderr.trim());
        }

        Ok(())
    }
}

fn locate_binary(name: &str, configured: Option<PathBuf>) -> Result<PathBuf> {
    match configured {
        Some(path) if path.is_file() => Ok(path),
        Some(path) => Err(EnvironmentError::BinaryNotFound {
            name: name.to_string(),
            location: path.display().to_string(),
        }.into()),
        None => which::which(name).map_err(|_| {
            EnvironmentError::BinaryNotFound {
                name: name.to_string(),
                location: "PATH".to_string(),
            }.into()
        }),
    }
}

/// Duration printed by ffprobe; rejects negative and non-finite values.
fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}
