use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// x264 presets accepted by `encoding.preset`
const X264_PRESETS: &[&str] = &[
    "ultrafast", "superfast", "veryfast", "faster", "fast",
    "medium", "slow", "slower", "veryslow", "placebo",
];

/// Main configuration for the video splitter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to find the external encoder and prober
    pub tools: ToolConfig,

    /// Encoder parameters used for every job
    pub encoding: EncodeConfig,

    /// Output layout settings
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.encoding.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Locations of the FFmpeg binaries.
///
/// Explicit paths win over `bin_dir`, which wins over a `PATH` lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Directory holding both `ffmpeg` and `ffprobe`
    pub bin_dir: Option<PathBuf>,

    /// Explicit encoder path
    pub ffmpeg: Option<PathBuf>,

    /// Explicit prober path
    pub ffprobe: Option<PathBuf>,

    /// Encoder log level passed through `-loglevel`
    pub log_level: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            bin_dir: None,
            ffmpeg: None,
            ffprobe: None,
            log_level: "error".to_string(),
        }
    }
}

impl ToolConfig {
    /// Configured location for `name`, if any. `None` means "look it up on PATH".
    pub fn configured_path(&self, name: &str) -> Option<PathBuf> {
        let explicit = match name {
            "ffmpeg" => self.ffmpeg.clone(),
            "ffprobe" => self.ffprobe.clone(),
            _ => None,
        };

        explicit.or_else(|| {
            self.bin_dir
                .as_ref()
                .map(|dir| dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX)))
        })
    }
}

/// Encoder parameters for re-encoded and copied segments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Video codec for re-encoded segments
    pub video_codec: String,

    /// Encoder speed/quality preset
    pub preset: String,

    /// Constant rate factor (0-51, lower is better)
    pub crf: u8,

    /// Move the moov atom to the front for streaming
    pub faststart: bool,

    /// Audio codec, applied on both the copy and re-encode paths
    pub audio_codec: String,

    /// Audio bitrate, e.g. "128k"
    pub audio_bitrate: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            crf: 23,
            faststart: true,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl EncodeConfig {
    fn validate(&self) -> Result<()> {
        if self.crf > 51 {
            return Err(ConfigError::InvalidValue {
                key: "encoding.crf".to_string(),
                value: self.crf.to_string()
            }.into());
        }

        if !X264_PRESETS.contains(&self.preset.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "encoding.preset".to_string(),
                value: self.preset.clone()
            }.into());
        }

        for (key, value) in [
            ("encoding.video_codec", &self.video_codec),
            ("encoding.audio_codec", &self.audio_codec),
            ("encoding.audio_bitrate", &self.audio_bitrate),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }

        Ok(())
    }
}

/// Output layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each input gets a subfolder named after its base name
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.directory".to_string(),
                value: String::new()
            }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("splitter.toml");

        let mut original_config = Config::default();
        original_config.tools.bin_dir = Some(PathBuf::from("ffmpeg/bin"));
        original_config.encoding.crf = 20;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.encoding.crf, 20);
        assert_eq!(loaded_config.tools.bin_dir, Some(PathBuf::from("ffmpeg/bin")));
        assert_eq!(loaded_config.output.directory, PathBuf::from("output"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[encoding]\npreset = \"slow\"\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.encoding.preset, "slow");
        assert_eq!(config.encoding.crf, 23);
        assert_eq!(config.encoding.audio_bitrate, "128k");
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_crf() {
        let mut config = Config::default();
        config.encoding.crf = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_preset() {
        let mut config = Config::default();
        config.encoding.preset = "warp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configured_path_precedence() {
        let mut tools = ToolConfig::default();
        assert!(tools.configured_path("ffmpeg").is_none());

        tools.bin_dir = Some(PathBuf::from("bin"));
        let from_dir = tools.configured_path("ffprobe").unwrap();
        assert!(from_dir.starts_with("bin"));

        tools.ffprobe = Some(PathBuf::from("/opt/ffprobe"));
        assert_eq!(tools.configured_path("ffprobe"), Some(PathBuf::from("/opt/ffprobe")));
    }
}
