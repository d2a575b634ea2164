use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default overlay font size
pub const DEFAULT_TEXT_SIZE: u32 = 48;

/// Target orientation of the output frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    Portrait,
    Landscape,
}

impl AspectMode {
    /// Output frame size as `(width, height)`
    pub fn target_dimensions(&self) -> (u32, u32) {
        match self {
            Self::Portrait => (1080, 1920),
            Self::Landscape => (1920, 1080),
        }
    }
}

/// How the source frame is fitted into the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AspectHandling {
    /// Fill the box, cropping the overflow
    Crop,
    /// Fit inside the box and pad the margins
    #[default]
    Pad,
    /// Scale straight to the box, distorting if needed
    Stretch,
    /// Leave frames untouched and stream-copy
    Original,
}

/// Padding colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    #[default]
    Black,
    White,
}

impl BackgroundColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// Text colour that stays readable on this background
    pub fn contrasting_text(&self) -> &'static str {
        match self {
            Self::Black => "white",
            Self::White => "black",
        }
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Centered caption drawn on every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub size: u32,
    /// Overrides the background-contrasting default
    pub color: Option<String>,
    /// Font file; the encoder's default font is used when absent
    pub font: Option<PathBuf>,
}

impl TextOverlay {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            size: DEFAULT_TEXT_SIZE,
            color: None,
            font: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_font<P: Into<PathBuf>>(mut self, font: P) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Effective colour given the frame background
    pub fn resolved_color(&self, background: BackgroundColor) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| background.contrasting_text())
    }
}

/// VBV limits for re-encoded video, in kbit/s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitrateCap {
    pub max_rate_kbps: u32,
    pub buffer_size_kbps: u32,
}

impl BitrateCap {
    /// Value for `-x264-params`
    pub fn x264_params(&self) -> String {
        format!(
            "vbv-bufsize={}:vbv-maxrate={}",
            self.buffer_size_kbps, self.max_rate_kbps
        )
    }
}

/// Everything that decides how a segment is rendered. Built once, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub aspect_mode: AspectMode,
    pub handling: AspectHandling,
    pub background: BackgroundColor,
    pub text: Option<TextOverlay>,
    pub bitrate_cap: Option<BitrateCap>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(AspectMode::Portrait)
    }
}

impl RenderConfig {
    pub fn new(aspect_mode: AspectMode) -> Self {
        Self {
            aspect_mode,
            handling: AspectHandling::default(),
            background: BackgroundColor::default(),
            text: None,
            bitrate_cap: None,
        }
    }

    pub fn with_handling(mut self, handling: AspectHandling) -> Self {
        self.handling = handling;
        self
    }

    pub fn with_background(mut self, background: BackgroundColor) -> Self {
        self.background = background;
        self
    }

    pub fn with_text(mut self, text: TextOverlay) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_bitrate_cap(mut self, cap: BitrateCap) -> Self {
        self.bitrate_cap = Some(cap);
        self
    }

    /// Whether segments can be stream-copied
    pub fn is_passthrough(&self) -> bool {
        self.handling == AspectHandling::Original
    }
}
