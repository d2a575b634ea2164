use thiserror::Error;

/// Main error type for the video splitter library
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Missing or unusable external binaries
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Required binary not found: {name} ({location})")]
    BinaryNotFound { name: String, location: String },
}

/// Errors caused by what the user handed us
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("Input path has no file name to name clips after: {path}")]
    InvalidFileName { path: String },

    #[error("Invalid time format: {value} ({reason})")]
    InvalidTimeSpec { value: String, reason: String },

    #[error("Custom split requires at least one split time")]
    MissingSplitTimes,

    #[error("Could not read duration of {path}: {reason}")]
    ProbeFailed { path: String, reason: String },
}

/// Segment planning errors
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No valid segments for a {duration:.3}s input")]
    NoSegments { duration: f64 },

    #[error("Invalid duration: {value}")]
    InvalidDuration { value: f64 },
}

/// Errors raised while running the external encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("{program} exited with {status}: {diagnostic}")]
    ToolFailed {
        program: String,
        status: String,
        diagnostic: String,
    },

    #[error("Segment {index}/{total} ({output}) failed: {reason}")]
    SegmentFailed {
        index: usize,
        total: usize,
        output: String,
        reason: String,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SplitterError
pub type Result<T> = std::result::Result<T, SplitterError>;

impl SplitterError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Environment(EnvironmentError::BinaryNotFound { name, location }) => {
                format!(
                    "FFmpeg binaries not found: '{}' is missing ({}). Install FFmpeg or set the paths in the [tools] config section.",
                    name, location
                )
            }
            Self::Input(InputError::FileNotFound { path }) => {
                format!("Input file not found: {}", path)
            }
            Self::Input(InputError::InvalidTimeSpec { value, .. }) => {
                format!(
                    "Invalid time format: '{}'. Use seconds (90), MM:SS (01:30) or HH:MM:SS (01:00:00).",
                    value
                )
            }
            Self::Plan(PlanError::NoSegments { .. }) => "No valid segments created".to_string(),
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
