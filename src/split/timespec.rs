use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// A user supplied point in time, canonicalised to seconds.
///
/// Accepts a plain seconds count (`"90"`, `"12.5"`), `MM:SS` or `HH:MM:SS`.
/// Every field may carry a fractional part. Anything else is rejected rather
/// than coerced.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    seconds: f64,
}

impl TimeSpec {
    /// Canonical value in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl FromStr for TimeSpec {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InputError::InvalidTimeSpec {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty value"));
        }

        let fields = trimmed
            .split(':')
            .map(parse_field)
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| invalid("fields must be non-negative numbers"))?;

        let seconds = match fields.as_slice() {
            [s] => *s,
            [m, s] => m * 60.0 + s,
            [h, m, s] => h * 3600.0 + m * 60.0 + s,
            _ => return Err(invalid("expected seconds, MM:SS or HH:MM:SS")),
        };

        Ok(Self { seconds })
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.seconds;
        let hours = (total / 3600.0).floor();
        let minutes = ((total - hours * 3600.0) / 60.0).floor();
        let seconds = total - hours * 3600.0 - minutes * 60.0;
        write!(f, "{:02}:{:02}:{:06.3}", hours as u64, minutes as u64, seconds)
    }
}

fn parse_field(field: &str) -> Option<f64> {
    let field = field.trim();
    // f64::from_str also accepts "inf", "nan", signs and exponents
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}
