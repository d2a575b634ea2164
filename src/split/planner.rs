use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{InputError, PlanError, Result};
use crate::split::timespec::TimeSpec;

/// Window length used by fixed mode
pub const FIXED_WINDOW_SECONDS: f64 = 60.0;

/// Gaps between adjacent cut points at or below this are skipped
pub const MIN_SEGMENT_SECONDS: f64 = 0.1;

// Absorbs rounding in `end - start`, so a typed 0.1s gap counts as 0.1s
const GAP_TOLERANCE: f64 = 1e-9;

/// How the input is divided
#[derive(Debug, Clone, PartialEq)]
pub enum SplitMode {
    /// Consecutive 60 second windows, the last one holding the remainder
    Fixed,

    /// Cut at user supplied times (seconds, `MM:SS` or `HH:MM:SS`)
    Custom(Vec<String>),
}

impl SplitMode {
    /// Check the raw cut strings without knowing the duration yet.
    pub fn validate(&self) -> Result<()> {
        if let Self::Custom(raw) = self {
            parse_cut_times(raw)?;
        }
        Ok(())
    }
}

/// One output clip to produce
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentJob {
    /// 1-based position in the plan
    pub index: usize,

    /// Seek offset into the input (seconds)
    pub start: f64,

    /// Clip length (seconds)
    pub length: f64,

    /// Where the clip is written
    pub output_path: PathBuf,
}

impl SegmentJob {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Naming scheme for produced clips: `<dir>/<base>/<base>_NNN.mp4` or
/// `<dir>/<base>/<base>_partN.mp4`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    folder: PathBuf,
    base_name: String,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(folder: P, base_name: S) -> Self {
        Self {
            folder: folder.into(),
            base_name: base_name.into(),
        }
    }

    /// Layout for `input` under `output_dir`, using the input's file stem.
    pub fn for_input<P: AsRef<Path>, Q: AsRef<Path>>(output_dir: P, input: Q) -> Result<Self> {
        let input = input.as_ref();
        let base_name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InputError::InvalidFileName {
                path: input.display().to_string(),
            })?;

        Ok(Self::new(output_dir.as_ref().join(&base_name), base_name))
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn fixed_segment_path(&self, index: usize) -> PathBuf {
        self.folder.join(format!("{}_{:03}.mp4", self.base_name, index))
    }

    pub fn custom_segment_path(&self, index: usize) -> PathBuf {
        self.folder.join(format!("{}_part{}.mp4", self.base_name, index))
    }
}

/// Turns a probed duration and a split mode into an ordered job list
pub struct SegmentPlanner {
    layout: OutputLayout,
}

impl SegmentPlanner {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// Plan every segment up front. Nothing is returned on a partial failure.
    pub fn plan(&self, duration: f64, mode: &SplitMode) -> Result<Vec<SegmentJob>> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(PlanError::InvalidDuration { value: duration }.into());
        }

        let jobs: Vec<SegmentJob> = match mode {
            SplitMode::Fixed => fixed_windows(duration)
                .into_iter()
                .enumerate()
                .map(|(i, (start, length))| SegmentJob {
                    index: i + 1,
                    start,
                    length,
                    output_path: self.layout.fixed_segment_path(i + 1),
                })
                .collect(),
            SplitMode::Custom(raw) => {
                let times = parse_cut_times(raw)?;
                debug!(
                    "Cut times: {}",
                    times.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
                );

                let seconds: Vec<f64> = times.iter().map(TimeSpec::seconds).collect();
                let points = cut_points(duration, &seconds);

                let jobs: Vec<SegmentJob> = spans_between(&points)
                    .into_iter()
                    .enumerate()
                    .map(|(i, (start, length))| SegmentJob {
                        index: i + 1,
                        start,
                        length,
                        output_path: self.layout.custom_segment_path(i + 1),
                    })
                    .collect();

                if jobs.is_empty() {
                    return Err(PlanError::NoSegments { duration }.into());
                }
                jobs
            }
        };

        info!("Planned {} segments for {:.3}s of input", jobs.len(), duration);
        Ok(jobs)
    }
}

/// Parse all raw cut strings, failing on the first bad one.
pub fn parse_cut_times(raw: &[String]) -> Result<Vec<TimeSpec>> {
    if raw.is_empty() {
        return Err(InputError::MissingSplitTimes.into());
    }

    raw.iter()
        .map(|value| value.parse::<TimeSpec>().map_err(Into::into))
        .collect()
}

/// `(start, length)` windows of [`FIXED_WINDOW_SECONDS`] covering `duration`.
pub fn fixed_windows(duration: f64) -> Vec<(f64, f64)> {
    let full = (duration / FIXED_WINDOW_SECONDS).floor() as usize;
    let count = full + usize::from(duration % FIXED_WINDOW_SECONDS > 0.0);

    (0..count)
        .map(|i| {
            let start = i as f64 * FIXED_WINDOW_SECONDS;
            (start, FIXED_WINDOW_SECONDS.min(duration - start))
        })
        .collect()
}

/// Sorted, deduplicated cut points bracketed by `0` and `duration`.
/// Times outside the open interval `(0, duration)` are discarded.
pub fn cut_points(duration: f64, times: &[f64]) -> Vec<f64> {
    let mut points: Vec<f64> = times
        .iter()
        .copied()
        .filter(|&t| t > 0.0 && t < duration)
        .collect();
    points.push(0.0);
    points.push(duration);

    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

/// `(start, length)` for each adjacent pair whose gap exceeds [`MIN_SEGMENT_SECONDS`].
/// A gap of exactly the minimum is dropped even when subtraction rounds it up.
pub fn spans_between(points: &[f64]) -> Vec<(f64, f64)> {
    points
        .windows(2)
        .filter_map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let length = end - start;
            if length > MIN_SEGMENT_SECONDS + GAP_TOLERANCE {
                Some((start, length))
            } else {
                debug!("Dropping {:.3}s gap at {:.3}s", length, start);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> SegmentPlanner {
        SegmentPlanner::new(OutputLayout::new("output/clip", "clip"))
    }

    fn custom(times: &[&str]) -> SplitMode {
        SplitMode::Custom(times.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_fixed_mode_125_seconds() {
        let jobs = planner().plan(125.0, &SplitMode::Fixed).unwrap();

        let spans: Vec<(f64, f64)> = jobs.iter().map(|j| (j.start, j.length)).collect();
        assert_eq!(spans, vec![(0.0, 60.0), (60.0, 60.0), (120.0, 5.0)]);

        let covered: f64 = jobs.iter().map(|j| j.length).sum();
        assert_eq!(covered, 125.0);

        assert_eq!(jobs[0].output_path, PathBuf::from("output/clip/clip_001.mp4"));
        assert_eq!(jobs[2].output_path, PathBuf::from("output/clip/clip_003.mp4"));
        assert_eq!(jobs.iter().map(|j| j.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_fixed_mode_exact_multiple_has_no_empty_tail() {
        let windows = fixed_windows(180.0);
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|&(_, len)| len == 60.0));
    }

    #[test]
    fn test_fixed_mode_count_and_coverage() {
        for duration in [0.5, 59.9, 60.0, 61.0, 119.5, 3600.0, 3601.25] {
            let windows = fixed_windows(duration);
            assert_eq!(windows.len(), (duration / 60.0).ceil() as usize, "count for {duration}");

            let covered: f64 = windows.iter().map(|&(_, len)| len).sum();
            assert!((covered - duration).abs() < 1e-9, "coverage for {duration}");
            assert!(windows.iter().all(|&(_, len)| len > 0.0));
        }
    }

    #[test]
    fn test_fixed_mode_zero_duration_is_empty() {
        let jobs = planner().plan(0.0, &SplitMode::Fixed).unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_custom_mode_drops_short_gap() {
        let jobs = planner().plan(100.0, &custom(&["30", "30.05"])).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!((jobs[0].start, jobs[0].length), (0.0, 30.0));
        assert_eq!(jobs[1].start, 30.05);
        assert!((jobs[1].end() - 100.0).abs() < 1e-9);

        assert_eq!(jobs[0].output_path, PathBuf::from("output/clip/clip_part1.mp4"));
        assert_eq!(jobs[1].output_path, PathBuf::from("output/clip/clip_part2.mp4"));
    }

    #[test]
    fn test_custom_mode_drops_gap_of_exactly_minimum() {
        // 50.1 - 50.0 rounds to slightly above 0.1
        let jobs = planner().plan(100.0, &custom(&["50", "50.1", "0.1"])).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].start, 0.1);
        assert!((jobs[0].length - 49.9).abs() < 1e-9);
        assert_eq!(jobs[1].start, 50.1);
        assert!((jobs[1].length - 49.9).abs() < 1e-9);
    }

    #[test]
    fn test_gap_just_above_minimum_is_kept() {
        let spans = spans_between(&[0.0, 10.0, 10.11, 20.0]);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].0, 10.0);
    }

    #[test]
    fn test_cut_points_are_bracketed_sorted_and_unique() {
        let points = cut_points(100.0, &[30.05, 30.0, 30.0, 0.0, 150.0, 100.0]);
        assert_eq!(points, vec![0.0, 30.0, 30.05, 100.0]);
    }

    #[test]
    fn test_custom_mode_spans_are_ordered_and_long_enough() {
        let jobs = planner()
            .plan(600.0, &custom(&["05:00", "10", "00:01:00", "10.05", "599.95"]))
            .unwrap();

        for pair in jobs.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end() <= pair[1].start + 1e-9);
        }
        assert!(jobs.iter().all(|j| j.length > MIN_SEGMENT_SECONDS));
        assert!(jobs.iter().all(|j| j.end() <= 600.0 + 1e-9));
    }

    #[test]
    fn test_custom_mode_accepts_clock_formats() {
        let jobs = planner().plan(200.0, &custom(&["01:30"])).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].start, 90.0);
        assert_eq!(jobs[1].length, 110.0);
    }

    #[test]
    fn test_custom_mode_bad_time_aborts_plan() {
        let result = planner().plan(100.0, &custom(&["10", "1:2:3:4"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_mode_without_times() {
        let mode = SplitMode::Custom(vec![]);
        assert!(mode.validate().is_err());
        assert!(planner().plan(100.0, &mode).is_err());
    }

    #[test]
    fn test_custom_mode_with_no_valid_segments() {
        let result = planner().plan(0.05, &custom(&["0.01"]));
        assert!(matches!(
            result,
            Err(crate::SplitterError::Plan(PlanError::NoSegments { .. }))
        ));
    }

    #[test]
    fn test_cut_times_outside_input_are_ignored() {
        let jobs = planner().plan(50.0, &custom(&["70", "00:02:00"])).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!((jobs[0].start, jobs[0].length), (0.0, 50.0));
    }

    #[test]
    fn test_invalid_duration() {
        assert!(planner().plan(-1.0, &SplitMode::Fixed).is_err());
        assert!(planner().plan(f64::NAN, &SplitMode::Fixed).is_err());
    }

    #[test]
    fn test_layout_for_input() {
        let layout = OutputLayout::for_input("out", "/videos/My Talk.final.mov").unwrap();
        assert_eq!(layout.base_name(), "My Talk.final");
        assert_eq!(layout.folder(), Path::new("out/My Talk.final"));
        assert_eq!(
            layout.fixed_segment_path(12),
            PathBuf::from("out/My Talk.final/My Talk.final_012.mp4")
        );
    }

    #[test]
    fn test_layout_without_file_name() {
        let result = OutputLayout::for_input("out", "/");
        assert!(matches!(
            result,
            Err(crate::SplitterError::Input(InputError::InvalidFileName { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_layout_for_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new("/videos").join(OsStr::from_bytes(b"clip\xff.mp4"));
        let layout = OutputLayout::for_input("out", &input).unwrap();
        assert_eq!(layout.base_name(), "clip\u{FFFD}");
    }
}
