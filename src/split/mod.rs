//! # Segment Planning
//!
//! Turns a probed duration into the ordered list of clips to cut.
//!
//! - **Fixed mode**: consecutive 60 second windows; the final window holds
//!   whatever remains and is never padded.
//! - **Custom mode**: user supplied cut times, bracketed by the start and
//!   end of the input. Spans of 0.1s or less between adjacent cuts are
//!   skipped.
//!
//! ```rust
//! use video_splitter::split::{OutputLayout, SegmentPlanner, SplitMode};
//!
//! # fn main() -> video_splitter::Result<()> {
//! let planner = SegmentPlanner::new(OutputLayout::new("output/talk", "talk"));
//! let jobs = planner.plan(125.0, &SplitMode::Fixed)?;
//! assert_eq!(jobs.len(), 3);
//! assert_eq!(jobs[2].length, 5.0);
//! # Ok(())
//! # }
//! ```

pub mod planner;
pub mod timespec;

pub use planner::{
    OutputLayout, SegmentJob, SegmentPlanner, SplitMode,
    FIXED_WINDOW_SECONDS, MIN_SEGMENT_SECONDS,
};
pub use timespec::TimeSpec;
