use std::path::Path;

use crate::{error::Result, media::request::EncodeRequest};

/// The external media capability the pipeline drives.
///
/// Implementations wrap a prober/encoder pair. Calls are blocking and are
/// issued one at a time; nothing here is expected to run concurrently with
/// itself.
pub trait MediaTool: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Length of `input` in seconds.
    ///
    /// Any tool failure or unparseable answer is an error, never a default.
    fn probe_duration(&self, input: &Path) -> Result<f64>;

    /// Produce one output file as described by `request`.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the tool exited successfully, otherwise an error carrying
    /// the tool's diagnostic output.
    fn encode(&self, request: &EncodeRequest) -> Result<()>;
}
