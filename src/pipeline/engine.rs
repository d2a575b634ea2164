use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;
use tracing::{debug, error, info, warn};

use crate::{
    error::{EncodeError, InputError, Result},
    media::{EncodeRequest, MediaTool, VideoEncoding},
    render::RenderConfig,
    split::{OutputLayout, SegmentJob, SegmentPlanner, SplitMode},
};

/// Everything needed to split one input file
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub input: PathBuf,
    /// Root output directory; clips land in `<output_dir>/<base name>/`
    pub output_dir: PathBuf,
    pub mode: SplitMode,
    pub render: RenderConfig,
}

/// A fully computed plan, ready to run
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub input: PathBuf,
    pub duration: f64,
    pub layout: OutputLayout,
    pub jobs: Vec<SegmentJob>,
    pub video: VideoEncoding,
}

impl SplitPlan {
    /// Seconds of input covered by the planned jobs
    pub fn covered(&self) -> f64 {
        self.jobs.iter().map(|job| job.length).sum()
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub duration: f64,
    pub outputs: Vec<PathBuf>,
    pub covered: f64,
}

/// Orchestrates a split from input validation to the last encoder call
///
/// The engine follows a straight pipeline:
/// 1. Input validation - the input exists and cut strings parse
/// 2. Probe - ask the media tool for the input's duration
/// 3. Planning - compute every segment job and the filter graph
/// 4. Encoding - run each job in order, stopping at the first failure
pub struct SplitEngine {
    tool: Arc<dyn MediaTool>,
}

impl SplitEngine {
    pub fn new(tool: Arc<dyn MediaTool>) -> Self {
        Self { tool }
    }

    /// Plan and run a split
    pub async fn split(&self, request: &SplitRequest) -> Result<SplitReport> {
        info!("🎬 Splitting {:?}", request.input);
        info!("   Mode: {}", describe_mode(&request.mode));
        info!("   Output: {:?}", request.output_dir);

        let plan = self.prepare(request).await?;
        self.run_plan(&plan).await
    }

    // ==========================================
    // PIPELINE STEPS 1-3: VALIDATE, PROBE, PLAN
    // ==========================================

    /// Compute the plan without encoding anything
    pub async fn prepare(&self, request: &SplitRequest) -> Result<SplitPlan> {
        validate_input(&request.input)?;
        request.mode.validate()?;

        let layout = OutputLayout::for_input(&request.output_dir, &request.input)?;
        let duration = self.probe(&request.input).await?;
        info!("   Duration: {:.3}s", duration);

        let jobs = SegmentPlanner::new(layout.clone()).plan(duration, &request.mode)?;
        if jobs.is_empty() {
            warn!("Input has zero duration; nothing to split");
        }

        let video = VideoEncoding::for_render(&request.render);
        match video.filter_graph() {
            Some(graph) => info!("   Re-encoding with filter graph: {}", graph),
            None => info!("   Stream-copying video (original aspect)"),
        }

        Ok(SplitPlan {
            input: request.input.clone(),
            duration,
            layout,
            jobs,
            video,
        })
    }

    // ==========================================
    // PIPELINE STEP 4: ENCODING
    // ==========================================

    /// Run every job of `plan` sequentially. The first failure aborts the rest.
    pub async fn run_plan(&self, plan: &SplitPlan) -> Result<SplitReport> {
        std::fs::create_dir_all(plan.layout.folder())?;
        info!("Output directory: {:?}", plan.layout.folder());

        let total = plan.jobs.len();
        let mut outputs = Vec::with_capacity(total);

        for job in &plan.jobs {
            info!(
                "Processing segment {}/{}: {:.1}s - {:.1}s -> {:?}",
                job.index, total, job.start, job.end(), job.output_path
            );

            let request = EncodeRequest::for_segment(&plan.input, job, plan.video.clone());
            if let Err(e) = self.encode(request).await {
                error!("Segment {} failed: {}", job.index, e);
                return Err(EncodeError::SegmentFailed {
                    index: job.index,
                    total,
                    output: job.output_path.display().to_string(),
                    reason: e.to_string(),
                }.into());
            }

            outputs.push(job.output_path.clone());
        }

        info!("✅ Created {} segments", outputs.len());

        Ok(SplitReport {
            duration: plan.duration,
            outputs,
            covered: plan.covered(),
        })
    }

    /// Render the whole input into a single file, no seek and no length bound
    pub async fn render_whole<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        render: &RenderConfig,
    ) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();
        validate_input(input)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let request = EncodeRequest::whole_file(input, output, VideoEncoding::for_render(render));
        self.encode(request).await
    }

    async fn probe(&self, input: &Path) -> Result<f64> {
        let tool = Arc::clone(&self.tool);
        let path = input.to_path_buf();

        debug!("Probing {:?} with {}", path, tool.name());
        task::spawn_blocking(move || tool.probe_duration(&path))
            .await
            .map_err(|e| InputError::ProbeFailed {
                path: input.display().to_string(),
                reason: format!("probe task failed: {}", e),
            })?
    }

    async fn encode(&self, request: EncodeRequest) -> Result<()> {
        let tool = Arc::clone(&self.tool);
        let program = tool.name().to_string();

        task::spawn_blocking(move || tool.encode(&request))
            .await
            .map_err(|e| EncodeError::SpawnFailed {
                program,
                reason: format!("encode task failed: {}", e),
            })?
    }
}

fn validate_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(InputError::FileNotFound {
            path: input.display().to_string(),
        }.into());
    }
    Ok(())
}

fn describe_mode(mode: &SplitMode) -> String {
    match mode {
        SplitMode::Fixed => "60-second segments".to_string(),
        SplitMode::Custom(times) => format!("custom split at {}", times.join(", ")),
    }
}
