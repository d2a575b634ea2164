use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use video_splitter::{
    config::Config,
    media::FfmpegTool,
    pipeline::{SplitEngine, SplitRequest},
    render::{AspectHandling, AspectMode, BackgroundColor, BitrateCap, RenderConfig, TextOverlay, DEFAULT_TEXT_SIZE},
    split::SplitMode,
    SplitterError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SplitOption {
    /// Consecutive 60-second segments
    #[value(name = "60")]
    Sixty,
    /// Cut at the times given with --split-times
    Custom,
}

#[derive(Parser)]
#[command(
    name = "video-splitter",
    version,
    about = "Split a video into clips with optional aspect ratio conversion and text overlay",
    long_about = "Video Splitter cuts a video into 60-second segments or at custom times, optionally reframing every clip to portrait or landscape (crop, pad or stretch) and drawing a centered caption. FFmpeg and FFprobe must be installed."
)]
struct Cli {
    /// Input video file path
    input: PathBuf,

    /// Split mode: 60-second segments or custom times
    #[arg(long, value_enum)]
    split_option: SplitOption,

    /// Custom split times in seconds or HH:MM:SS format
    #[arg(long, num_args = 1..)]
    split_times: Vec<String>,

    /// Output directory (default: "output", or the config file's value)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Target aspect ratio orientation
    #[arg(long, value_enum)]
    aspect_mode: AspectMode,

    /// How to handle aspect ratio conversion
    #[arg(long, value_enum, default_value = "pad")]
    aspect_handling: AspectHandling,

    /// Padding background color
    #[arg(long, value_enum, default_value = "black")]
    background: BackgroundColor,

    /// Text to draw at the center of every clip
    #[arg(long)]
    text: Option<String>,

    /// Text font size
    #[arg(long, default_value_t = DEFAULT_TEXT_SIZE)]
    text_size: u32,

    /// Text color (default: white/black based on background)
    #[arg(long)]
    text_color: Option<String>,

    /// Path to custom font file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Cap the video bitrate (kbit/s) when re-encoding
    #[arg(long, requires = "buffer_size")]
    max_rate: Option<u32>,

    /// Rate control buffer size (kbit/s) used with --max-rate
    #[arg(long, requires = "max_rate")]
    buffer_size: Option<u32>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the plan without encoding anything
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn split_mode(&self) -> SplitMode {
        match self.split_option {
            SplitOption::Sixty => SplitMode::Fixed,
            SplitOption::Custom => SplitMode::Custom(self.split_times.clone()),
        }
    }

    fn render_config(&self) -> RenderConfig {
        let mut render = RenderConfig::new(self.aspect_mode)
            .with_handling(self.aspect_handling)
            .with_background(self.background);

        if let Some(text) = &self.text {
            let mut overlay = TextOverlay::new(text.clone()).with_size(self.text_size);
            if let Some(color) = &self.text_color {
                overlay = overlay.with_color(color.clone());
            }
            if let Some(font) = &self.font {
                overlay = overlay.with_font(font.clone());
            }
            render = render.with_text(overlay);
        }

        if let (Some(max_rate_kbps), Some(buffer_size_kbps)) = (self.max_rate, self.buffer_size) {
            render = render.with_bitrate_cap(BitrateCap { max_rate_kbps, buffer_size_kbps });
        }

        render
    }
}

fn user_facing(e: SplitterError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Video Splitter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(user_facing)?
        }
        None => Config::default(),
    };
    config.validate().map_err(user_facing)?;

    // Missing binaries are fatal before any input is touched
    let tool = FfmpegTool::locate(&config.tools, config.encoding.clone()).map_err(user_facing)?;
    let engine = SplitEngine::new(Arc::new(tool));

    let request = SplitRequest {
        input: cli.input.clone(),
        output_dir: cli.output_dir.clone().unwrap_or(config.output.directory.clone()),
        mode: cli.split_mode(),
        render: cli.render_config(),
    };

    if cli.dry_run {
        let plan = engine.prepare(&request).await.map_err(user_facing)?;
        info!("Dry run: {} segments into {:?}", plan.jobs.len(), plan.layout.folder());
        for job in &plan.jobs {
            info!(
                "  {:>3}  {:>10.3}s  +{:>8.3}s  {}",
                job.index,
                job.start,
                job.length,
                job.output_path.display()
            );
        }
        match plan.video.filter_graph() {
            Some(graph) => info!("  filter graph: {}", graph),
            None => info!("  stream copy"),
        }
        return Ok(());
    }

    let report = engine.split(&request).await.map_err(user_facing)?;

    info!(
        "Processing completed: {} clips covering {:.3}s of {:.3}s",
        report.outputs.len(),
        report.covered,
        report.duration
    );
    Ok(())
}
