use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sceneview_input::InputState;
use sceneview_render::RecordingContext;
use sceneview_scene::{FrameInput, Scene, ViewerConfig, build_starter_scene};
use sceneview_tools::{FrameStats, SceneInspector};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sceneview-cli", about = "Headless driver for the sceneview renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config file (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Update and draw the starter scene against a recording context
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Simulated seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Resize to this width before the first frame
        #[arg(long)]
        width: Option<u32>,
        /// Resize to this height before the first frame
        #[arg(long)]
        height: Option<u32>,
        /// Print the command log of the final frame
        #[arg(long)]
        log: bool,
    },
    /// Print the starter scene's entities and cameras
    Inspect,
    /// Write the effective config as JSON
    WriteConfig {
        /// Destination file
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

fn run(
    scene: &mut Scene,
    ctx: &mut RecordingContext,
    frames: u32,
    dt: f32,
    log: bool,
) -> anyhow::Result<FrameStats> {
    let input = InputState::new();
    let mut stats = FrameStats::default();
    for frame in 0..frames {
        scene.update(&FrameInput {
            dt,
            total_time: stats.total_time() + dt,
            input: &input,
        });
        ctx.take_commands();
        scene
            .draw(ctx)
            .with_context(|| format!("frame {frame} failed"))?;
        tracing::trace!(frame, draws = ctx.draw_count(), "frame drawn");
        stats.record_secs(dt);
    }
    if log {
        print!("{}", ctx.render_log());
    }
    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(
        config = ?cli.config,
        width = config.width,
        height = config.height,
        "config resolved"
    );

    match cli.command {
        Commands::Info => {
            println!("sceneview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", sceneview_render::crate_info());
            println!("scene: {}", sceneview_scene::crate_info());
            println!("tools: {}", sceneview_tools::crate_info());
        }
        Commands::Run {
            frames,
            dt,
            width,
            height,
            log,
        } => {
            let mut ctx = RecordingContext::new();
            let mut scene = build_starter_scene(&mut ctx, &config)?;
            if width.is_some() || height.is_some() {
                scene.resize(
                    width.unwrap_or(config.width),
                    height.unwrap_or(config.height),
                );
            }

            let stats = run(&mut scene, &mut ctx, frames, dt, log)?;
            tracing::info!(
                frames = stats.frame_count(),
                draws = ctx.draw_count(),
                presented = ctx.frames_presented(),
                "run finished"
            );
            println!(
                "Ran {} frames ({:.2}s simulated), {} draws in the last frame, {} presented",
                stats.frame_count(),
                stats.total_time(),
                ctx.draw_count(),
                ctx.frames_presented()
            );
            println!("{}", SceneInspector::summary(&scene));
        }
        Commands::Inspect => {
            let mut ctx = RecordingContext::new();
            let scene = build_starter_scene(&mut ctx, &config)?;
            println!("{}", SceneInspector::summary(&scene));
            for entity in SceneInspector::list_entities(&scene) {
                println!("  {entity}");
            }
            for index in 0..scene.cameras().len() {
                if let Some(camera) = SceneInspector::inspect_camera(&scene, index) {
                    println!("  {camera}");
                }
            }
        }
        Commands::WriteConfig { output } => {
            config
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), "config written");
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}
