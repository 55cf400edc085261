use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sphere_widgets_core::{
    AppConfig, AutoplayPolicy, CubicBezier, FrameRecord, HeadlessVideo, HostEvent, Recorder,
    RecordingSettings, RenderGraph, Stage, TimedEvent,
};
use tracing_subscriber::EnvFilter;

fn main() -> sphere_widgets_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            script,
            fps,
            duration_ms,
            require_gesture,
            trace,
            stride,
        } => run_simulation(SimulationArgs {
            config,
            script,
            fps,
            duration_ms,
            require_gesture,
            trace,
            stride,
        }),
        Commands::Config { output } => run_config(output.as_deref()),
        Commands::Curve {
            x1,
            y1,
            x2,
            y2,
            samples,
        } => run_curve(CubicBezier::new(x1, y1, x2, y2), samples),
    }
}

struct SimulationArgs {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    fps: f64,
    duration_ms: f64,
    require_gesture: bool,
    trace: Option<PathBuf>,
    stride: u32,
}

fn run_simulation(args: SimulationArgs) -> sphere_widgets_core::Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if !(args.fps.is_finite() && args.fps > 0.0) {
        return Err(sphere_widgets_core::SphereError::InvalidConfig(format!(
            "fps must be positive, got {}",
            args.fps
        )));
    }

    let mut script = match &args.script {
        Some(path) => load_script(path)?,
        None => default_script(&config),
    };
    script.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

    let policy = if args.require_gesture {
        AutoplayPolicy::RequiresGesture
    } else {
        AutoplayPolicy::Allowed
    };
    let mut stage = Stage::new(
        config,
        Box::new(HeadlessVideo::new(policy)),
        RenderGraph::new(),
    )?;
    let hover = stage.hover_state();

    let mut recorder = Recorder::new(RecordingSettings {
        stride: args.stride,
    });
    if args.trace.is_some() {
        recorder.start();
    }

    tracing::info!(
        fps = args.fps,
        duration_ms = args.duration_ms,
        events = script.len(),
        "starting simulation"
    );

    let frame_ms = 1000.0 / args.fps;
    let mut pending = script.into_iter().peekable();
    let mut frame: u64 = 0;
    let mut now = 0.0;
    while now <= args.duration_ms {
        while let Some(timed) = pending.next_if(|timed| timed.at_ms <= now) {
            tracing::debug!(at_ms = timed.at_ms, event = ?timed.event, "dispatching event");
            stage.handle(timed.event)?;
        }
        stage.frame(now)?;
        for request in stage.drain_requests() {
            tracing::info!(?request, at_ms = now, "host request");
        }

        recorder.capture(FrameRecord {
            frame,
            time_ms: now,
            hover: hover.is_hover_sphere(),
            spheres: stage.renderer().last_frame().to_vec(),
        });
        frame += 1;
        now = frame as f64 * frame_ms;
    }

    let renderer = stage.renderer();
    tracing::info!(
        frames = renderer.frames_drawn(),
        size = ?renderer.size(),
        pixel_ratio = renderer.pixel_ratio(),
        "simulation finished"
    );
    if let Some(path) = &args.trace {
        recorder.write_json(path)?;
        tracing::info!(?path, frames = recorder.frames().len(), "trace written");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(stage.renderer().last_frame())?
    );
    Ok(())
}

fn load_script(path: &Path) -> sphere_widgets_core::Result<Vec<TimedEvent>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load the page, scroll the sphere into view, then hover and click it once
/// the appear sequence has had time to finish.
fn default_script(config: &AppConfig) -> Vec<TimedEvent> {
    let centre_x = config.viewport.width / 2.0;
    let centre_y = config.viewport.height / 2.0;
    let past_threshold = config
        .scroll_sphere
        .as_ref()
        .map(|scroll| scroll.appear_height + 1.0)
        .unwrap_or(0.0);

    vec![
        TimedEvent {
            at_ms: 0.0,
            event: HostEvent::ContentLoaded,
        },
        TimedEvent {
            at_ms: 100.0,
            event: HostEvent::Scroll { y: past_threshold },
        },
        TimedEvent {
            at_ms: 2500.0,
            event: HostEvent::PointerMove {
                x: centre_x,
                y: centre_y,
            },
        },
        TimedEvent {
            at_ms: 2600.0,
            event: HostEvent::Click {
                x: centre_x,
                y: centre_y,
            },
        },
    ]
}

fn run_config(output: Option<&Path>) -> sphere_widgets_core::Result<()> {
    let json = AppConfig::default().to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, "default configuration written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_curve(curve: CubicBezier, samples: usize) -> sphere_widgets_core::Result<()> {
    let samples = samples.max(2);
    for i in 0..samples {
        let t = i as f64 / (samples - 1) as f64;
        println!("{t:.4}\t{:.6}", curve.ease(t));
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the sphere widgets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted page session at a fixed frame rate.
    Simulate {
        /// JSON configuration file; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON array of timed page events.
        #[arg(short, long)]
        script: Option<PathBuf>,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Simulated time to run for.
        #[arg(long, default_value_t = 5000.0)]
        duration_ms: f64,
        /// Refuse video autoplay until the first click.
        #[arg(long)]
        require_gesture: bool,
        /// Write per-frame snapshots to this file.
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Keep one traced frame out of every `stride`.
        #[arg(long, default_value_t = 1)]
        stride: u32,
    },
    /// Print (or write) the default configuration as JSON.
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sample a cubic-bezier easing curve.
    Curve {
        #[arg(allow_hyphen_values = true)]
        x1: f64,
        #[arg(allow_hyphen_values = true)]
        y1: f64,
        #[arg(allow_hyphen_values = true)]
        x2: f64,
        #[arg(allow_hyphen_values = true)]
        y2: f64,
        #[arg(long, default_value_t = 11)]
        samples: usize,
    },
}
