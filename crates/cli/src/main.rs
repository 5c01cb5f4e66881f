#![deny(unsafe_code)]
//! CLI binary for backdrop, the decorative page-background animations.
//!
//! Subcommands:
//! - `render <animation>`: run N frames on a software surface, write PNG
//! - `inspect <animation>`: run N frames on a recorder, print draw counts
//! - `list`: print available animations
//!
//! Set `RUST_LOG=debug` to see population rebuilds and theme changes.

mod error;

use backdrop_core::surface::DrawCommand;
use backdrop_core::{Animation, Recorder, Scene, Theme};
use backdrop_engines::{run_frames, AnimationKind};
use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

const DEFAULT_WIDTH: usize = 800;
const DEFAULT_HEIGHT: usize = 600;

#[derive(Parser)]
#[command(name = "backdrop", about = "Decorative background animations, rendered offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that runs an animation.
///
/// Flags override the matching fields of `--scene`.
#[derive(Args)]
struct RunArgs {
    /// Animation name ("geometry" or "flow"); optional with --scene.
    animation: Option<String>,

    /// Viewport width in pixels.
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Viewport height in pixels.
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Number of frames to run.
    #[arg(short, long)]
    frames: Option<usize>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Page theme: dark or light.
    #[arg(long)]
    theme: Option<String>,

    /// Resting cursor position as "X,Y".
    #[arg(long)]
    pointer: Option<String>,

    /// Animation parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Scene description file (JSON).
    #[arg(long)]
    scene: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run an animation for N frames and write the last one as a PNG.
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,
    },
    /// Run an animation for N frames and report the draw commands issued.
    Inspect {
        #[command(flatten)]
        run: RunArgs,
    },
    /// List available animations.
    List,
}

/// Parses `"X,Y"` into a cursor position.
fn parse_pointer(text: &str) -> Result<[f64; 2], CliError> {
    let invalid = || CliError::Input(format!("invalid --pointer '{text}': expected X,Y"));
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(invalid());
    }
    Ok([x, y])
}

/// Resolves the scene file (if any) and flag overrides into one validated
/// [`Scene`].
fn build_scene(args: &RunArgs) -> Result<Scene, CliError> {
    let mut scene = match &args.scene {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
            Scene::from_json_str(&text)?
        }
        None => {
            let animation = args.animation.as_deref().ok_or_else(|| {
                CliError::Input("missing animation name (or --scene FILE)".to_string())
            })?;
            Scene::new(animation, DEFAULT_WIDTH, DEFAULT_HEIGHT)
        }
    };

    if let Some(animation) = &args.animation {
        scene.animation = animation.clone();
    }
    if let Some(width) = args.width {
        scene.width = width;
    }
    if let Some(height) = args.height {
        scene.height = height;
    }
    if let Some(frames) = args.frames {
        scene.frames = frames;
    }
    if let Some(seed) = args.seed {
        scene.seed = seed;
    }
    if let Some(theme) = &args.theme {
        scene.theme = theme.parse::<Theme>()?;
    }
    if let Some(pointer) = &args.pointer {
        scene.pointer = Some(parse_pointer(pointer)?);
    }
    if let Some(params) = &args.params {
        scene.params = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    }

    scene.validate()?;
    log::debug!(
        "scene: {} {}x{} theme={} seed={} frames={}",
        scene.animation,
        scene.width,
        scene.height,
        scene.theme,
        scene.seed,
        scene.frames
    );
    Ok(scene)
}

/// Draw commands per operation, sorted by name.
fn command_counts(commands: &[DrawCommand]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for c in commands {
        *counts.entry(c.op()).or_insert(0) += 1;
    }
    counts
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let animations = AnimationKind::list_animations();
            if cli.json {
                let info = serde_json::json!({ "animations": animations });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Animations:");
                for name in animations {
                    println!("  {name}");
                }
            }
        }
        Command::Render { run, output } => {
            let scene = build_scene(&run)?;
            let mut animation = AnimationKind::from_scene(&scene)?;
            let stats = backdrop_engines::snapshot::render_png(
                &mut animation,
                scene.width,
                scene.height,
                scene.frames,
                &output,
            )?;

            if cli.json {
                let info = serde_json::json!({
                    "animation": scene.animation,
                    "width": scene.width,
                    "height": scene.height,
                    "frames": stats.frames,
                    "drawn": stats.drawn,
                    "theme": scene.theme,
                    "seed": scene.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, {} drawn, {} theme, seed {}) -> {}",
                    scene.animation,
                    scene.width,
                    scene.height,
                    stats.frames,
                    stats.drawn,
                    scene.theme,
                    scene.seed,
                    output.display()
                );
            }
        }
        Command::Inspect { run } => {
            let scene = build_scene(&run)?;
            let mut animation = AnimationKind::from_scene(&scene)?;
            let mut recorder = Recorder::new();
            let stats = run_frames(&mut animation, &mut recorder, scene.frames);
            let counts = command_counts(recorder.commands());

            if cli.json {
                let info = serde_json::json!({
                    "animation": scene.animation,
                    "frames": stats.frames,
                    "drawn": stats.drawn,
                    "commands": counts,
                    "host_style": {
                        "opacity": animation.host_style().opacity,
                        "transparent": animation.host_style().transparent,
                    },
                    "params": animation.params(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}: {} frames, {} drawn",
                    scene.animation, stats.frames, stats.drawn
                );
                for (op, n) in &counts {
                    println!("  {op:<14} {n}");
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
