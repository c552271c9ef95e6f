#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line host that plays Maze Chase sessions.
//!
//! The host drives the world with a manual clock at a fixed frame rate,
//! replays a scripted list of steering inputs, and reports the final
//! snapshot. Boards can be exported to and imported from single-line
//! transfer strings.

mod layout_transfer;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_core::{Command, Event, Layout, ManualClock, MazeKind, SessionPhase};
use maze_chase_world::{apply, query, SessionConfig, World};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use layout_transfer::LayoutTransfer;
use script::SteerStep;

/// Command-line arguments accepted by the Maze Chase host.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Plays Maze Chase sessions headlessly")]
struct CliArgs {
    /// Board to play when no custom layout is supplied.
    #[arg(long, value_enum, default_value_t = MazeArg::Classic)]
    maze: MazeArg,
    /// Overrides the generator seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding session parameters.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// File holding a board in the authored row format.
    #[arg(long, value_name = "PATH", conflicts_with = "import")]
    layout: Option<PathBuf>,
    /// Board transfer string produced by `--export`.
    #[arg(long, value_name = "STRING")]
    import: Option<String>,
    /// Prints the board as a transfer string and exits.
    #[arg(long)]
    export: bool,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Steering input as `FRAME:DIRECTION`, e.g. `0:left` or `90:none`.
    #[arg(long = "steer", value_name = "FRAME:DIRECTION")]
    steering: Vec<SteerStep>,
    /// Starts the next level automatically once a board is cleared.
    #[arg(long)]
    auto_advance: bool,
    /// Logs a progress line every N frames; zero disables progress lines.
    #[arg(long, default_value_t = 0)]
    report_every: u64,
    /// Prints the final snapshot as JSON.
    #[arg(long)]
    json: bool,
}

/// Boards the host can build on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MazeArg {
    /// The hand-authored classic board.
    Classic,
    /// A board carved by spanning growth.
    SpanningGrowth,
    /// A board grown from wall sprouts.
    WallGrowth,
}

impl From<MazeArg> for MazeKind {
    fn from(value: MazeArg) -> Self {
        match value {
            MazeArg::Classic => Self::Classic,
            MazeArg::SpanningGrowth => Self::SpanningGrowth,
            MazeArg::WallGrowth => Self::WallGrowth,
        }
    }
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    install_tracing();
    let args = CliArgs::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let clock = ManualClock::new();
    let mut world = match custom_layout(&args)? {
        Some(layout) => World::with_layout(config, layout, Box::new(clock.clone())),
        None => World::new(config, args.maze.into(), Box::new(clock.clone()))
            .context("failed to build the starting board")?,
    };
    info!("{}", query::welcome_banner(&world));
    debug!(config = ?query::config(&world), "session configured");

    if args.export {
        let encoded = LayoutTransfer::from_layout(query::layout(&world))
            .encode()
            .context("failed to encode the board")?;
        println!("{encoded}");
        return Ok(());
    }

    play(&mut world, &clock, &args);

    let snapshot = query::snapshot(&world);
    if args.json {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to serialise the snapshot")?;
        println!("{json}");
    } else {
        println!(
            "level {} score {} lives {} phase {:?}",
            snapshot.level, snapshot.score, snapshot.lives, snapshot.phase
        );
    }
    Ok(())
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
}

fn custom_layout(args: &CliArgs) -> Result<Option<Layout>> {
    if let Some(path) = &args.layout {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        let layout = contents
            .parse::<Layout>()
            .with_context(|| format!("failed to parse layout {}", path.display()))?;
        return Ok(Some(layout));
    }

    if let Some(encoded) = &args.import {
        let layout = LayoutTransfer::decode(encoded)
            .and_then(LayoutTransfer::into_layout)
            .context("failed to import the layout string")?;
        return Ok(Some(layout));
    }

    Ok(None)
}

/// Runs the scripted session until the frame budget is spent or the game
/// ends.
fn play(world: &mut World, clock: &ManualClock, args: &CliArgs) {
    let dt = Duration::from_secs(1) / args.fps;
    let mut events = Vec::new();

    for frame in 0..args.frames {
        for step in args.steering.iter().filter(|step| step.frame() == frame) {
            apply(
                world,
                Command::Steer {
                    direction: step.direction(),
                },
                &mut events,
            );
        }

        clock.advance(dt);
        apply(world, Command::Tick { dt }, &mut events);

        let mut cleared = false;
        for event in events.drain(..) {
            report(frame, &event);
            cleared |= matches!(event, Event::LevelCleared { .. });
        }
        if cleared && args.auto_advance {
            apply(world, Command::AdvanceLevel, &mut events);
            for event in events.drain(..) {
                report(frame, &event);
            }
        }

        if args.report_every > 0 && frame % args.report_every == 0 {
            let snapshot = query::snapshot(world);
            let pellets = query::pellets(world);
            info!(
                frame,
                score = snapshot.score,
                lives = snapshot.lives,
                pellets = pellets.small().len() + pellets.big().len(),
                "progress"
            );
        }

        match query::phase(world) {
            SessionPhase::GameOver => break,
            SessionPhase::LevelCleared if !args.auto_advance => break,
            _ => {}
        }
    }
}

fn report(frame: u64, event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => trace!(frame, ?event, "world event"),
        Event::PelletEaten { .. } | Event::PlayerTurned { .. } | Event::Teleported { .. } => {
            debug!(frame, ?event, "world event");
        }
        _ => info!(frame, ?event, "world event"),
    }
}
