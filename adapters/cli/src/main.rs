#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Asylum headlessly under a scripted player.

mod autopilot;
mod backends;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use asylum_assets::{AssetPipeline, FileSource};
use asylum_presentation::Presenter;
use asylum_session::{FrameInput, Session};
use asylum_world::query;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    autopilot::Autopilot,
    backends::{LoggingAudio, LoggingHud, LoggingScene},
    settings::Settings,
};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "asylum", about = "Runs an Asylum session without a window")]
struct Cli {
    /// TOML file overriding tuning values and asset paths.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory asset paths are resolved against.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3600)]
    steps: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Seed every random stream is derived from.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

/// Entry point for the Asylum command-line interface.
fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    run(&cli, settings);
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .context("failed to install the tracing subscriber")
}

fn run(cli: &Cli, settings: Settings) {
    let Settings { tuning, assets } = settings;
    let mut presenter = Presenter::new(
        LoggingScene::default(),
        LoggingAudio::default(),
        LoggingHud::default(),
        cli.seed,
    );

    let pipeline = AssetPipeline::new(FileSource::new(cli.assets.clone()), assets);
    let bundle = pipeline.load_all(|percent| presenter.loading_progress(percent));
    presenter.install_assets(bundle);

    let mut session = Session::new(tuning, cli.seed);
    let mut autopilot = Autopilot::new();
    let frame_length = Duration::from_secs(1) / cli.fps;
    let mut inputs = Vec::new();
    let mut events = Vec::new();

    for step in 0..cli.steps {
        inputs.clear();
        events.clear();
        autopilot.plan(session.world(), &mut inputs);
        let frame = FrameInput {
            timestamp: frame_length * step,
            inputs: &inputs,
            facing: autopilot.facing(),
        };
        session.step(&frame, &mut events);
        presenter.present(&events, session.world());
    }

    let world = session.world();
    let player = query::player(world);
    info!(
        phase = ?query::phase(world),
        score = player.score,
        health = player.health,
        elapsed = ?query::now(world),
        deaths = presenter.hud().games_over(),
        visuals = presenter.scene().live_visuals(),
        "session finished"
    );
}
