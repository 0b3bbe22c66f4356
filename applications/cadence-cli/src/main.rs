/// Cadence - terminal player driving the playback core
use anyhow::Context;
use cadence_cli::{parse_line, CadenceConfig, Input, HELP};
use cadence_playback::{
    MediaPlaylist, PlaybackController, PlaybackEvent, PlayerCommand, PlayerLoop, PresetEqualizer,
    RepeatPolicy, SimulatedEngine,
};
use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence terminal player (simulated engine)", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml when present)
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Repeat policy: play-once, play-order, one-loop, list-loop, random
    #[arg(short, long)]
    repeat: Option<RepeatPolicy>,

    /// Simulated length of every track, in seconds
    #[arg(long)]
    track_length: Option<u64>,

    /// Initial volume (0-100)
    #[arg(long)]
    volume: Option<u8>,

    /// Start playing immediately
    #[arg(long)]
    autoplay: bool,

    /// Media identifiers to queue (appended to the configured tracks)
    tracks: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config =
        CadenceConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    tracing::info!(
        "Starting Cadence with {} track(s), repeat {:?}",
        config.playlist.tracks.len(),
        config.playlist.repeat
    );

    let mut engine = SimulatedEngine::with_wall_clock()
        .with_default_length(config.simulation.track_length());
    for media in &config.simulation.unreadable {
        engine.mark_unreadable(media.as_str());
    }

    let equalizer = PresetEqualizer::new(config.equalizer.clone());
    let mut controller =
        PlaybackController::with_equalizer(engine, Box::new(equalizer), &config.playback);
    controller.set_volume(config.playback.initial_volume);
    controller.load_eq_presets();
    controller.set_playlist(Box::new(MediaPlaylist::new(
        config.playlist.tracks.clone(),
        config.playlist.repeat,
    )));

    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    let printer = thread::Builder::new()
        .name("cadence-events".to_string())
        .spawn(move || print_events(event_rx))
        .context("failed to spawn event printer")?;

    if cli.autoplay {
        command_tx.send(PlayerCommand::Play).ok();
    }

    thread::Builder::new()
        .name("cadence-stdin".to_string())
        .spawn(move || read_commands(command_tx))
        .context("failed to spawn stdin reader")?;

    println!("Type `help` for commands.");
    let player = PlayerLoop::new(controller, command_rx, event_tx);
    let controller = player.run();
    tracing::info!("Stopped at {:?}", controller.position());

    // The loop has dropped its event sender; the printer drains what is left and exits
    drop(controller);
    printer.join().ok();

    Ok(())
}

fn apply_overrides(config: &mut CadenceConfig, cli: &Cli) {
    if let Some(repeat) = cli.repeat {
        config.playlist.repeat = repeat;
    }
    if let Some(length) = cli.track_length {
        config.simulation.track_length_secs = length;
    }
    if let Some(volume) = cli.volume {
        config.playback.initial_volume = volume;
    }
    config.playlist.tracks.extend(cli.tracks.iter().cloned());
}

fn read_commands(commands: Sender<PlayerCommand>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_line(&line) {
            Ok(Input::Command(command)) => {
                let shutdown = command == PlayerCommand::Shutdown;
                if commands.send(command).is_err() || shutdown {
                    return;
                }
            }
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Nothing) => {}
            Err(e) => println!("{e}"),
        }
    }

    // End of input
    commands.send(PlayerCommand::Shutdown).ok();
}

fn print_events(events: Receiver<PlaybackEvent>) {
    for event in events {
        match event {
            PlaybackEvent::PositionChanged { position_ms } => {
                println!("  {}", format_time(position_ms));
            }
            PlaybackEvent::DurationChanged { duration_ms } => {
                println!("Duration {}", format_time(duration_ms));
            }
            PlaybackEvent::StateChanged { state } => println!("State: {:?}", state),
            PlaybackEvent::Error { message } => println!("Error: {message}"),
        }
    }
}

fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
