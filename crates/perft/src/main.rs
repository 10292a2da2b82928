//! chess-perft - counts move-generation leaf nodes and drives games against
//! an external UCI engine.

use anyhow::Context;
use chess_rules::{perft, perft_divide, GameSession};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uci::{BridgeConfig, EngineBridge};

#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Move generation testing and engine bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the move tree to a fixed depth
    Perft {
        /// Depth in plies
        depth: u32,
        /// Starting position (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Let a UCI engine play both sides from a position
    Play {
        /// Bridge configuration file
        #[arg(short, long, default_value = "bridge.toml")]
        config: PathBuf,
        /// Starting position (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
    },
}

fn session_from(fen: Option<&str>) -> anyhow::Result<GameSession> {
    match fen {
        Some(fen) => GameSession::from_fen(fen).with_context(|| format!("invalid position: {}", fen)),
        None => Ok(GameSession::new()),
    }
}

fn run_perft(fen: Option<&str>, depth: u32, divide: bool) -> anyhow::Result<()> {
    let mut session = session_from(fen)?;
    tracing::info!(fen = %session.to_fen(), depth, "running perft");

    let start = Instant::now();
    let total = if divide {
        let counts = perft_divide(&mut session, depth)?;
        for (mv, nodes) in &counts {
            println!("{}: {}", mv, nodes);
        }
        println!();
        counts.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(&mut session, depth)?
    };
    let elapsed = start.elapsed();

    println!("Nodes searched: {}", total);
    tracing::info!("perft({}) = {} in {:.3}s", depth, total, elapsed.as_secs_f64());
    Ok(())
}

fn run_play(config_path: &Path, fen: Option<&str>) -> anyhow::Result<()> {
    let config = BridgeConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    tracing::info!("Engine: {:?}", config.engine_path);

    let mut session = session_from(fen)?;
    let mut bridge = EngineBridge::start(config).context("starting engine")?;
    if let Some(name) = bridge.engine_name() {
        tracing::info!("Connected to {}", name);
    }

    let result = bridge.play_out(&mut session)?;
    println!("{}", session.uci_position());
    println!("{}", session.to_fen());
    match result {
        Some(result) => println!("Result: {}", result),
        None => println!("Result: * (ply limit reached)"),
    }

    bridge.quit()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Perft { depth, fen, divide } => run_perft(fen.as_deref(), depth, divide),
        Commands::Play { config, fen } => run_play(&config, fen.as_deref()),
    }
}
