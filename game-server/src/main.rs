use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use game_core::WordBank;
use game_persistence::{GameStateRepository, connection::connect_and_migrate};
use game_server::{CommandTable, Config, GameEngine, Reply};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting knot...");

    let config = Config::from_env()?;

    info!("Loading words from directory: {}", config.words_directory);
    let words = WordBank::load_directory(&config.words_directory).with_context(|| {
        format!(
            "failed to load word lists from '{}', set WORDS_DIRECTORY to a directory of <language>.txt files",
            config.words_directory
        )
    })?;

    let db = connect_and_migrate(&config.database_url)
        .await
        .context("failed to connect to database and run migrations")?;
    let store = Arc::new(GameStateRepository::new(db));

    let engine = GameEngine::new(store, Arc::new(words), config.game_settings());
    let commands = CommandTable::new(&config.command_prefix);

    info!("Reading messages as '<channel> <user> <text>' from stdin. Press Ctrl+C to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => handle_line(&engine, &commands, &line).await,
                    None => break,
                }
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Shutdown complete.");
    Ok(())
}

async fn handle_line(engine: &GameEngine, commands: &CommandTable, line: &str) {
    let mut parts = line.trim().splitn(3, char::is_whitespace);
    let (Some(channel), Some(user), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        if !line.trim().is_empty() {
            warn!("Expected '<channel> <user> <text>', got {:?}", line);
        }
        return;
    };

    for reply in commands.dispatch(engine, channel, user, text).await {
        match reply {
            Reply::Message(text) => println!("[{channel}] {text}"),
            Reply::Reaction(name) => println!("[{channel}] :{name}:"),
        }
    }
}
