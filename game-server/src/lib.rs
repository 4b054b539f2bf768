pub mod commands;
pub mod config;
pub mod game_engine;

pub use commands::{CommandTable, Reply};
pub use config::Config;
pub use game_engine::{EngineError, GameEngine, GameSettings};
