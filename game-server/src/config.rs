use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use game_core::DEFAULT_WORD_LENGTH;
use game_persistence::connection::DEFAULT_DATABASE_URL;
use game_types::Language;

use crate::commands::DEFAULT_COMMAND_PREFIX;
use crate::game_engine::{DEFAULT_NAMESPACE, GameSettings};

#[derive(Debug, Clone)]
pub struct Config {
    pub words_directory: String,
    pub database_url: String,
    pub default_language: Language,
    pub default_word_length: usize,
    pub storage_namespace: String,
    pub command_prefix: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            words_directory: "./words".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_language: Language::Fi,
            default_word_length: DEFAULT_WORD_LENGTH,
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from `lookup`, falling back to defaults for
    /// unset variables. Values that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();

        Ok(Self {
            words_directory: lookup("WORDS_DIRECTORY").unwrap_or(defaults.words_directory),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            default_language: parse_var(&lookup, "DEFAULT_LANGUAGE")?
                .unwrap_or(defaults.default_language),
            default_word_length: parse_var(&lookup, "DEFAULT_WORD_LENGTH")?
                .unwrap_or(defaults.default_word_length),
            storage_namespace: lookup("STORAGE_NAMESPACE").unwrap_or(defaults.storage_namespace),
            command_prefix: lookup("COMMAND_PREFIX").unwrap_or(defaults.command_prefix),
        })
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            namespace: self.storage_namespace.clone(),
            default_language: self.default_language,
            default_word_length: self.default_word_length,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {name}: {value:?}"))
        })
        .transpose()
}
