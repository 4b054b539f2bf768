use std::collections::HashMap;
use tracing::{debug, error};

use game_types::{GuessOutcome, Language};

use crate::game_engine::{EngineError, GameEngine};

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// A chat message read as a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!name arg arg...`
    Named { name: String, args: Vec<String> },
    /// A single bare word
    Guess(String),
}

/// Parse a chat message. Empty text and multi-word chatter are ignored.
pub fn parse_command(text: &str, prefix: &str) -> Option<Command> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if !prefix.is_empty() {
        if let Some(rest) = text.strip_prefix(prefix) {
            let mut parts = rest.split_whitespace();
            let name = parts.next()?.to_lowercase();
            return Some(Command::Named {
                name,
                args: parts.map(str::to_string).collect(),
            });
        }
    }

    let mut words = text.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => Some(Command::Guess(word.to_string())),
        _ => None,
    }
}

/// Language and length arguments of a start command, in any order
pub fn parse_start_args(args: &[String]) -> (Option<Language>, Option<usize>) {
    let mut language = None;
    let mut length = None;

    for arg in args {
        if let Ok(parsed) = arg.parse::<Language>() {
            language = Some(parsed);
        } else if let Ok(parsed) = arg.parse::<usize>() {
            length = Some(parsed);
        } else {
            debug!("Ignoring start argument {:?}", arg);
        }
    }

    (language, length)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartGame,
    ShowStats,
    ShowRound,
    Help,
}

/// Something to send back to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Reaction(String),
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Reply::Message(text.into())
    }

    fn reaction(name: &str) -> Self {
        Reply::Reaction(name.to_string())
    }
}

/// Command names and the actions they run. Built once at startup.
pub struct CommandTable {
    prefix: String,
    actions: HashMap<&'static str, Action>,
}

impl CommandTable {
    pub fn new(prefix: &str) -> Self {
        let actions = HashMap::from([
            ("knot", Action::StartGame),
            ("new", Action::StartGame),
            ("stats", Action::ShowStats),
            ("hint", Action::ShowRound),
            ("help", Action::Help),
        ]);

        Self {
            prefix: prefix.to_string(),
            actions,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Action> {
        self.actions.get(name).copied()
    }

    pub fn parse(&self, text: &str) -> Option<Command> {
        parse_command(text, &self.prefix)
    }

    /// Run the command in `text`, sent by `user` in `channel`, and collect
    /// the replies. Messages that are not commands produce no replies.
    pub async fn dispatch(
        &self,
        engine: &GameEngine,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Vec<Reply> {
        match self.parse(text) {
            None => Vec::new(),
            Some(Command::Guess(word)) => self.guess(engine, channel, user, &word).await,
            Some(Command::Named { name, args }) => match self.lookup(&name) {
                Some(Action::StartGame) => self.start(engine, channel, user, &args).await,
                Some(Action::ShowStats) => match engine.show_stats(channel, user).await {
                    Ok(text) => vec![Reply::Message(text)],
                    Err(e) => vec![self.error_reply(e)],
                },
                Some(Action::ShowRound) => match engine.current_round(channel).await {
                    Ok(Some(round)) => vec![Reply::message(format!("Current knot: {round}"))],
                    Ok(None) => vec![Reply::message(format!(
                        "No knot in progress. Start one with {}knot.",
                        self.prefix
                    ))],
                    Err(e) => vec![self.error_reply(e)],
                },
                Some(Action::Help) => vec![Reply::message(self.help_text())],
                None => {
                    debug!(channel, user, "Unknown command {}", name);
                    vec![
                        Reply::reaction("thinking_face"),
                        Reply::message(format!(
                            "Unknown command {}{}. Try {}help.",
                            self.prefix, name, self.prefix
                        )),
                    ]
                }
            },
        }
    }

    async fn start(
        &self,
        engine: &GameEngine,
        channel: &str,
        user: &str,
        args: &[String],
    ) -> Vec<Reply> {
        let (language, length) = parse_start_args(args);
        match engine.start_game(channel, language, length).await {
            Ok(round) => {
                let mut replies = Vec::new();
                if round.history_reset {
                    replies.push(Reply::message(
                        "Every word has been used, starting over with a fresh word list.",
                    ));
                }
                replies.push(Reply::message(format!(
                    "<@{user}> started a new knot: {round}"
                )));
                replies
            }
            Err(e) => vec![Reply::message(format!("Can't start a new knot. {e}"))],
        }
    }

    async fn guess(
        &self,
        engine: &GameEngine,
        channel: &str,
        user: &str,
        word: &str,
    ) -> Vec<Reply> {
        match engine.guess_word(channel, user, word).await {
            Ok(GuessOutcome::Solved(solved)) => {
                let mut replies = vec![Reply::reaction("trophy")];
                if solved.next_round.history_reset {
                    replies.push(Reply::message(
                        "Every word has been used, starting over with a fresh word list.",
                    ));
                }
                replies.push(Reply::Message(solved.to_string()));
                replies
            }
            Ok(GuessOutcome::Incorrect { .. }) => Vec::new(),
            // chatter in channels without a game
            Err(EngineError::NoActiveGame { .. }) => Vec::new(),
            Err(e) => {
                error!(channel, user, "Failed to finish round: {}", e);
                vec![Reply::message(format!("Couldn't create a new knot. {e}"))]
            }
        }
    }

    fn error_reply(&self, error: EngineError) -> Reply {
        match error {
            EngineError::NoActiveGame { .. } => Reply::message(format!(
                "No knot in progress. Start one with {}knot.",
                self.prefix
            )),
            other => Reply::message(format!("Can't. {other}")),
        }
    }

    fn help_text(&self) -> String {
        let p = &self.prefix;
        format!(
            "Unscramble the knot and type the word to score.\n\
             {p}knot [length] [language]  start a new knot (also {p}new)\n\
             {p}hint  show the current knot\n\
             {p}stats  show your stats"
        )
    }
}
