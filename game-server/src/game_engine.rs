use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use game_core::{
    DEFAULT_WORD_LENGTH, Round, SampleError, ScoringEngine, WordBank, clamp_length,
    evaluate_guess, random_word_length, resolve, user_stats_text,
};
use game_persistence::{GameStore, storage_key};
use game_types::{
    GameState, GuessOutcome, GuessVerdict, Language, RoundAnnouncement, SolvedRound,
};

pub const DEFAULT_NAMESPACE: &str = "knot";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("There are no {length}-letter words in {language}.")]
    NoMatchingWords { language: Language, length: usize },
    #[error("Every {length}-letter word in {language} has already been used.")]
    WordsExhausted { language: Language, length: usize },
    #[error("There is no game going on in {channel}.")]
    NoActiveGame { channel: String },
    #[error("Could not reach the game storage: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<SampleError> for EngineError {
    fn from(error: SampleError) -> Self {
        match error {
            SampleError::NoMatchingWords { language, length } => {
                EngineError::NoMatchingWords { language, length }
            }
            SampleError::Exhausted { language, length } => {
                EngineError::WordsExhausted { language, length }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSettings {
    pub namespace: String,
    pub default_language: Language,
    pub default_word_length: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_language: Language::Fi,
            default_word_length: DEFAULT_WORD_LENGTH,
        }
    }
}

/// Runs the game for every channel. Each operation holds the channel's lock
/// from load to save, so concurrent commands in one channel apply in order.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    words: Arc<WordBank>,
    settings: GameSettings,
    channel_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GameEngine {
    pub fn new(store: Arc<dyn GameStore>, words: Arc<WordBank>, settings: GameSettings) -> Self {
        info!(
            "Game engine ready with languages {:?} under namespace '{}'",
            words.languages(),
            settings.namespace
        );
        Self {
            store,
            words,
            settings,
            channel_locks: DashMap::new(),
        }
    }

    /// Start a new round in `channel`, replacing any round in progress.
    /// Language and length fall back to the previous round, then to the
    /// configured defaults.
    pub async fn start_game(
        &self,
        channel: &str,
        language: Option<Language>,
        length: Option<usize>,
    ) -> Result<RoundAnnouncement, EngineError> {
        let _guard = self.lock_channel(channel).await;
        let key = self.key(channel);

        let previous = self.load_state(&key).await?;
        let mut state = previous
            .clone()
            .unwrap_or_else(|| GameState::new(channel, self.settings.default_language));

        state.language = resolve(
            language,
            previous.as_ref().map(|p| p.language),
            self.settings.default_language,
        );
        let length = clamp_length(resolve(
            length,
            previous.as_ref().and_then(GameState::answer_length),
            self.settings.default_word_length,
        ));

        state.retire_answer();
        let history_reset = self
            .draw_next_round(&key, previous.as_ref(), &mut state, length)
            .await?;
        self.save_state(&key, &mut state).await?;

        info!(
            channel,
            language = %state.language,
            length,
            "Started new round"
        );
        Ok(announce(&state, history_reset))
    }

    /// Check `guess` against the current answer. Only an exact match changes
    /// anything: it credits `user` and starts the next round.
    pub async fn guess_word(
        &self,
        channel: &str,
        user: &str,
        guess: &str,
    ) -> Result<GuessOutcome, EngineError> {
        let _guard = self.lock_channel(channel).await;
        let key = self.key(channel);

        let loaded = match self.load_state(&key).await? {
            Some(state) if !state.answer.is_empty() => state,
            _ => {
                return Err(EngineError::NoActiveGame {
                    channel: channel.to_string(),
                });
            }
        };

        let verdict = evaluate_guess(&loaded.answer, guess);
        if verdict != GuessVerdict::Correct {
            debug!(channel, user, ?verdict, "Guess did not match");
            return Ok(GuessOutcome::Incorrect { verdict });
        }

        let mut state = loaded.clone();
        let word = state.answer.clone();
        let points_earned = state.points;
        let totals = ScoringEngine::record(&mut state.scores, user, &word, points_earned);

        let length = self.next_round_length(state.language, word.chars().count());
        state.retire_answer();
        let history_reset = self
            .draw_next_round(&key, Some(&loaded), &mut state, length)
            .await?;
        self.save_state(&key, &mut state).await?;

        let guess_count = totals.guess_count();
        info!(
            channel,
            user,
            word = %word,
            points = points_earned,
            total = totals.points,
            "Knot solved"
        );

        Ok(GuessOutcome::Solved(SolvedRound {
            user: user.to_string(),
            word,
            points_earned,
            total_points: totals.points,
            guess_count,
            rank: ScoringEngine::ordinal(guess_count),
            next_round: announce(&state, history_reset),
        }))
    }

    /// Stats text for `user` in `channel`
    pub async fn show_stats(&self, channel: &str, user: &str) -> Result<String, EngineError> {
        let _guard = self.lock_channel(channel).await;
        let key = self.key(channel);

        let state = self
            .load_state(&key)
            .await?
            .ok_or_else(|| EngineError::NoActiveGame {
                channel: channel.to_string(),
            })?;

        Ok(user_stats_text(user, state.totals(user).as_ref()))
    }

    /// Current round of `channel`, if one is running
    pub async fn current_round(
        &self,
        channel: &str,
    ) -> Result<Option<RoundAnnouncement>, EngineError> {
        let _guard = self.lock_channel(channel).await;
        let state = self.load_state(&self.key(channel)).await?;
        Ok(state
            .filter(|state| !state.answer.is_empty())
            .map(|state| announce(&state, false)))
    }

    fn key(&self, channel: &str) -> String {
        storage_key(&self.settings.namespace, channel)
    }

    // One lock per channel seen, never evicted
    async fn lock_channel(&self, channel: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .channel_locks
            .entry(channel.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    async fn load_state(&self, key: &str) -> Result<Option<GameState>, EngineError> {
        let mut state = self.store.load(key).await?;
        if let Some(state) = state.as_mut() {
            state.normalize_scores();
        }
        Ok(state)
    }

    async fn save_state(&self, key: &str, state: &mut GameState) -> Result<(), EngineError> {
        state.updated_at = chrono::Utc::now().to_rfc3339();
        self.store.save(key, state).await?;
        Ok(())
    }

    /// Gaussian length for the next round, or the solved word's length when
    /// the bank has nothing of the sampled length.
    fn next_round_length(&self, language: Language, solved_length: usize) -> usize {
        let length = random_word_length(&mut rand::thread_rng());
        if self.words.word_count(language, length) == 0 {
            debug!(length, solved_length, "No words of sampled length, reusing solved length");
            solved_length
        } else {
            length
        }
    }

    fn draw(&self, state: &GameState, length: usize) -> Result<Round, SampleError> {
        let mut rng = rand::thread_rng();
        Round::draw(&mut rng, &self.words, state.language, length, &state.used_words)
    }

    /// Draw the next round into `state`. When the used-word history has
    /// swallowed every candidate, `loaded` is persisted with its history
    /// cleared and the draw is retried with a history holding only the
    /// answer just retired. Returns whether the history was reset.
    async fn draw_next_round(
        &self,
        key: &str,
        loaded: Option<&GameState>,
        state: &mut GameState,
        length: usize,
    ) -> Result<bool, EngineError> {
        match self.draw(state, length) {
            Ok(round) => {
                round.apply(state);
                return Ok(false);
            }
            Err(SampleError::Exhausted { language, length }) if !state.used_words.is_empty() => {
                info!(
                    channel = %state.channel,
                    %language,
                    length,
                    "Every word has been used, resetting word history"
                );
            }
            Err(error) => return Err(draw_failed(state, error)),
        }

        if let Some(loaded) = loaded {
            let mut cleared = loaded.clone();
            cleared.used_words.clear();
            self.save_state(key, &mut cleared).await?;
        }

        state.used_words = loaded
            .map(|loaded| loaded.answer.clone())
            .filter(|answer| !answer.is_empty())
            .into_iter()
            .collect();

        let round = match self.draw(state, length) {
            Ok(round) => round,
            // the retired answer is the only word of this length
            Err(SampleError::Exhausted { .. }) if !state.used_words.is_empty() => {
                state.used_words.clear();
                self.draw(state, length)
                    .map_err(|error| draw_failed(state, error))?
            }
            Err(error) => return Err(draw_failed(state, error)),
        };
        round.apply(state);
        Ok(true)
    }
}

fn draw_failed(state: &GameState, error: SampleError) -> EngineError {
    warn!(channel = %state.channel, "Could not draw a new word: {}", error);
    error.into()
}

fn announce(state: &GameState, history_reset: bool) -> RoundAnnouncement {
    RoundAnnouncement {
        channel: state.channel.clone(),
        language: state.language,
        hint: state.hint.clone(),
        points: state.points,
        word_length: state.answer.chars().count(),
        history_reset,
    }
}
