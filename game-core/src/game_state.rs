use game_types::{GameState, GuessVerdict, Language};
use rand::Rng;
use std::collections::HashSet;

use crate::{ScoringEngine, SampleError, WordBank, create_hint_with};

/// First defined value of explicit argument, previous state, default
pub fn resolve<T>(explicit: Option<T>, previous: Option<T>, default: T) -> T {
    explicit.or(previous).unwrap_or(default)
}

fn sorted_letters(word: &str) -> Vec<char> {
    let mut letters: Vec<char> = word.to_lowercase().chars().collect();
    letters.sort_unstable();
    letters
}

/// Compare a guess against the answer. Only `Correct` counts; every other
/// verdict leaves the game untouched.
pub fn evaluate_guess(answer: &str, guess: &str) -> GuessVerdict {
    let guess = guess.trim();
    if guess.chars().count() != answer.chars().count() {
        return GuessVerdict::WrongLength;
    }
    if sorted_letters(guess) != sorted_letters(answer) {
        return GuessVerdict::WrongLetters;
    }
    if guess.to_lowercase() == answer.to_lowercase() {
        GuessVerdict::Correct
    } else {
        GuessVerdict::Anagram
    }
}

/// Answer, hint and value of a freshly drawn round
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub answer: String,
    pub hint: String,
    pub points: i64,
}

impl Round {
    pub fn from_answer<R: Rng + ?Sized>(rng: &mut R, answer: String) -> Self {
        let hint = create_hint_with(rng, &answer);
        let points = ScoringEngine::word_points(&answer);
        Self {
            answer,
            hint,
            points,
        }
    }

    /// Draw a round whose answer is not in the used-word history
    pub fn draw<R: Rng + ?Sized>(
        rng: &mut R,
        words: &WordBank,
        language: Language,
        length: usize,
        used_words: &[String],
    ) -> Result<Self, SampleError> {
        let excluding: HashSet<String> = used_words.iter().cloned().collect();
        let answer = words.sample_with(rng, language, length, &excluding)?;
        Ok(Self::from_answer(rng, answer))
    }

    pub fn apply(self, state: &mut GameState) {
        state.begin_round(self.answer, self.hint, self.points);
    }
}
