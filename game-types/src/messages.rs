use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::language::Language;

/// Render a word as separate upper-case letter tiles: `` `C` `A` `T` ``
pub fn format_word(word: &str) -> String {
    word.chars()
        .map(|letter| format!("`{}`", letter.to_uppercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A freshly drawn round, ready to be relayed to the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundAnnouncement {
    pub channel: String,
    pub language: Language,
    pub hint: String,
    pub points: i64,
    pub word_length: usize,
    /// The used-word history ran out and was cleared before this draw
    pub history_reset: bool,
}

impl fmt::Display for RoundAnnouncement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} :{}: ({} points)",
            format_word(&self.hint),
            self.language.flag(),
            self.points
        )
    }
}

/// Why a guess did not count. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuessVerdict {
    WrongLength,
    WrongLetters,
    /// Same letters as the answer, but a different word
    Anagram,
    Correct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SolvedRound {
    pub user: String,
    pub word: String,
    pub points_earned: i64,
    pub total_points: i64,
    pub guess_count: usize,
    pub rank: String, // "1st", "2nd", ...
    pub next_round: RoundAnnouncement,
}

impl fmt::Display for SolvedRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<@{}> guessed their {} knot {} (+{}, {} points total)\n\nNew knot: {}",
            self.user,
            self.rank,
            format_word(&self.word),
            self.points_earned,
            self.total_points,
            self.next_round
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuessOutcome {
    Incorrect { verdict: GuessVerdict },
    Solved(SolvedRound),
}

impl GuessOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, GuessOutcome::Solved(_))
    }
}
