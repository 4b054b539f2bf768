use game_types::UserTotals;
use std::fmt;

use crate::ScoringEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct WordSummary {
    pub word: String,
    pub points: i64,
}

impl WordSummary {
    fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            points: ScoringEngine::word_points(word),
        }
    }
}

/// Figures derived from a user's guessed words
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub user: String,
    pub total_points: i64,
    pub guesses: usize,
    pub average_length: f64, // rounded to one decimal
    pub median_length: usize,
    pub total_letters: usize,
    pub shortest: WordSummary,
    pub longest: WordSummary,
}

impl UserStats {
    /// `None` when the user has not guessed any words yet
    pub fn from_totals(user: &str, totals: &UserTotals) -> Option<Self> {
        if totals.words.is_empty() {
            return None;
        }

        let mut by_length: Vec<&String> = totals.words.iter().collect();
        by_length.sort_by_key(|word| word.chars().count());

        let lengths: Vec<usize> = by_length.iter().map(|word| word.chars().count()).collect();
        let total_letters: usize = lengths.iter().sum();
        let guesses = lengths.len();
        let average = total_letters as f64 / guesses as f64;

        Some(Self {
            user: user.to_string(),
            total_points: totals.points,
            guesses,
            average_length: (average * 10.0).round() / 10.0,
            median_length: lengths[guesses / 2],
            total_letters,
            shortest: WordSummary::new(by_length[0]),
            longest: WordSummary::new(by_length[guesses - 1]),
        })
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<@{}> has guessed {} knots for {} points. \
             Average length {:.1}, median {}, {} letters in total. \
             Shortest: {} ({} points). Longest: {} ({} points).",
            self.user,
            self.guesses,
            self.total_points,
            self.average_length,
            self.median_length,
            self.total_letters,
            self.shortest.word,
            self.shortest.points,
            self.longest.word,
            self.longest.points,
        )
    }
}

/// Chat text for a user's statistics
pub fn user_stats_text(user: &str, totals: Option<&UserTotals>) -> String {
    match totals.and_then(|totals| UserStats::from_totals(user, totals)) {
        Some(stats) => stats.to_string(),
        None => format!("<@{user}> has not guessed any knots yet."),
    }
}
