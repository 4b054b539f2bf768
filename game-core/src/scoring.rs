use game_types::{ScoreRecord, UserTotals};
use std::collections::BTreeMap;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Value of a single letter; rarer letters are worth more
    pub fn letter_value(letter: char) -> i64 {
        match letter.to_lowercase().next().unwrap_or(letter) {
            'a' | 'e' | 'i' | 'o' | 'u' | 'n' | 'r' | 's' | 't' | 'l' => 1,
            'b' | 'c' | 'd' | 'f' | 'g' | 'h' | 'k' | 'm' | 'p' | 'v' | 'w' | 'y' | 'ä'
            | 'ö' => 2,
            _ => 3,
        }
    }

    /// Points awarded for guessing `word`
    pub fn word_points(word: &str) -> i64 {
        word.chars().map(Self::letter_value).sum()
    }

    /// Credit `user` with a correctly guessed `answer` and return the new
    /// totals. Legacy counters are upgraded first.
    pub fn record(
        scores: &mut BTreeMap<String, ScoreRecord>,
        user: &str,
        answer: &str,
        points: i64,
    ) -> UserTotals {
        let mut totals = scores
            .remove(user)
            .map(ScoreRecord::normalize)
            .unwrap_or_default();

        totals.points += points;
        totals.words.push(answer.to_string());

        scores.insert(user.to_string(), totals.clone().into());
        totals
    }

    /// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, ...
    pub fn ordinal(n: usize) -> String {
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!("{n}{suffix}")
    }
}
