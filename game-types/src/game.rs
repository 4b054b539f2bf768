use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::language::Language;
use crate::user::{ScoreRecord, UserTotals};

/// Persisted state of the game in one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameState {
    pub channel: String,
    pub language: Language,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub used_words: Vec<String>,
    #[serde(default)]
    pub scores: BTreeMap<String, ScoreRecord>,
    #[serde(default)]
    pub updated_at: String, // ISO 8601 string
}

impl GameState {
    /// Initial state for a channel that has never had a game
    pub fn new(channel: impl Into<String>, language: Language) -> Self {
        Self {
            channel: channel.into(),
            language,
            answer: String::new(),
            hint: String::new(),
            points: 0,
            used_words: Vec::new(),
            scores: BTreeMap::new(),
            updated_at: String::new(),
        }
    }

    /// Length of the current answer in characters, if a round has been drawn
    pub fn answer_length(&self) -> Option<usize> {
        if self.answer.is_empty() {
            None
        } else {
            Some(self.answer.chars().count())
        }
    }

    /// Move the current answer into the used-word history.
    pub fn retire_answer(&mut self) {
        if !self.answer.is_empty() {
            self.used_words.push(self.answer.clone());
        }
    }

    pub fn begin_round(&mut self, answer: String, hint: String, points: i64) {
        self.answer = answer;
        self.hint = hint;
        self.points = points;
    }

    /// Upgrade every legacy score entry to the detailed form
    pub fn normalize_scores(&mut self) {
        let legacy_users: Vec<String> = self
            .scores
            .iter()
            .filter(|(_, record)| record.is_legacy())
            .map(|(user, _)| user.clone())
            .collect();

        for user in legacy_users {
            if let Some(record) = self.scores.remove(&user) {
                self.scores.insert(user, record.normalize().into());
            }
        }
    }

    pub fn totals(&self, user: &str) -> Option<UserTotals> {
        self.scores.get(user).cloned().map(ScoreRecord::normalize)
    }
}
