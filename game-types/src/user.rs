use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Cumulative points and guessed words of one user in one channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserTotals {
    pub points: i64,
    #[serde(default)]
    pub words: Vec<String>,
}

impl UserTotals {
    pub fn guess_count(&self) -> usize {
        self.words.len()
    }
}

/// A stored score entry. Early game states kept a bare guess counter per
/// user; those are read as `Legacy` and upgraded on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ScoreRecord {
    Legacy(i64),
    Detailed(UserTotals),
}

impl ScoreRecord {
    /// Upgrade to the detailed form. A legacy counter keeps its value as
    /// points; the word history behind it is gone.
    pub fn normalize(self) -> UserTotals {
        match self {
            ScoreRecord::Legacy(points) => UserTotals {
                points,
                words: Vec::new(),
            },
            ScoreRecord::Detailed(totals) => totals,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ScoreRecord::Legacy(_))
    }
}

impl From<UserTotals> for ScoreRecord {
    fn from(totals: UserTotals) -> Self {
        ScoreRecord::Detailed(totals)
    }
}
