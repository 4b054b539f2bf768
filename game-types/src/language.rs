use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    En,
    Fi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fi];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fi => "fi",
        }
    }

    /// Emoji name used as the language marker in announcements
    pub fn flag(&self) -> &'static str {
        match self {
            Language::En => "flag-gb",
            Language::Fi => "flag-fi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.code() == code)
            .ok_or(UnknownLanguage(s.to_string()))
    }
}
