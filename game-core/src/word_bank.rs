use anyhow::{Context, Result};
use game_types::Language;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

pub const MIN_WORD_LENGTH: usize = 3;
pub const MAX_WORD_LENGTH: usize = 15;

/// Random draws attempted before a sample is declared exhausted
pub const MAX_SAMPLE_DRAWS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("no {length}-letter words in {language}")]
    NoMatchingWords { language: Language, length: usize },
    #[error("all {length}-letter words in {language} have been used")]
    Exhausted { language: Language, length: usize },
}

/// Candidate answers per language. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    words: HashMap<Language, Vec<String>>,
}

fn char_len(word: &str) -> usize {
    word.chars().count()
}

impl WordBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a word list: one word per line, `#` comments and blank lines
    /// skipped. Words outside the playable length range are dropped.
    pub fn parse_word_list(word_list: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        word_list
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|word| word.to_lowercase())
            .filter(|word| (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&char_len(word)))
            .filter(|word| seen.insert(word.clone()))
            .collect()
    }

    /// Replace the words of one language
    pub fn with_word_list(mut self, language: Language, word_list: &str) -> Self {
        let words = Self::parse_word_list(word_list);
        debug!("Loaded {} {} words", words.len(), language);
        self.words.insert(language, words);
        self
    }

    /// Load `<language>.txt` files from a directory. Languages without a file
    /// are left empty; a directory with no word files at all is an error.
    pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut bank = Self::new();

        for language in Language::ALL {
            let path = dir.join(format!("{}.txt", language.code()));
            if !path.exists() {
                continue;
            }
            let word_list = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read word list {}", path.display()))?;
            bank = bank.with_word_list(language, &word_list);
            info!(
                "Loaded {} words for {} from {}",
                bank.total_words(language),
                language,
                path.display()
            );
        }

        if bank.words.is_empty() {
            anyhow::bail!("no word lists found in {}", dir.display());
        }
        Ok(bank)
    }

    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.words.keys().copied().collect();
        languages.sort();
        languages
    }

    pub fn total_words(&self, language: Language) -> usize {
        self.words.get(&language).map_or(0, Vec::len)
    }

    pub fn word_count(&self, language: Language, length: usize) -> usize {
        self.words_of_length(language, length).len()
    }

    pub fn contains(&self, language: Language, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.words
            .get(&language)
            .is_some_and(|words| words.contains(&word))
    }

    fn words_of_length(&self, language: Language, length: usize) -> Vec<&String> {
        self.words
            .get(&language)
            .map(|words| words.iter().filter(|word| char_len(word) == length).collect())
            .unwrap_or_default()
    }

    /// Draw a random word of exactly `length` characters that is not in
    /// `excluding`.
    pub fn sample(
        &self,
        language: Language,
        length: usize,
        excluding: &HashSet<String>,
    ) -> Result<String, SampleError> {
        self.sample_with(&mut rand::thread_rng(), language, length, excluding)
    }

    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        language: Language,
        length: usize,
        excluding: &HashSet<String>,
    ) -> Result<String, SampleError> {
        let candidates = self.words_of_length(language, length);
        if candidates.is_empty() {
            return Err(SampleError::NoMatchingWords { language, length });
        }

        for _ in 0..MAX_SAMPLE_DRAWS {
            let word = candidates[rng.gen_range(0..candidates.len())];
            if !excluding.contains(word) {
                return Ok(word.clone());
            }
        }

        Err(SampleError::Exhausted { language, length })
    }
}
