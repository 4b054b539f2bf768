#![allow(dead_code)]

use game_core::{Round, WordBank};
use game_types::{GameState, Language};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Creates a test WordBank with a known set of words
pub fn create_test_bank() -> WordBank {
    let english = "apple\nchair\ntests\nvalid\nhello\nworld\nhouse\nmouse\ntrain\nplane\nwater\nstone\nbread\ncream\nbanana\ncherry\nsilent";
    let finnish = "kissa\nkoira\npöytä\ntalo\nikkuna";
    WordBank::new()
        .with_word_list(Language::En, english)
        .with_word_list(Language::Fi, finnish)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a channel state with a specific answer already drawn
pub fn create_state_with_answer(channel: &str, language: Language, answer: &str) -> GameState {
    let mut state = GameState::new(channel, language);
    let mut rng = seeded_rng(0);
    Round::from_answer(&mut rng, answer.to_string()).apply(&mut state);
    state
}
