pub mod game_state;
pub mod hint;
pub mod scoring;
pub mod stats;
pub mod word_bank;
pub mod word_length;

// Re-export main components
pub use game_state::*;
pub use hint::*;
pub use scoring::*;
pub use stats::*;
pub use word_bank::*;
pub use word_length::*;
