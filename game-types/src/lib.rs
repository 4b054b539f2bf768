pub mod game;
pub mod language;
pub mod messages;
pub mod user;

// Re-export all types
pub use game::*;
pub use language::*;
pub use messages::*;
pub use user::*;
