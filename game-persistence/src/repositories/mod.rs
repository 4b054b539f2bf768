pub mod game_state_repository;

pub use game_state_repository::GameStateRepository;
