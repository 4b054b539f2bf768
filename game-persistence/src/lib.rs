pub mod connection;
pub mod entities;
pub mod memory;
pub mod repositories;
pub mod store;

pub use memory::MemoryGameStore;
pub use repositories::GameStateRepository;
pub use store::{GameStore, storage_key};
