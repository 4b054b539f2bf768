pub use super::game_states::Entity as GameStates;
