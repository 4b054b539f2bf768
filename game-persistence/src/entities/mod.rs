pub mod game_states;
pub mod prelude;
