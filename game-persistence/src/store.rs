use anyhow::Result;
use async_trait::async_trait;
use game_types::GameState;

/// Key under which a channel's game is stored: `<namespace>-<channel>`
pub fn storage_key(namespace: &str, channel: &str) -> String {
    format!("{namespace}-{channel}")
}

/// Load/save of game states by key. Only the durability of the last `save`
/// is assumed; callers serialize access per key themselves.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<GameState>>;

    async fn save(&self, key: &str, state: &GameState) -> Result<()>;
}
