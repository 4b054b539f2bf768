use anyhow::{Context, Result};
use async_trait::async_trait;
use game_types::GameState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::store::GameStore;

/// In-process store. States are kept as JSON text so that loading goes
/// through the same deserialization as the database.
#[derive(Default)]
pub struct MemoryGameStore {
    items: RwLock<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON under `key`, bypassing serialization
    pub async fn insert_raw(&self, key: &str, json: &str) {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), json.to_string());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        let items = self.items.read().await;
        items.get(key).cloned()
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn load(&self, key: &str) -> Result<Option<GameState>> {
        let items = self.items.read().await;
        items
            .get(key)
            .map(|json| {
                serde_json::from_str(json)
                    .with_context(|| format!("corrupt game state under {key}"))
            })
            .transpose()
    }

    async fn save(&self, key: &str, state: &GameState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let mut items = self.items.write().await;
        items.insert(key.to_string(), json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
