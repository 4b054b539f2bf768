use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::debug;

use crate::entities::{game_states, prelude::*};
use crate::store::GameStore;
use game_types::GameState;

/// Game states in the `game_states` table, one JSON document per key
pub struct GameStateRepository {
    db: DatabaseConnection,
}

impl GameStateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_state(model: game_states::Model) -> Result<GameState> {
        serde_json::from_str(&model.state)
            .with_context(|| format!("corrupt game state under {}", model.id))
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<GameState>> {
        let model = GameStates::find_by_id(key.to_string()).one(&self.db).await?;
        model.map(Self::model_to_state).transpose()
    }

    /// Insert or replace the state stored under `key`
    pub async fn upsert(&self, key: &str, state: &GameState) -> Result<()> {
        let model = game_states::ActiveModel {
            id: ActiveValue::Set(key.to_string()),
            state: ActiveValue::Set(serde_json::to_string(state)?),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        GameStates::insert(model)
            .on_conflict(
                OnConflict::column(game_states::Column::Id)
                    .update_columns([game_states::Column::State, game_states::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!("Saved game state {}", key);
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(GameStates::find().count(&self.db).await?)
    }
}

#[async_trait]
impl GameStore for GameStateRepository {
    async fn load(&self, key: &str) -> Result<Option<GameState>> {
        self.find_by_key(key).await
    }

    async fn save(&self, key: &str, state: &GameState) -> Result<()> {
        self.upsert(key, state).await
    }
}
