use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameStates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameStates::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(GameStates::State).text().not_null())
                    .col(
                        ColumnDef::new(GameStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameStates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameStates {
    Table,
    Id,
    State,
    UpdatedAt,
}
