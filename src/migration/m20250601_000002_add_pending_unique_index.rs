use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // At most one pending appeal per user.
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_appeals_one_pending
             ON appeals (user_id) WHERE status = 'pending'",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP INDEX IF EXISTS idx_appeals_one_pending")
            .await?;

        Ok(())
    }
}
