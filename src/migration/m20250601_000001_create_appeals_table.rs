use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Appeals {
    Table,
    Id,
    UserId,
    Username,
    DisplayName,
    Message,
    Status,
    CreatedAt,
    ResolvedAt,
    ResolvedBy,
    ResolutionReason,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appeals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appeals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appeals::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Appeals::Username).string_len(64).null())
                    .col(ColumnDef::new(Appeals::DisplayName).string_len(128).null())
                    .col(ColumnDef::new(Appeals::Message).text().not_null())
                    .col(
                        ColumnDef::new(Appeals::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Appeals::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Appeals::ResolvedAt).timestamp().null())
                    .col(ColumnDef::new(Appeals::ResolvedBy).big_integer().null())
                    .col(ColumnDef::new(Appeals::ResolutionReason).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appeals_user_id")
                    .table(Appeals::Table)
                    .col(Appeals::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appeals_status")
                    .table(Appeals::Table)
                    .col(Appeals::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appeals::Table).to_owned())
            .await
    }
}
