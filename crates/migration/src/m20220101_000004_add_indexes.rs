use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: lookup by role for admin listings
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        // Reset tokens: lookup by user
        manager
            .create_index(
                Index::create()
                    .name("idx_password_reset_token_user")
                    .table(PasswordResetToken::Table)
                    .col(PasswordResetToken::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_password_reset_token_user").table(PasswordResetToken::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_role").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, Role }

#[derive(DeriveIden)]
enum PasswordResetToken { Table, UserId }
