use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Invites {
    Table,
    Id,
    SenderId,
    SenderName,
    RecipientEmail,
    EnvironmentId,
    EnvironmentName,
    Status,
    CreatedAt,
    AcceptedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invites::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invites::SenderId).string().not_null())
                    .col(ColumnDef::new(Invites::SenderName).string().not_null())
                    .col(
                        ColumnDef::new(Invites::RecipientEmail)
                            .string()
                            .not_null(),
                    )
                    // No foreign key: an invite may outlive its target
                    // environment, acceptance then fails with not-found.
                    .col(ColumnDef::new(Invites::EnvironmentId).string().not_null())
                    .col(
                        ColumnDef::new(Invites::EnvironmentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invites::Status).string().not_null())
                    .col(ColumnDef::new(Invites::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Invites::AcceptedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invites-recipient_email")
                    .table(Invites::Table)
                    .col(Invites::RecipientEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invites::Table).to_owned())
            .await?;
        Ok(())
    }
}
