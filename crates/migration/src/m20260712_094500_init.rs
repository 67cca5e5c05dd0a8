use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Users {
    Table,
    Uid,
    DisplayName,
    Email,
    PhotoUrl,
    EnvironmentId,
    CreatedAt,
}

#[derive(Iden)]
pub enum Environments {
    Table,
    Id,
    Name,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum EnvironmentMembers {
    Table,
    EnvironmentId,
    UserId,
    JoinedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    EnvironmentId,
    Description,
    AmountMinor,
    Kind,
    Category,
    EntryDate,
    AddedBy,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PhotoUrl).string())
                    // No foreign key: may point at a deleted environment until
                    // the next profile sync clears it.
                    .col(ColumnDef::new(Users::EnvironmentId).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Environments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Environments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Environments::Name).string().not_null())
                    .col(ColumnDef::new(Environments::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Environments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnvironmentMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnvironmentMembers::EnvironmentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentMembers::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentMembers::JoinedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EnvironmentMembers::EnvironmentId)
                            .col(EnvironmentMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-environment_members-environment_id")
                            .from(EnvironmentMembers::Table, EnvironmentMembers::EnvironmentId)
                            .to(Environments::Table, Environments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-environment_members-user_id")
                            .from(EnvironmentMembers::Table, EnvironmentMembers::UserId)
                            .to(Users::Table, Users::Uid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-environment_members-user_id")
                    .table(EnvironmentMembers::Table)
                    .col(EnvironmentMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::EnvironmentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Category).string())
                    .col(ColumnDef::new(Transactions::EntryDate).date().not_null())
                    .col(ColumnDef::new(Transactions::AddedBy).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-environment_id")
                            .from(Transactions::Table, Transactions::EnvironmentId)
                            .to(Environments::Table, Environments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-environment_id-entry_date")
                    .table(Transactions::Table)
                    .col(Transactions::EnvironmentId)
                    .col(Transactions::EntryDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnvironmentMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Environments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
