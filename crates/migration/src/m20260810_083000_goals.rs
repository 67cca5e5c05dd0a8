use sea_orm_migration::prelude::*;

use crate::m20260712_094500_init::Environments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    EnvironmentId,
    Name,
    TargetMinor,
    CurrentMinor,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    RelatedGoalId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Goals::EnvironmentId).string().not_null())
                    .col(ColumnDef::new(Goals::Name).string().not_null())
                    .col(
                        ColumnDef::new(Goals::TargetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Goals::CurrentMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Goals::OwnerId).string().not_null())
                    .col(ColumnDef::new(Goals::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-environment_id")
                            .from(Goals::Table, Goals::EnvironmentId)
                            .to(Environments::Table, Environments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goals-environment_id")
                    .table(Goals::Table)
                    .col(Goals::EnvironmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .add_column(ColumnDef::new(Transactions::RelatedGoalId).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .drop_column(Transactions::RelatedGoalId)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;

        Ok(())
    }
}
