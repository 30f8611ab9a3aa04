//! Records which admin last moved a money request.

use sea_orm_migration::prelude::*;

use super::m20260301_000000_init::MoneyRequests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Reviewed {
    ReviewedBy,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(MoneyRequests::Table)
                    .add_column(ColumnDef::new(Reviewed::ReviewedBy).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(MoneyRequests::Table)
                    .drop_column(Reviewed::ReviewedBy)
                    .to_owned(),
            )
            .await
    }
}
