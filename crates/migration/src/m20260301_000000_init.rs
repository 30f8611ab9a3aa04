//! Initial schema migration.
//!
//! - `users`: authentication and role (`user` / `admin`)
//! - `wallets`: one balance ledger per user
//! - `bank_accounts`: payout destinations owned by users
//! - `money_requests`: fund and transfer requests with their lifecycle

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    UserId,
    BalanceMinor,
    Currency,
    Status,
    UpdatedAt,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    AccountHolderName,
    AccountNumber,
    IfscCode,
    BankName,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum MoneyRequests {
    Table,
    Id,
    Kind,
    UserId,
    AmountMinor,
    FeeMinor,
    Description,
    Status,
    TransactionId,
    RejectionReason,
    Location,
    AccountId,
    AccountHolderName,
    AccountNumber,
    IfscCode,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Wallets::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Wallets::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Wallets::Currency).string().not_null())
                    .col(ColumnDef::new(Wallets::Status).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallets-user_id")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Bank accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccounts::UserId).string().not_null())
                    .col(
                        ColumnDef::new(BankAccounts::AccountHolderName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankAccounts::AccountNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankAccounts::IfscCode).string().not_null())
                    .col(ColumnDef::new(BankAccounts::BankName).string())
                    .col(
                        ColumnDef::new(BankAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_accounts-user_id")
                            .from(BankAccounts::Table, BankAccounts::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_accounts-user_id")
                    .table(BankAccounts::Table)
                    .col(BankAccounts::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Money requests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MoneyRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoneyRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MoneyRequests::Kind).string().not_null())
                    .col(ColumnDef::new(MoneyRequests::UserId).string().not_null())
                    .col(
                        ColumnDef::new(MoneyRequests::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MoneyRequests::FeeMinor).big_integer())
                    .col(
                        ColumnDef::new(MoneyRequests::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MoneyRequests::Status).string().not_null())
                    .col(ColumnDef::new(MoneyRequests::TransactionId).string())
                    .col(ColumnDef::new(MoneyRequests::RejectionReason).string())
                    .col(ColumnDef::new(MoneyRequests::Location).string())
                    .col(ColumnDef::new(MoneyRequests::AccountId).string())
                    .col(ColumnDef::new(MoneyRequests::AccountHolderName).string())
                    .col(ColumnDef::new(MoneyRequests::AccountNumber).string())
                    .col(ColumnDef::new(MoneyRequests::IfscCode).string())
                    .col(
                        ColumnDef::new(MoneyRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoneyRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-money_requests-user_id")
                            .from(MoneyRequests::Table, MoneyRequests::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-money_requests-kind_status_created")
                    .table(MoneyRequests::Table)
                    .col(MoneyRequests::Kind)
                    .col(MoneyRequests::Status)
                    .col(MoneyRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-money_requests-user_id")
                    .table(MoneyRequests::Table)
                    .col(MoneyRequests::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation (FK dependencies)
        manager
            .drop_table(Table::drop().table(MoneyRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
