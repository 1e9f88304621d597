//! Migration: Create users, books and loans tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserName)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Isbn)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::Publisher).string().null())
                    .col(ColumnDef::new(Books::PublishedYear).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Loans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Loans::UserName).string_len(64).not_null())
                    .col(ColumnDef::new(Loans::Isbn).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Loans::BorrowedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loans_user_name")
                            .from(Loans::Table, Loans::UserName)
                            .to(Users::Table, Users::UserName)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loans_isbn")
                            .from(Loans::Table, Loans::Isbn)
                            .to(Books::Table, Books::Isbn)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A book can be on loan at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_loans_isbn_unique")
                    .table(Loans::Table)
                    .col(Loans::Isbn)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loans_user_name")
                    .table(Loans::Table)
                    .col(Loans::UserName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    UserName,
    FirstName,
    LastName,
    Email,
}

#[derive(Iden)]
pub(super) enum Books {
    Table,
    Isbn,
    Title,
    Author,
    Publisher,
    PublishedYear,
}

#[derive(Iden)]
pub(super) enum Loans {
    Table,
    Id,
    UserName,
    Isbn,
    BorrowedAt,
}
