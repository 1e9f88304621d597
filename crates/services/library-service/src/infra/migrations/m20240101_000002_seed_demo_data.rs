//! Migration: Seed demo users and books.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_library_tables::{Books, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (user_name, first_name, last_name, email)
const DEMO_USERS: &[(&str, &str, &str, &str)] = &[
    ("demo_user_1", "Alice", "Miller", "alice.miller@example.com"),
    ("demo_user_2", "Bob", "Schmidt", "bob.schmidt@example.com"),
    ("demo_user_3", "Carol", "Jones", "carol.jones@example.com"),
    ("librarian", "Linda", "Larsen", "librarian@example.com"),
];

/// (isbn, title, author, publisher, published_year)
const DEMO_BOOKS: &[(&str, &str, &str, &str, i32)] = &[
    ("978-0743273565", "The Great Gatsby", "F. Scott Fitzgerald", "Scribner", 1925),
    ("978-0451524935", "1984", "George Orwell", "Signet Classics", 1949),
    ("978-0061120084", "To Kill a Mockingbird", "Harper Lee", "Harper Perennial", 1960),
    ("978-0141439518", "Pride and Prejudice", "Jane Austen", "Penguin Classics", 1813),
    ("978-0316769488", "The Catcher in the Rye", "J. D. Salinger", "Little, Brown", 1951),
    ("978-0547928227", "The Hobbit", "J. R. R. Tolkien", "Mariner Books", 1937),
    ("978-0060850524", "Brave New World", "Aldous Huxley", "Harper Perennial", 1932),
    ("978-1593279288", "The Rust Programming Language", "Steve Klabnik, Carol Nichols", "No Starch Press", 2019),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut users = Query::insert();
        users.into_table(Users::Table).columns([
            Users::UserName,
            Users::FirstName,
            Users::LastName,
            Users::Email,
        ]);
        for (user_name, first_name, last_name, email) in DEMO_USERS {
            users
                .values([
                    (*user_name).into(),
                    (*first_name).into(),
                    (*last_name).into(),
                    (*email).into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        manager.exec_stmt(users.to_owned()).await?;

        let mut books = Query::insert();
        books.into_table(Books::Table).columns([
            Books::Isbn,
            Books::Title,
            Books::Author,
            Books::Publisher,
            Books::PublishedYear,
        ]);
        for (isbn, title, author, publisher, year) in DEMO_BOOKS {
            books
                .values([
                    (*isbn).into(),
                    (*title).into(),
                    (*author).into(),
                    (*publisher).into(),
                    (*year).into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        manager.exec_stmt(books.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let isbns: Vec<&str> = DEMO_BOOKS.iter().map(|book| book.0).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Books::Table)
                    .and_where(Expr::col(Books::Isbn).is_in(isbns))
                    .to_owned(),
            )
            .await?;

        let user_names: Vec<&str> = DEMO_USERS.iter().map(|user| user.0).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users::Table)
                    .and_where(Expr::col(Users::UserName).is_in(user_names))
                    .to_owned(),
            )
            .await
    }
}
