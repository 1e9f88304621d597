//! Loan database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Book, Loan};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_name: String,
    #[sea_orm(unique)]
    pub isbn: String,
    pub borrowed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserName",
        to = "super::user::Column::UserName",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::Isbn",
        to = "super::book::Column::Isbn",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine with the borrowed book; a loaned book is never available.
    pub fn into_loan(self, book: Book) -> Loan {
        Loan {
            loan_id: self.id,
            user_name: self.user_name,
            book: Book {
                available: false,
                ..book
            },
            borrowed_at: self.borrowed_at,
        }
    }
}
