//! Book database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Book;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::loan::Entity")]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity; availability is not stored on the row.
    pub fn into_book(self, available: bool) -> Book {
        Book {
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            published_year: self.published_year,
            available,
        }
    }
}
