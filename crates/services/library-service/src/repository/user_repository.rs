//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use super::contains_ignore_case;
use super::entities::user::{self, Entity as UserEntity};
use common::AppResult;
use domain::{Page, SearchQuery, User, UserSort};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Search by user name, first name, last name or email (case-insensitive)
    async fn search(&self, query: &SearchQuery, sort: UserSort) -> AppResult<Page<User>>;

    /// Find user by user name
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(sort: UserSort) -> user::Column {
    match sort {
        UserSort::UserName => user::Column::UserName,
        UserSort::FirstName => user::Column::FirstName,
        UserSort::LastName => user::Column::LastName,
        UserSort::Email => user::Column::Email,
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn search(&self, query: &SearchQuery, sort: UserSort) -> AppResult<Page<User>> {
        let mut select = UserEntity::find();

        if let Some(filter) = query.search_filter() {
            select = select.filter(
                Condition::any()
                    .add(contains_ignore_case(user::Column::UserName, filter))
                    .add(contains_ignore_case(user::Column::FirstName, filter))
                    .add(contains_ignore_case(user::Column::LastName, filter))
                    .add(contains_ignore_case(user::Column::Email, filter)),
            );
        }

        let paginator = select
            .order_by_asc(sort_column(sort))
            .order_by_asc(user::Column::UserName)
            .paginate(&self.db, query.size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page).await?;

        Ok(Page::new(
            models.into_iter().map(User::from).collect(),
            query.page,
            query.size,
            total,
        ))
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(user_name.to_string())
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }
}
