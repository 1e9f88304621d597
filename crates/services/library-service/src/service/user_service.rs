//! User service - member search and lookup.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{Page, SearchQuery, User, UserSort};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Search users; `query.sort` must be a user sort key
    async fn search_users(&self, query: SearchQuery) -> AppResult<Page<User>>;

    /// Get user by user name
    async fn get_user(&self, user_name: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn search_users(&self, query: SearchQuery) -> AppResult<Page<User>> {
        let sort: UserSort = query.sort.parse()?;
        self.repo.search(&query, sort).await
    }

    async fn get_user(&self, user_name: &str) -> AppResult<User> {
        self.repo.find_by_user_name(user_name).await?.ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use common::AppError;

    fn test_user(user_name: &str) -> User {
        User {
            user_name: user_name.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Miller".to_string(),
            email: "alice.miller@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_user_name()
            .withf(|name| name == "demo_user_1")
            .returning(|name| Ok(Some(test_user(name))));

        let service = UserManager::new(Arc::new(repo));
        let user = service.get_user("demo_user_1").await.unwrap();

        assert_eq!(user.user_name, "demo_user_1");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_user_name().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user("nobody").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_users_uses_user_sort_keys() {
        let mut repo = MockUserRepository::new();
        repo.expect_search()
            .withf(|_, sort| *sort == UserSort::LastName)
            .returning(|query, _| {
                Ok(Page::new(
                    vec![test_user("demo_user_1"), test_user("demo_user_2")],
                    query.page,
                    query.size,
                    2,
                ))
            });

        let service = UserManager::new(Arc::new(repo));
        let query = SearchQuery::new(Some("mil".to_string()), 0, 10, "lastName").unwrap();
        let page = service.search_users(query).await.unwrap();

        assert_eq!(page.total_elements, 2);
        assert!("title".parse::<UserSort>().is_err());
    }
}
