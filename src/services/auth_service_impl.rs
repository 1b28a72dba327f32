//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let is_valid = self
            .store
            .verify_user_password(username, password)
            .await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn current_user(&self, id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }

    async fn owner(&self) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_admin().await?)
    }

    async fn rename(&self, id: i32, name: &str) -> Result<User, AuthError> {
        if !self.store.update_user_name(id, name).await? {
            return Err(AuthError::UserNotFound);
        }

        self.store.get_user(id).await?.ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;

    async fn service_with_admin() -> SeaOrmAuthService {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let config = SecurityConfig {
            argon2_memory_cost_kib: 64,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        store.upsert_admin("test", "123", &config).await.unwrap();
        SeaOrmAuthService::new(store)
    }

    #[tokio::test]
    async fn login_requires_matching_username_and_password() {
        let service = service_with_admin().await;

        let user = service.login("test", "123").await.unwrap();
        assert_eq!(user.username, "test");

        assert!(matches!(
            service.login("test", "456").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("wrong", "123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn rename_updates_owner() {
        let service = service_with_admin().await;
        let owner = service.owner().await.unwrap().unwrap();

        let renamed = service.rename(owner.id, "Grey Li").await.unwrap();
        assert_eq!(renamed.name, "Grey Li");
        assert_eq!(service.owner().await.unwrap().unwrap().name, "Grey Li");

        assert!(matches!(
            service.rename(owner.id + 1, "x").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(service.current_user(owner.id + 1).await.unwrap().is_none());
    }
}
