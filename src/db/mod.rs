use crate::config::{Config, SecurityConfig};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryOrder, Set, Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{movies, prelude::*, users};

pub mod migrator;
pub mod repositories;

pub use repositories::movie::Movie;
pub use repositories::user::{AdminUpsert, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await
    }

    /// Connects and brings the schema up to date.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let store = Self::connect(db_url, max_connections, min_connections).await?;
        store.initialize(false).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(store)
    }

    /// Connects without touching the schema.
    pub async fn connect(db_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Ok(Self { conn })
    }

    /// Applies pending migrations. With `drop`, every table is dropped first.
    pub async fn initialize(&self, drop: bool) -> Result<()> {
        if drop {
            migrator::Migrator::fresh(&self.conn).await?;
            info!("Dropped and recreated all tables");
        } else {
            migrator::Migrator::up(&self.conn, None).await?;
        }
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list().await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    pub async fn add_movie(&self, title: &str, year: &str) -> Result<Movie> {
        self.movie_repo().add(title, year).await
    }

    pub async fn update_movie(&self, id: i32, title: &str, year: &str) -> Result<Option<Movie>> {
        self.movie_repo().update(id, title, year).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    pub async fn find_admin(&self) -> Result<Option<User>> {
        self.user_repo().find_admin().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_name(&self, id: i32, name: &str) -> Result<bool> {
        self.user_repo().update_name(id, name).await
    }

    pub async fn upsert_admin(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<AdminUpsert> {
        self.user_repo()
            .upsert_admin(username, password, Some(config))
            .await
    }

    /// Inserts demo data in one transaction: the administrator (only when
    /// none exists yet) and every `(title, year)` in `titles`. Returns the number of
    /// movies inserted.
    pub async fn seed_demo(
        &self,
        admin: &DemoAdmin<'_>,
        titles: &[(&str, &str)],
        config: &SecurityConfig,
    ) -> Result<usize> {
        let password_hash =
            repositories::user::hash_password_blocking(admin.password, Some(config)).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.conn.begin().await?;

        let existing = Users::find()
            .order_by_asc(users::Column::Id)
            .one(&txn)
            .await?;
        if existing.is_none() {
            users::ActiveModel {
                name: Set(admin.name.to_string()),
                username: Set(admin.username.to_string()),
                password_hash: Set(password_hash),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            info!("Created demo administrator {}", admin.username);
        }

        for (title, year) in titles {
            movies::ActiveModel {
                title: Set((*title).to_string()),
                year: Set((*year).to_string()),
                created_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!("Seeded {} demo movies", titles.len());
        Ok(titles.len())
    }
}

/// Credentials for the administrator created by [`Store::seed_demo`].
#[derive(Debug, Clone, Copy)]
pub struct DemoAdmin<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}
