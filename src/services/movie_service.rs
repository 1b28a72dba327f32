//! Domain service for the movie catalog.
//!
//! Callers validate form input before reaching this layer; the service
//! resolves ids and maps storage failures to [`MovieError`].

use thiserror::Error;

use crate::db::Movie;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// All movies, oldest first.
    async fn list(&self) -> Result<Vec<Movie>, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the id is unknown.
    async fn get(&self, id: i32) -> Result<Movie, MovieError>;

    async fn create(&self, title: &str, year: &str) -> Result<Movie, MovieError>;

    /// Replaces title and year of an existing movie.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the id is unknown.
    async fn update(&self, id: i32, title: &str, year: &str) -> Result<Movie, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the id is unknown.
    async fn delete(&self, id: i32) -> Result<(), MovieError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_error_display() {
        assert_eq!(MovieError::NotFound(42).to_string(), "Movie not found: 42");

        let err: MovieError = sea_orm::DbErr::Custom("locked".to_string()).into();
        assert!(matches!(err, MovieError::Database(_)));
    }
}
