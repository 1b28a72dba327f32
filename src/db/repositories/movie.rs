use crate::entities::{movies, prelude::*};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use tracing::info;

/// Repository for catalog operations
pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: movies::Model) -> Movie {
        Movie {
            id: m.id,
            title: m.title,
            year: m.year,
        }
    }

    /// All movies in insertion order
    pub async fn list(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Movies::find().count(&self.conn).await?)
    }

    pub async fn add(&self, title: &str, year: &str) -> Result<Movie> {
        let model = movies::ActiveModel {
            title: Set(title.to_string()),
            year: Set(year.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Added movie {}: {} ({})", model.id, model.title, model.year);
        Ok(Self::map_model(model))
    }

    /// Replaces title and year. Returns `None` when the id is unknown.
    pub async fn update(&self, id: i32, title: &str, year: &str) -> Result<Option<Movie>> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = existing.into();
        active.title = Set(title.to_string());
        active.year = Set(year.to_string());
        let model = active.update(&self.conn).await?;

        info!("Updated movie {id}");
        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie with ID: {}", id);
        }
        Ok(removed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    async fn repo() -> MovieRepository {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        MovieRepository::new(store.conn)
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let repo = repo().await;
        repo.add("Leon", "1994").await.unwrap();
        repo.add("Mahjong", "1996").await.unwrap();
        repo.add("A Perfect World", "1993").await.unwrap();

        let titles: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Leon", "Mahjong", "A Perfect World"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_replaces_both_fields() {
        let repo = repo().await;
        let movie = repo.add("Test Title", "2020").await.unwrap();

        let updated = repo
            .update(movie.id, "New Movie Edit", "2021")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "New Movie Edit");
        assert_eq!(updated.year, "2021");
        assert_eq!(repo.get(movie.id).await.unwrap(), Some(updated));

        assert!(repo.update(movie.id + 100, "x", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_was_deleted() {
        let repo = repo().await;
        let movie = repo.add("WALL-E", "2008").await.unwrap();

        assert!(repo.remove(movie.id).await.unwrap());
        assert!(!repo.remove(movie.id).await.unwrap());
        assert!(repo.get(movie.id).await.unwrap().is_none());
    }
}
