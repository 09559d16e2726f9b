//! Food Repository
//!
//! 菜品目录。目录由管理工具维护，服务端只读列出。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Food, FoodCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const FOOD_TABLE: &str = "food";

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: FoodCreate) -> RepoResult<Food> {
        let created: Option<Food> = self.base.db().create(FOOD_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Create returned no record".to_string()))
    }

    /// The full catalog, ordered by name for a stable listing.
    pub async fn find_all(&self) -> RepoResult<Vec<Food>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM food ORDER BY name")
            .await?;
        let foods: Vec<Food> = result.take(0)?;
        Ok(foods)
    }
}
