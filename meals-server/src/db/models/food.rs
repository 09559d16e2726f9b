//! Food Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::FoodItem;
use shared::types::FoodCategory;
use surrealdb::RecordId;

/// Catalog entry as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: FoodCategory,
    pub image: String,
}

/// Create food payload (seeding and tests; catalog CRUD has no HTTP surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: FoodCategory,
    pub image: String,
}

impl Food {
    pub fn into_dto(self) -> FoodItem {
        FoodItem {
            id: self.id.map(|id| id.to_string()).unwrap_or_default(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
        }
    }
}
