//! Food Item DTO

use crate::types::FoodCategory;
use serde::{Deserialize, Serialize};

/// Catalog food item. Created by admin actions, otherwise immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price in whole currency units (KSh)
    pub price: f64,
    pub category: FoodCategory,
    /// Stored image reference (filename or URL)
    pub image: String,
}
