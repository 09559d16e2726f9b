//! Food API Handlers

use axum::{Json, extract::State};
use shared::response::FoodListResponse;

use crate::core::ServerState;
use crate::db::repository::FoodRepository;
use crate::utils::AppResult;

/// GET /api/food/list - 完整菜品目录
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<FoodListResponse>> {
    let repo = FoodRepository::new(state.db.clone());
    let foods = repo.find_all().await?;
    Ok(Json(FoodListResponse {
        success: true,
        data: foods.into_iter().map(|f| f.into_dto()).collect(),
        message: None,
    }))
}
