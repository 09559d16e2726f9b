//! Cart API Handlers
//!
//! 每个操作都是用户文档上的字段级原子更新;目录不参与校验,
//! 购物车里允许挂着已下架菜品的数量。

use axum::{Json, extract::State};
use shared::request::CartMutationRequest;
use shared::response::{CartResponse, StatusResponse};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

/// POST /api/cart/add - 数量 +1
pub async fn add(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(req): Json<CartMutationRequest>,
) -> AppResult<Json<StatusResponse>> {
    let repo = UserRepository::new(state.db.clone());
    repo.add_cart_item(&user.id, &req.item_id).await?;
    Ok(Json(StatusResponse::ok("Added to cart")))
}

/// POST /api/cart/remove - 数量 -1,归零删除,不存在为 no-op
pub async fn remove(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(req): Json<CartMutationRequest>,
) -> AppResult<Json<StatusResponse>> {
    let repo = UserRepository::new(state.db.clone());
    repo.remove_cart_item(&user.id, &req.item_id).await?;
    Ok(Json(StatusResponse::ok("Removed from cart")))
}

/// GET /api/cart/get - 完整映射
pub async fn get_cart(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<CartResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let cart = repo.get_cart(&user.id).await?;
    Ok(Json(CartResponse::ok(cart)))
}

/// POST /api/cart/clear - 清空
pub async fn clear(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<StatusResponse>> {
    let repo = UserRepository::new(state.db.clone());
    repo.clear_cart(&user.id).await?;
    Ok(Json(StatusResponse::ok("Cart cleared")))
}
