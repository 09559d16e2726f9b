//! Cart API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/cart/add | POST | 数量 +1 (不存在则创建) | token |
//! | /api/cart/remove | POST | 数量 -1 (归零删除) | token |
//! | /api/cart/get | GET | 完整购物车映射 | token |
//! | /api/cart/clear | POST | 清空购物车 | token |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/add", post(handler::add))
        .route("/remove", post(handler::remove))
        .route("/get", get(handler::get_cart))
        .route("/clear", post(handler::clear))
}
