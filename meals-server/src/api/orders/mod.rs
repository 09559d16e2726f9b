//! Order API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/order/place | POST | 下单 (+STK 推送) | token |
//! | /api/order/callback/{order_id} | POST | 网关异步回调 | 无 |
//! | /api/order/list | GET | 订单列表 (admin 看全部) | token |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/place", post(handler::place))
        .route("/callback/{order_id}", post(handler::callback))
        .route("/list", get(handler::list))
}
