//! User API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/user/register | POST | 注册并签发 token | 无 |
//! | /api/user/login | POST | 登录并签发 token | 无 |
//! | /api/user/forgot-password | POST | 发送重置链接 | 无 |
//! | /api/user/reset-password | POST | 凭 token 重置密码 | 无 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/user", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/forgot-password", post(handler::forgot_password))
        .route("/reset-password", post(handler::reset_password))
}
