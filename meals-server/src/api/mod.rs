//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 注册/登录/密码重置
//! - [`cart`] - 购物车操作
//! - [`food`] - 菜品目录
//! - [`orders`] - 下单、网关回调、订单列表
//!
//! 软失败策略:业务失败 (校验、未找到、凭证错误) 以
//! `{success: false, message}` + HTTP 200 返回;网关发起失败和
//! 内部错误返回常规 HTTP 错误码。

pub mod cart;
pub mod food;
pub mod health;
pub mod orders;
pub mod users;

use axum::Router;

use crate::core::ServerState;

/// Compose every resource router into the service surface.
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(cart::router())
        .merge(food::router())
        .merge(orders::router())
}
