//! 统一错误处理
//!
//! 提供应用级错误类型 [`AppError`]。
//!
//! # 响应策略
//!
//! 本 API 的前端约定是 success 标志 + 消息体，而不是传输层错误码：
//!
//! | 错误 | HTTP 状态码 | 响应体 |
//! |------|------------|--------|
//! | 未登录 / 无效令牌 | 200 | `{success: false, message}` |
//! | 资源不存在 | 200 | `{success: false, message}` |
//! | 验证失败 | 200 | `{success: false, message}` |
//! | 无权限 | 403 | `{success: false, message}` |
//! | 网关失败 | 500 | `{success: false, message}` |
//! | 数据库 / 内部错误 | 500 | `{success: false, message}` |
//!
//! 例外：支付回调接口自行返回常规 HTTP 状态码 (见 `api::orders`)。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::StatusResponse;
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 ==========
    #[error("No token provided")]
    /// 未携带令牌
    Unauthorized,

    #[error("Invalid token")]
    /// 无效或过期令牌
    InvalidToken,

    #[error("Access denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    // ========== 业务逻辑错误 ==========
    #[error("{0}")]
    /// 资源不存在
    NotFound(String),

    #[error("{0}")]
    /// 验证失败
    Validation(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Payment gateway error: {0}")]
    /// 支付网关失败 (500)
    Gateway(String),

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Validation(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Soft failures: the client reads the success flag, not the status
            AppError::Unauthorized => (StatusCode::OK, self.to_string()),
            AppError::InvalidToken => (StatusCode::OK, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::OK, msg.clone()),
            AppError::Validation(msg) => (StatusCode::OK, msg.clone()),

            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, format!("Access denied: {msg}")),

            AppError::Gateway(msg) => {
                error!(target: "gateway", error = %msg, "Payment gateway failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error initiating payment: {msg}"),
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(StatusResponse::failure(message))).into_response()
    }
}
