//! 认证授权模块
//!
//! 提供 JWT 认证：
//! - [`JwtService`] - JWT 令牌服务 (访问令牌 + 密码重置令牌)
//! - [`CurrentUser`] - 当前用户上下文 (从自定义 `token` 请求头提取)

pub mod extractor;
pub mod jwt;

pub use jwt::{
    Claims, CurrentUser, JwtConfig, JwtError, JwtService, RESET_TOKEN_MINUTES, TOKEN_HEADER,
};
