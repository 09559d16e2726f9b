//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。
//!
//! 两种令牌类型：
//! - `access`: 登录/注册后签发，随请求携带
//! - `reset`: 忘记密码流程签发，固定 1 小时有效期

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::Role;
use thiserror::Error;

/// 请求携带令牌的自定义头 (非标准 Bearer 方案)
pub const TOKEN_HEADER: &str = "token";

/// 密码重置令牌有效期 (分钟)
pub const RESET_TOKEN_MINUTES: i64 = 60;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 访问令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET is shorter than 32 bytes, using dev fallback");
                    dev_fallback_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET must be at least 32 characters long");
                }
            }
            Err(_) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET not set, using dev fallback key");
                    dev_fallback_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET environment variable must be set in production");
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "meals-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "meals-clients".to_string()),
        }
    }
}

#[cfg(debug_assertions)]
fn dev_fallback_secret() -> String {
    "SwiftMealsDevelopmentOnlyJwtSecretKey2026!".to_string()
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject, "user:key" 形式)
    pub sub: String,
    /// 角色名称
    pub role: String,
    /// 令牌类型 (access | reset)
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wrong token type: expected {expected}, got {got}")]
    WrongTokenType { expected: String, got: String },

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成访问令牌
    pub fn generate_token(&self, user_id: &str, role: Role) -> Result<String, JwtError> {
        self.generate(user_id, role, "access", self.config.expiration_minutes)
    }

    /// 生成密码重置令牌 (1 小时有效期)
    pub fn generate_reset_token(&self, user_id: &str, role: Role) -> Result<String, JwtError> {
        self.generate(user_id, role, "reset", RESET_TOKEN_MINUTES)
    }

    fn generate(
        &self,
        user_id: &str,
        role: Role,
        token_type: &str,
        minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 验证密码重置令牌，返回用户 ID
    pub fn validate_reset_token(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != "reset" {
            return Err(JwtError::WrongTokenType {
                expected: "reset".to_string(),
                got: claims.token_type,
            });
        }
        Ok(claims.sub)
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由提取器创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:key" 形式)
    pub id: String,
    /// 角色
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = shared::types::UnknownRole;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.sub,
            role: claims.role.parse()?,
        })
    }
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            expiration_minutes: 60,
            issuer: "meals-server".to_string(),
            audience: "meals-clients".to_string(),
        })
    }

    #[test]
    fn generate_and_validate_round_trip() {
        let svc = test_service();
        let token = svc.generate_token("user:abc", Role::User).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn tampered_token_rejected() {
        let svc = test_service();
        let mut token = svc.generate_token("user:abc", Role::Admin).unwrap();
        token.push('x');
        assert!(svc.validate_token(&token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let svc = test_service();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-long-enough".to_string(),
            ..svc.config.clone()
        });
        let token = svc.generate_token("user:abc", Role::User).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn access_token_is_not_a_reset_token() {
        let svc = test_service();
        let token = svc.generate_token("user:abc", Role::User).unwrap();
        assert!(matches!(
            svc.validate_reset_token(&token),
            Err(JwtError::WrongTokenType { .. })
        ));

        let reset = svc.generate_reset_token("user:abc", Role::User).unwrap();
        assert_eq!(svc.validate_reset_token(&reset).unwrap(), "user:abc");
    }
}
