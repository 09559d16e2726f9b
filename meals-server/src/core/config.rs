use crate::auth::JwtConfig;
use crate::payments::MpesaConfig;
use crate::services::MailConfig;

/// 服务器配置 - 点餐后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 4000 | HTTP 服务端口 |
/// | DB_PATH | data/swiftmeals.db | 嵌入式数据库路径 |
/// | ENVIRONMENT | development | 运行环境 |
/// | FRONTEND_URL | http://localhost:5173 | 前端地址 (重置密码链接) |
/// | MPESA_* | - | Daraja 凭证,缺失时只支持现金下单 |
/// | SMTP_* | - | 邮件凭证,缺失时跳过重置邮件发送 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DB_PATH=/data/meals.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 嵌入式数据库文件路径
    pub db_path: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 前端地址,用于拼接重置密码链接
    pub frontend_url: String,
    /// Daraja 网关凭证 (可选)
    pub mpesa: Option<MpesaConfig>,
    /// SMTP 邮件凭证 (可选)
    pub mail: Option<MailConfig>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "data/swiftmeals.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            mpesa: MpesaConfig::from_env(),
            mail: MailConfig::from_env(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
