use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::payments::{MpesaGateway, PaymentGateway, UnconfiguredGateway};
use crate::services::Mailer;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求 handler 得到一份廉价克隆。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | gateway | Arc<dyn PaymentGateway> | 支付网关 (生产: Daraja) |
/// | mailer | Option<Arc<Mailer>> | SMTP 邮件服务 (可选) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 支付网关
    pub gateway: Arc<dyn PaymentGateway>,
    /// 邮件服务,未配置 SMTP 时为 None
    pub mailer: Option<Arc<Mailer>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：数据库 → JWT → 支付网关 → 邮件服务。
    /// Daraja/SMTP 凭证缺失时相应能力降级,服务器照常启动。
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::open(&config.db_path).await?.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let gateway: Arc<dyn PaymentGateway> = match &config.mpesa {
            Some(mpesa) => Arc::new(MpesaGateway::new(mpesa.clone())),
            None => {
                tracing::warn!("MPESA_* not configured, mobile money disabled");
                Arc::new(UnconfiguredGateway)
            }
        };

        let mailer = match &config.mail {
            Some(mail) => match Mailer::new(mail) {
                Ok(m) => Some(Arc::new(m)),
                Err(e) => {
                    tracing::warn!(error = %e, "SMTP transport unavailable, reset emails disabled");
                    None
                }
            },
            None => {
                tracing::warn!("SMTP_* not configured, reset emails disabled");
                None
            }
        };

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            gateway,
            mailer,
        })
    }

    /// 手动构造 (测试场景: 内存数据库 + 桩网关)
    pub fn with_parts(config: Config, db: Surreal<Db>, gateway: Arc<dyn PaymentGateway>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
            gateway,
            mailer: None,
        }
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 结账编排器 (按请求构造,无内部状态)
    pub fn checkout_service(&self) -> CheckoutService {
        CheckoutService::new(OrderRepository::new(self.db.clone()), self.gateway.clone())
    }
}
