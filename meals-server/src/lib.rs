//! SwiftMeals Server - 外卖订餐平台后端
//!
//! # 架构概述
//!
//! 基于文档数据库的轻量 REST 后端，提供以下核心功能：
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系 (自定义 `token` 请求头)
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (用户/菜品/订单)
//! - **支付网关** (`payments`): M-Pesa STK 推送支付适配器
//! - **下单编排** (`checkout`): 订单创建 + 异步回调对账状态机
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! meals-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── payments/      # 支付网关适配器
//! ├── checkout/      # 订单/支付编排
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 邮件服务
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payments;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use payments::{PaymentGateway, StkInitiation};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}

pub fn print_banner() {
    println!(
        r#"
   _____         _ ______
  / ___/      __(_) __/ /_
  \__ \ | /| / / / /_/ __/
 ___/ / |/ |/ / / __/ /_
/____/|__/|__/_/_/  \__/
    __  ___           __
   /  |/  /__  ____ _/ /____
  / /|_/ / _ \/ __ `/ / ___/
 / /  / /  __/ /_/ / (__  )
/_/  /_/\___/\__,_/_/____/
    "#
    );
}
