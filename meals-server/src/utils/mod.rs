//! 工具模块 - 错误、日志、校验

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::AppError;
pub use result::AppResult;
pub use validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, is_valid_mpesa_phone,
    validate_email, validate_mpesa_phone, validate_password,
};
