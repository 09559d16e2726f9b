//! SwiftMeals Shared - 前后端共享类型
//!
//! 服务端 (`meals-server`) 和客户端 (`meals-client`) 共用的线上数据类型：
//!
//! - **基础类型** (`types`): 角色、支付方式、菜品分类枚举
//! - **数据模型** (`models`): 菜品、购物车、订单 DTO
//! - **请求/响应** (`request` / `response`): HTTP API 载荷

pub mod models;
pub mod request;
pub mod response;
pub mod types;

// Re-export 公共类型
pub use models::{CartData, DeliveryAddress, FoodItem, MpesaRecord, Order, OrderItem};
pub use request::{
    CartMutationRequest, ForgotPasswordRequest, LoginRequest, PlaceOrderRequest, RegisterRequest,
    ResetPasswordRequest, StkCallback, StkCallbackBody,
};
pub use response::{
    AuthResponse, CallbackAck, CartResponse, FoodListResponse, OrderListResponse,
    PlaceOrderResponse, StatusResponse,
};
pub use types::{FoodCategory, PaymentMethod, Role};
