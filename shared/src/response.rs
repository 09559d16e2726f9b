//! API Response payloads
//!
//! 本 API 的统一响应形态是 success 标志 + 消息体：大多数失败以
//! `{success: false, message}` 返回 (HTTP 200)，而不是传输层错误码。

use crate::models::{CartData, FoodItem, Order};
use crate::types::Role;
use serde::{Deserialize, Serialize};

/// `{success, message}` - the envelope most mutation endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Login / register response: `{success, token, role}` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn ok(token: String, role: Role) -> Self {
        Self {
            success: true,
            token: Some(token),
            role: Some(role),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            token: None,
            role: None,
            message: Some(message.into()),
        }
    }
}

/// GET /api/cart/get response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    #[serde(default)]
    pub cart_data: CartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CartResponse {
    pub fn ok(cart_data: CartData) -> Self {
        Self {
            success: true,
            cart_data,
            message: None,
        }
    }
}

/// GET /api/food/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodListResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<FoodItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/order/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/order/place response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(rename = "checkoutRequestID", skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,
}

/// Acknowledgement returned to the gateway on the callback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackAck {
    pub message: String,
}
