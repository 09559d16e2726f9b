//! API Request payloads
//!
//! HTTP 接口的请求体。字段命名保持线上格式 (camelCase / M-Pesa 原始字段名)。

use crate::models::{DeliveryAddress, OrderItem};
use crate::types::{PaymentMethod, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// POST /api/user/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested role; must match the stored role
    pub role: Role,
}

/// POST /api/user/register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Only an explicit "admin" grants the admin role
    #[serde(default)]
    pub role: Option<Role>,
}

/// POST /api/user/forgot-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/user/reset-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /api/cart/add and /api/cart/remove
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationRequest {
    pub item_id: String,
}

/// POST /api/order/place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub address: DeliveryAddress,
    pub items: Vec<OrderItem>,
    /// Cart subtotal + delivery fee, computed client-side and trusted
    pub amount: f64,
    pub payment_method: PaymentMethod,
    /// Client-declared initial payment flag (cash orders send true)
    #[serde(default)]
    pub payment: bool,
}

// =============================================================================
// M-Pesa STK callback body
// =============================================================================

/// POST /api/order/callback/{order_id} - gateway-invoked, unauthenticated.
///
/// The body shape is the M-Pesa wire format:
/// `{ Body: { stkCallback: { CheckoutRequestID, ResultCode, ResultDesc,
/// CallbackMetadata?: { Item: [{Name, Value}] } } } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackBody {
    #[serde(rename = "Body")]
    pub body: StkCallbackInner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackInner {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallback {
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// 0 indicates success, anything else a gateway-side failure
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
    #[serde(rename = "CallbackMetadata", default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub item: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    pub value: Option<serde_json::Value>,
}

impl CallbackMetadata {
    /// Flatten the {Name, Value} item list into a name -> value mapping.
    pub fn into_map(self) -> BTreeMap<String, serde_json::Value> {
        self.item
            .into_iter()
            .filter_map(|i| i.value.map(|v| (i.name, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_body_parses_wire_format() {
        let raw = r#"{
            "Body": {
                "stkCallback": {
                    "CheckoutRequestID": "ws_CO_1",
                    "ResultCode": 0,
                    "ResultDesc": "Success",
                    "CallbackMetadata": {
                        "Item": [
                            {"Name": "MpesaReceiptNumber", "Value": "R123"},
                            {"Name": "TransactionDate", "Value": 20260829121314},
                            {"Name": "PhoneNumber", "Value": "254712345678"},
                            {"Name": "Balance"}
                        ]
                    }
                }
            }
        }"#;
        let body: StkCallbackBody = serde_json::from_str(raw).unwrap();
        let cb = body.body.stk_callback;
        assert_eq!(cb.checkout_request_id, "ws_CO_1");
        assert_eq!(cb.result_code, 0);

        let map = cb.callback_metadata.unwrap().into_map();
        assert_eq!(map["MpesaReceiptNumber"], serde_json::json!("R123"));
        // Valueless items are dropped by the flattening
        assert!(!map.contains_key("Balance"));
    }

    #[test]
    fn callback_metadata_is_optional() {
        let raw = r#"{
            "Body": {
                "stkCallback": {
                    "CheckoutRequestID": "ws_CO_2",
                    "ResultCode": 1032,
                    "ResultDesc": "Request cancelled by user"
                }
            }
        }"#;
        let body: StkCallbackBody = serde_json::from_str(raw).unwrap();
        assert!(body.body.stk_callback.callback_metadata.is_none());
    }
}
