//! Order DTO
//!
//! 订单文档：下单时的菜品快照 + 配送地址 + 支付状态 + 网关关联子记录。

use crate::types::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Structured delivery address embedded in every order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub apartment_hostel: String,
    pub location: String,
    pub floor_number: String,
    pub room_number: String,
    /// Must be 2547XXXXXXXX for M-Pesa orders
    pub phone: String,
}

/// Item snapshot entry captured at order time. NOT a live catalog reference:
/// the priced quantity survives later catalog edits and deletions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Gateway correlation sub-record.
///
/// Field names follow the M-Pesa callback wire format verbatim.
/// `checkout_request_id` is nullable until the gateway answers the
/// initiation call; once set it is the sole correlation key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MpesaRecord {
    #[serde(rename = "CheckoutRequestID", skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,
    #[serde(rename = "MpesaReceiptNumber", skip_serializing_if = "Option::is_none")]
    pub mpesa_receipt_number: Option<String>,
    #[serde(rename = "TransactionDate", skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<i64>,
    #[serde(rename = "PhoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "ResultCode", skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i64>,
    #[serde(rename = "ResultDesc", skip_serializing_if = "Option::is_none")]
    pub result_desc: Option<String>,
}

/// Persisted order, one document per checkout attempt.
///
/// Invariant: cash orders are born with `payment: true`; mpesa orders start
/// `payment: false` and flip only through the callback path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    /// Items total + fixed delivery fee, as submitted by the client
    pub amount: f64,
    pub address: DeliveryAddress,
    pub payment: bool,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub mpesa: MpesaRecord,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}
