//! Order Model
//!
//! 每次下单尝试恰好一个订单文档。字段名保持线上 camelCase 形式，
//! M-Pesa 子记录沿用网关回调的原始字段名。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{DeliveryAddress, MpesaRecord, OrderItem};
use shared::types::PaymentMethod;
use surrealdb::RecordId;

/// Persisted order document.
///
/// The `mpesa` sub-record and `payment` flag are written only by the
/// checkout orchestrator after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user, "user:key" string form
    pub user_id: String,
    /// Item snapshot captured at order time, not a live catalog reference
    pub items: Vec<OrderItem>,
    pub amount: f64,
    pub address: DeliveryAddress,
    pub payment: bool,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub mpesa: MpesaRecord,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub amount: f64,
    pub address: DeliveryAddress,
    pub payment: bool,
    pub payment_method: PaymentMethod,
    pub mpesa: MpesaRecord,
    pub created_at: String,
}

impl Order {
    pub fn into_dto(self) -> shared::models::Order {
        shared::models::Order {
            id: self.id.map(|id| id.to_string()).unwrap_or_default(),
            user_id: self.user_id,
            items: self.items,
            amount: self.amount,
            address: self.address,
            payment: self.payment,
            payment_method: self.payment_method,
            mpesa: self.mpesa,
            created_at: self.created_at,
        }
    }
}
