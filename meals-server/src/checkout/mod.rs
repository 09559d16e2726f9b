//! Checkout Orchestrator
//!
//! 下单、发起支付、回调对账的编排层。订单创建后,
//! `payment` 与 `mpesa` 子记录只允许本模块写入。
//!
//! # 支付子状态机
//!
//! | 状态 | 含义 | 迁移 |
//! |------|------|------|
//! | PENDING | mpesa 订单初始态 | 回调 ResultCode=0 → CONFIRMED |
//! | CONFIRMED | 已支付 (cash 订单创建即此态) | 终态 |
//! | FAILED | 网关拒绝/用户取消 | 终态 |
//!
//! 网关发起失败不回滚订单文档:订单保持未支付、未关联状态,
//! 错误作为下单失败传给调用方。

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use shared::request::{PlaceOrderRequest, StkCallback};
use shared::response::PlaceOrderResponse;

use crate::auth::CurrentUser;
use crate::db::models::OrderCreate;
use crate::db::repository::OrderRepository;
use crate::payments::PaymentGateway;
use crate::utils::{AppError, AppResult, validate_mpesa_phone};
use shared::models::MpesaRecord;
use shared::types::PaymentMethod;

pub struct CheckoutService {
    orders: OrderRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutService {
    pub fn new(orders: OrderRepository, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { orders, gateway }
    }

    /// Create an order and, for mobile-money, push the payment prompt.
    ///
    /// The payment flag is decided here, not taken from the request: cash
    /// orders are paid at the door, mobile-money orders start unpaid and
    /// are confirmed only by the gateway callback. The amount is the
    /// client-computed total and is stored as given.
    pub async fn place_order(
        &self,
        user: &CurrentUser,
        req: PlaceOrderRequest,
    ) -> AppResult<PlaceOrderResponse> {
        if req.items.is_empty() {
            return Err(AppError::validation("Cannot place an empty order"));
        }
        if req.amount <= 0.0 {
            return Err(AppError::validation("Invalid order amount"));
        }
        if req.payment_method == PaymentMethod::Mpesa {
            validate_mpesa_phone(&req.address.phone)?;
        }

        let order = self
            .orders
            .create(OrderCreate {
                user_id: user.id.clone(),
                items: req.items,
                amount: req.amount,
                address: req.address.clone(),
                payment: req.payment_method == PaymentMethod::Cash,
                payment_method: req.payment_method,
                mpesa: MpesaRecord::default(),
                created_at: Utc::now().to_rfc3339(),
            })
            .await?;
        let order_id = order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("Order created without id"))?;

        if req.payment_method == PaymentMethod::Cash {
            tracing::info!(order_id, user = user.id, "Cash order placed");
            return Ok(PlaceOrderResponse {
                success: true,
                message: "Order placed successfully".to_string(),
                order_id: Some(order_id),
                checkout_request_id: None,
            });
        }

        // Gateway failures are surfaced without deleting the order: it
        // stays persisted unpaid and uncorrelated, and no callback will
        // ever reference it.
        let initiation = self
            .gateway
            .initiate_stk_push(&order_id, &req.address.phone, req.amount.round() as u64)
            .await
            .map_err(|e| {
                tracing::warn!(order_id, error = %e, "STK initiation failed");
                AppError::gateway(e.to_string())
            })?;

        // Second write: the correlation id is the sole key the callback
        // carries, so losing this write orphans the payment (see the
        // reconciliation note in the module docs).
        let order = self
            .orders
            .set_checkout_request_id(&order_id, &initiation.checkout_request_id)
            .await?;

        tracing::info!(
            order_id,
            checkout_request_id = initiation.checkout_request_id,
            "Mpesa order placed, awaiting callback"
        );

        Ok(PlaceOrderResponse {
            success: true,
            message: "STK push sent, complete payment on your phone".to_string(),
            order_id: Some(order.id.map(|id| id.to_string()).unwrap_or(order_id)),
            checkout_request_id: Some(initiation.checkout_request_id),
        })
    }

    /// Reconcile an inbound gateway callback against its order.
    ///
    /// Correlation is by `CheckoutRequestID` alone; the order id in the
    /// callback URL is logged but not trusted. Re-delivered callbacks
    /// re-apply the same field values, there is no dedup.
    pub async fn apply_callback(&self, url_order_id: &str, cb: StkCallback) -> AppResult<()> {
        let order = self
            .orders
            .find_by_checkout_request_id(&cb.checkout_request_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    url_order_id,
                    checkout_request_id = cb.checkout_request_id,
                    "Callback for unknown correlation id"
                );
                AppError::not_found("Order not found for callback")
            })?;
        let order_id = order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("Order loaded without id"))?;

        if cb.result_code == 0 {
            let meta = cb
                .callback_metadata
                .map(|m| m.into_map())
                .unwrap_or_default();
            let receipt = meta
                .get("MpesaReceiptNumber")
                .and_then(|v| v.as_str())
                .map(String::from);
            let transaction_date = meta.get("TransactionDate").and_then(|v| v.as_i64());
            let phone = meta.get("PhoneNumber").map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            });

            self.orders
                .mark_paid(
                    &order_id,
                    &cb.checkout_request_id,
                    receipt,
                    transaction_date,
                    phone,
                )
                .await?;
            tracing::info!(order_id, "Payment confirmed");
        } else {
            self.orders
                .mark_failed(
                    &order_id,
                    &cb.checkout_request_id,
                    cb.result_code,
                    Some(cb.result_desc),
                )
                .await?;
            tracing::info!(order_id, result_code = cb.result_code, "Payment failed");
        }

        Ok(())
    }

    /// Order listing for the polling client: admins see every order,
    /// users only their own. Newest first.
    pub async fn list_orders(&self, user: &CurrentUser) -> AppResult<Vec<shared::models::Order>> {
        let orders = if user.is_admin() {
            self.orders.find_all_desc().await?
        } else {
            self.orders.find_by_user_desc(&user.id).await?
        };
        Ok(orders.into_iter().map(|o| o.into_dto()).collect())
    }
}
