//! Order Repository
//!
//! 订单文档与支付状态字段。回调写入只改 `payment` 与 `mpesa` 子记录，
//! 绝不触碰金额、条目等下单时冻结的字段。

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Order, OrderCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

// "order" is a SurrealQL keyword
const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Create returned no record".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Attach the gateway correlation id after a successful STK initiation.
    pub async fn set_checkout_request_id(
        &self,
        order_id: &str,
        checkout_request_id: &str,
    ) -> RepoResult<Order> {
        let record_id = parse_id(ORDER_TABLE, order_id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET mpesa.CheckoutRequestID = $crid RETURN AFTER")
            .bind(("order", record_id))
            .bind(("crid", checkout_request_id.to_string()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Callback correlation lookup. The correlation id is the only key the
    /// gateway echoes back.
    pub async fn find_by_checkout_request_id(
        &self,
        checkout_request_id: &str,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE mpesa.CheckoutRequestID = $crid LIMIT 1")
            .bind(("crid", checkout_request_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Confirm payment: flips the flag and records the gateway receipt
    /// fields in one field-scoped write.
    pub async fn mark_paid(
        &self,
        order_id: &str,
        checkout_request_id: &str,
        receipt: Option<String>,
        transaction_date: Option<i64>,
        phone_number: Option<String>,
    ) -> RepoResult<Order> {
        let record_id = parse_id(ORDER_TABLE, order_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET payment = true, mpesa = { \
                 CheckoutRequestID: $crid, \
                 MpesaReceiptNumber: $receipt, \
                 TransactionDate: $tdate, \
                 PhoneNumber: $phone, \
                 ResultCode: 0 \
                 } RETURN AFTER",
            )
            .bind(("order", record_id))
            .bind(("crid", checkout_request_id.to_string()))
            .bind(("receipt", receipt))
            .bind(("tdate", transaction_date))
            .bind(("phone", phone_number))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Record a declined or failed payment attempt.
    pub async fn mark_failed(
        &self,
        order_id: &str,
        checkout_request_id: &str,
        result_code: i64,
        result_desc: Option<String>,
    ) -> RepoResult<Order> {
        let record_id = parse_id(ORDER_TABLE, order_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET payment = false, mpesa = { \
                 CheckoutRequestID: $crid, \
                 ResultCode: $code, \
                 ResultDesc: $desc \
                 } RETURN AFTER",
            )
            .bind(("order", record_id))
            .bind(("crid", checkout_request_id.to_string()))
            .bind(("code", result_code))
            .bind(("desc", result_desc))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// All orders, newest first (admin listing).
    pub async fn find_all_desc(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY createdAt DESC")
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// A user's orders, newest first.
    pub async fn find_by_user_desc(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE userId = $uid ORDER BY createdAt DESC")
            .bind(("uid", user_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }
}
