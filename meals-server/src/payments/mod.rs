//! Payments Module
//!
//! 支付网关抽象。结账编排只依赖 [`PaymentGateway`] trait，
//! 生产环境接 Daraja STK 推送，测试环境用桩实现。

pub mod mpesa;

pub use mpesa::{MpesaConfig, MpesaGateway};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway failure. Every variant aborts the payment attempt; the
/// already-created order stays persisted unpaid and uncorrelated.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("token fetch failed: {0}")]
    TokenFetch(String),

    #[error("gateway rejected request: {0}")]
    Rejected(String),

    #[error("gateway response missing {0}")]
    MalformedResponse(&'static str),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Accepted STK push initiation.
///
/// `checkout_request_id` is the only key the gateway echoes back in the
/// asynchronous result callback, so it must be persisted immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkInitiation {
    pub merchant_request_id: Option<String>,
    pub checkout_request_id: String,
}

/// Payment gateway seam.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Push a payment prompt to the customer's phone for the given order.
    /// `amount` is in whole currency units, `phone` in 2547XXXXXXXX form.
    async fn initiate_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: u64,
    ) -> GatewayResult<StkInitiation>;
}

/// Stand-in used when no Daraja credentials are configured. Cash orders
/// still work; mobile-money attempts fail at initiation.
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn initiate_stk_push(
        &self,
        _order_id: &str,
        _phone: &str,
        _amount: u64,
    ) -> GatewayResult<StkInitiation> {
        Err(GatewayError::Rejected(
            "Mobile money payments are not configured".to_string(),
        ))
    }
}
