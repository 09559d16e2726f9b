//! M-Pesa Daraja integration via REST API (no SDK dependency)
//!
//! Two calls per initiation: an OAuth client-credentials token fetch,
//! then the STK push itself. Tokens are not cached; Daraja tokens are
//! short-lived and a fresh fetch per checkout keeps the client stateless.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde_json::json;

use super::{GatewayError, GatewayResult, PaymentGateway, StkInitiation};

/// Daraja credentials and endpoints, loaded from the environment.
#[derive(Debug, Clone)]
pub struct MpesaConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Business shortcode (PartyB / BusinessShortCode)
    pub shortcode: String,
    pub passkey: String,
    /// API host, e.g. https://sandbox.safaricom.co.ke
    pub base_url: String,
    /// Public base for result callbacks; the order id is appended as a
    /// path segment so the callback route can log which order it was for.
    pub callback_base_url: String,
}

impl MpesaConfig {
    pub fn from_env() -> Option<Self> {
        let consumer_key = std::env::var("MPESA_CONSUMER_KEY").ok()?;
        let consumer_secret = std::env::var("MPESA_CONSUMER_SECRET").ok()?;
        let shortcode = std::env::var("MPESA_SHORTCODE").ok()?;
        let passkey = std::env::var("MPESA_PASSKEY").ok()?;
        let base_url = std::env::var("MPESA_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.safaricom.co.ke".to_string());
        let callback_base_url = std::env::var("MPESA_CALLBACK_URL").ok()?;
        Some(Self {
            consumer_key,
            consumer_secret,
            shortcode,
            passkey,
            base_url,
            callback_base_url,
        })
    }
}

/// Daraja STK push client
pub struct MpesaGateway {
    http: reqwest::Client,
    config: MpesaConfig,
}

impl MpesaGateway {
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// OAuth client-credentials token, fetched fresh for every push.
    async fn fetch_token(&self) -> GatewayResult<String> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url
        );
        let resp: serde_json::Value = self
            .http
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?
            .json()
            .await?;

        resp["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::TokenFetch(resp.to_string()))
    }
}

/// Daraja request password: base64(shortcode + passkey + timestamp).
fn build_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    BASE64.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// Trailing slashes on the configured base would produce `//{order_id}`.
fn build_callback_url(base: &str, order_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), order_id)
}

#[async_trait]
impl PaymentGateway for MpesaGateway {
    async fn initiate_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: u64,
    ) -> GatewayResult<StkInitiation> {
        let token = self.fetch_token().await?;

        let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let password = build_password(&self.config.shortcode, &self.config.passkey, &timestamp);

        let body = json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": password,
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": amount,
            "PartyA": phone,
            "PartyB": self.config.shortcode,
            "PhoneNumber": phone,
            "CallBackURL": build_callback_url(&self.config.callback_base_url, order_id),
            "AccountReference": format!("SwiftMeals-{order_id}"),
            "TransactionDesc": format!("Payment for order {order_id}"),
        });

        let url = format!("{}/mpesa/stkpush/v1/processrequest", self.config.base_url);
        let resp: serde_json::Value = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        // Accepted pushes carry ResponseCode "0"; rejections carry an
        // errorMessage instead.
        if resp["ResponseCode"].as_str() != Some("0") {
            let msg = resp["errorMessage"]
                .as_str()
                .or_else(|| resp["ResponseDescription"].as_str())
                .unwrap_or("unknown gateway error");
            return Err(GatewayError::Rejected(msg.to_string()));
        }

        let checkout_request_id = resp["CheckoutRequestID"]
            .as_str()
            .map(String::from)
            .ok_or(GatewayError::MalformedResponse("CheckoutRequestID"))?;

        tracing::info!(order_id, checkout_request_id, "STK push accepted");

        Ok(StkInitiation {
            merchant_request_id: resp["MerchantRequestID"].as_str().map(String::from),
            checkout_request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_base64_of_concatenation() {
        let password = build_password("174379", "passkey", "20260101120000");
        let decoded = BASE64.decode(password).unwrap();
        assert_eq!(decoded, b"174379passkey20260101120000");
    }

    #[test]
    fn callback_url_appends_order_id() {
        assert_eq!(
            build_callback_url("https://api.example.com/api/order/callback", "orders:abc"),
            "https://api.example.com/api/order/callback/orders:abc"
        );
        assert_eq!(
            build_callback_url("https://api.example.com/cb/", "orders:abc"),
            "https://api.example.com/cb/orders:abc"
        );
    }
}
