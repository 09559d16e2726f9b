//! HTTP client for the SwiftMeals REST API
//!
//! The server reports business failures as `{success: false, message}`
//! with HTTP 200; those surface here as [`ClientError::Rejected`] so
//! callers can tell them apart from transport faults.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::models::{CartData, FoodItem, Order};
use shared::request::{
    CartMutationRequest, ForgotPasswordRequest, LoginRequest, PlaceOrderRequest,
    RegisterRequest, ResetPasswordRequest,
};
use shared::response::{
    AuthResponse, CartResponse, FoodListResponse, OrderListResponse, PlaceOrderResponse,
    StatusResponse,
};
use shared::types::Role;

use crate::{ClientConfig, ClientError, ClientResult};

/// Wire contract: the raw JWT travels in a custom header, not a
/// standard bearer scheme.
pub const TOKEN_HEADER: &str = "token";

/// HTTP client for making network requests to the server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path));
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    fn auth_result(resp: AuthResponse) -> ClientResult<(String, Role)> {
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.message.unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        let token = resp
            .token
            .ok_or_else(|| ClientError::InvalidResponse("Missing token".to_string()))?;
        let role = resp
            .role
            .ok_or_else(|| ClientError::InvalidResponse("Missing role".to_string()))?;
        Ok((token, role))
    }

    fn status_result(resp: StatusResponse) -> ClientResult<()> {
        if resp.success {
            Ok(())
        } else {
            Err(ClientError::Rejected(resp.message))
        }
    }

    // ========== User API ==========

    /// Register a new account, returning the issued token and role.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<(String, Role)> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        };
        let resp: AuthResponse = self.post("/api/user/register", &request).await?;
        Self::auth_result(resp)
    }

    /// Login as the given role, returning the issued token and role.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> ClientResult<(String, Role)> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let resp: AuthResponse = self.post("/api/user/login", &request).await?;
        Self::auth_result(resp)
    }

    /// Request a password-reset link by email.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let resp: StatusResponse = self.post("/api/user/forgot-password", &request).await?;
        Self::status_result(resp)
    }

    /// Set a new password using a reset token from the emailed link.
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        let resp: StatusResponse = self.post("/api/user/reset-password", &request).await?;
        Self::status_result(resp)
    }

    // ========== Food API ==========

    /// The full menu.
    pub async fn list_food(&self) -> ClientResult<Vec<FoodItem>> {
        let resp: FoodListResponse = self.get("/api/food/list").await?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.message.unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        Ok(resp.data)
    }

    // ========== Order API ==========

    /// Place an order; for mpesa the response carries the correlation id
    /// the poller then waits on.
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> ClientResult<PlaceOrderResponse> {
        let resp: PlaceOrderResponse = self.post("/api/order/place", request).await?;
        if !resp.success {
            return Err(ClientError::Rejected(resp.message));
        }
        Ok(resp)
    }
}

/// Remote side of the cart store: each call is one server mutation.
#[async_trait]
pub trait CartTransport: Send + Sync {
    async fn add_item(&self, item_id: &str) -> ClientResult<()>;
    async fn remove_item(&self, item_id: &str) -> ClientResult<()>;
    async fn fetch(&self) -> ClientResult<CartData>;
    async fn clear(&self) -> ClientResult<()>;
}

#[async_trait]
impl CartTransport for ApiClient {
    async fn add_item(&self, item_id: &str) -> ClientResult<()> {
        let request = CartMutationRequest {
            item_id: item_id.to_string(),
        };
        let resp: StatusResponse = self.post("/api/cart/add", &request).await?;
        Self::status_result(resp)
    }

    async fn remove_item(&self, item_id: &str) -> ClientResult<()> {
        let request = CartMutationRequest {
            item_id: item_id.to_string(),
        };
        let resp: StatusResponse = self.post("/api/cart/remove", &request).await?;
        Self::status_result(resp)
    }

    async fn fetch(&self) -> ClientResult<CartData> {
        let resp: CartResponse = self.get("/api/cart/get").await?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.message.unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        Ok(resp.cart_data)
    }

    async fn clear(&self) -> ClientResult<()> {
        let resp: StatusResponse = self.post_empty("/api/cart/clear").await?;
        Self::status_result(resp)
    }
}

/// Order listing seam for the payment poller.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_orders(&self) -> ClientResult<Vec<Order>>;
}

#[async_trait]
impl OrderSource for ApiClient {
    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let resp: OrderListResponse = self.get("/api/order/list").await?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.message.unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        Ok(resp.data)
    }
}
