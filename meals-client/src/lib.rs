//! Meals Client - HTTP client for the SwiftMeals server
//!
//! Provides typed API calls plus the two client-side flows the UI needs:
//! an explicit cart store with rollback-on-rejection semantics, and a
//! bounded payment poller with a cancellation handle.

pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod poller;
pub mod store;

pub use checkout::{CheckoutFlow, CheckoutOutcome, DELIVERY_FEE, build_order_request};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, CartTransport, OrderSource};
pub use poller::{PaymentPoller, PollOutcome, PollSchedule};
pub use store::{CartStore, MutationOutcome};

// Re-export shared types for convenience
pub use shared::models::{CartData, FoodItem, Order};
pub use shared::request::PlaceOrderRequest;
pub use shared::response::PlaceOrderResponse;
