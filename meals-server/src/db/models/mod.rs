//! Database models
//!
//! Documents as stored in SurrealDB. Wire DTOs live in `shared`; the
//! conversions happen at the handler boundary.

pub mod food;
pub mod order;
pub mod serde_helpers;
pub mod user;

pub use food::{Food, FoodCreate};
pub use order::{Order, OrderCreate};
pub use user::{User, UserCreate, UserId};
