//! Wire-level data models
//!
//! DTO 使用纯字符串 ID ("table:key" 形式)，由服务端在边界处转换。

pub mod cart;
pub mod food;
pub mod order;

pub use cart::CartData;
pub use food::FoodItem;
pub use order::{DeliveryAddress, MpesaRecord, Order, OrderItem};
