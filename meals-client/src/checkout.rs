//! Client checkout flow
//!
//! Ties the pieces together: place the order, then for mobile money run
//! the payment poller; local and remote carts are cleared only once the
//! order is actually settled (immediately for cash, on confirmation for
//! mpesa).

use std::sync::Arc;

use shared::models::{DeliveryAddress, OrderItem};
use shared::request::PlaceOrderRequest;
use shared::types::PaymentMethod;

use crate::http::ApiClient;
use crate::poller::{PaymentPoller, PollOutcome, PollSchedule};
use crate::store::CartStore;
use crate::{ClientError, ClientResult};

/// Fixed delivery surcharge, added on top of the items total.
pub const DELIVERY_FEE: f64 = 30.0;

/// Build the placement payload from the checkout form state.
///
/// The amount is the items total plus the delivery fee (an empty order
/// carries no fee; the server rejects it anyway). Cash orders declare
/// themselves paid at creation.
pub fn build_order_request(
    address: DeliveryAddress,
    items: Vec<OrderItem>,
    payment_method: PaymentMethod,
) -> PlaceOrderRequest {
    let subtotal: f64 = items
        .iter()
        .map(|i| i.price * f64::from(i.quantity))
        .sum();
    let amount = if items.is_empty() {
        0.0
    } else {
        subtotal + DELIVERY_FEE
    };

    PlaceOrderRequest {
        address,
        items,
        amount,
        payment_method,
        payment: payment_method == PaymentMethod::Cash,
    }
}

/// Terminal result of a checkout attempt, for the UI to render.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Order settled (cash at creation, mpesa via callback); carts cleared.
    Settled { order_id: String },
    /// The poll ceiling elapsed; the order exists server-side and may
    /// still be confirmed by a late callback.
    PaymentPending { order_id: String },
}

pub struct CheckoutFlow {
    api: Arc<ApiClient>,
    schedule: PollSchedule,
}

impl CheckoutFlow {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            schedule: PollSchedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: PollSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Place the order and drive it to a terminal client-side state.
    pub async fn place_and_confirm(
        &self,
        store: &mut CartStore<ApiClient>,
        request: PlaceOrderRequest,
    ) -> ClientResult<CheckoutOutcome> {
        let method = request.payment_method;
        let placed = self.api.place_order(&request).await?;
        let order_id = placed
            .order_id
            .ok_or_else(|| ClientError::InvalidResponse("Missing order id".to_string()))?;

        if method == PaymentMethod::Cash {
            store.clear().await?;
            return Ok(CheckoutOutcome::Settled { order_id });
        }

        let poller = PaymentPoller::new(self.api.clone(), self.schedule.clone());
        match poller.wait_for_payment(&order_id).await {
            PollOutcome::Confirmed(_) => {
                store.clear().await?;
                Ok(CheckoutOutcome::Settled { order_id })
            }
            PollOutcome::TimedOut { .. } | PollOutcome::Cancelled => {
                Ok(CheckoutOutcome::PaymentPending { order_id })
            }
            PollOutcome::Errored(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@x.com".to_string(),
            street: "s".to_string(),
            apartment_hostel: "a".to_string(),
            location: "l".to_string(),
            floor_number: "1".to_string(),
            room_number: "1".to_string(),
            phone: "254712345678".to_string(),
        }
    }

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            id: "food:a".to_string(),
            name: "Greek salad".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn order_amount_includes_delivery_fee() {
        let req = build_order_request(
            address(),
            vec![item(250.0, 2), item(100.0, 1)],
            PaymentMethod::Mpesa,
        );
        assert_eq!(req.amount, 600.0 + DELIVERY_FEE);
        assert!(!req.payment);
    }

    #[test]
    fn empty_order_carries_no_fee() {
        let req = build_order_request(address(), vec![], PaymentMethod::Cash);
        assert_eq!(req.amount, 0.0);
    }

    #[test]
    fn cash_order_declares_itself_paid() {
        let req = build_order_request(address(), vec![item(100.0, 1)], PaymentMethod::Cash);
        assert!(req.payment);
        assert_eq!(req.amount, 100.0 + DELIVERY_FEE);
    }
}
