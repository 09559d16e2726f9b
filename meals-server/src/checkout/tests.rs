//! Checkout orchestrator tests: stub gateway + in-memory storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use shared::models::{DeliveryAddress, OrderItem};
use shared::request::{PlaceOrderRequest, StkCallbackBody};
use shared::types::{PaymentMethod, Role};

use super::CheckoutService;
use crate::auth::CurrentUser;
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::payments::{GatewayError, GatewayResult, PaymentGateway, StkInitiation};
use crate::utils::AppError;

/// Stub gateway: hands out sequential correlation ids, or fails every
/// call when constructed with `failing()`.
struct StubGateway {
    calls: AtomicUsize,
    fail: bool,
}

impl StubGateway {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn initiate_stk_push(
        &self,
        _order_id: &str,
        _phone: &str,
        _amount: u64,
    ) -> GatewayResult<StkInitiation> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(GatewayError::Rejected("Insufficient credentials".into()));
        }
        Ok(StkInitiation {
            merchant_request_id: None,
            checkout_request_id: format!("ws_{n}"),
        })
    }
}

async fn service_with(gateway: StubGateway) -> (CheckoutService, OrderRepository) {
    let db = DbService::memory().await.unwrap().db;
    let orders = OrderRepository::new(db);
    (
        CheckoutService::new(orders.clone(), Arc::new(gateway)),
        orders,
    )
}

fn customer() -> CurrentUser {
    CurrentUser {
        id: "user:alice".to_string(),
        role: Role::User,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: "user:root".to_string(),
        role: Role::Admin,
    }
}

fn request(method: PaymentMethod, amount: f64) -> PlaceOrderRequest {
    PlaceOrderRequest {
        address: DeliveryAddress {
            first_name: "Alice".to_string(),
            last_name: "W".to_string(),
            email: "alice@x.com".to_string(),
            street: "Moi Avenue".to_string(),
            apartment_hostel: "Block C".to_string(),
            location: "Nairobi".to_string(),
            floor_number: "2".to_string(),
            room_number: "12".to_string(),
            phone: "254712345678".to_string(),
        },
        items: vec![OrderItem {
            id: "food:pilau".to_string(),
            name: "Pilau".to_string(),
            price: 200.0,
            quantity: 1,
        }],
        amount,
        payment_method: method,
        payment: false,
    }
}

fn success_callback(checkout_request_id: &str, receipt: &str) -> StkCallbackBody {
    serde_json::from_value(json!({
        "Body": {
            "stkCallback": {
                "CheckoutRequestID": checkout_request_id,
                "ResultCode": 0,
                "ResultDesc": "The service request is processed successfully.",
                "CallbackMetadata": {
                    "Item": [
                        { "Name": "Amount", "Value": 200.0 },
                        { "Name": "MpesaReceiptNumber", "Value": receipt },
                        { "Name": "TransactionDate", "Value": 20260101120000i64 },
                        { "Name": "PhoneNumber", "Value": 254712345678i64 }
                    ]
                }
            }
        }
    }))
    .unwrap()
}

fn failure_callback(checkout_request_id: &str, code: i64, desc: &str) -> StkCallbackBody {
    serde_json::from_value(json!({
        "Body": {
            "stkCallback": {
                "CheckoutRequestID": checkout_request_id,
                "ResultCode": code,
                "ResultDesc": desc
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn cash_order_is_paid_at_creation() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let resp = service
        .place_order(&customer(), request(PaymentMethod::Cash, 230.0))
        .await
        .unwrap();

    assert!(resp.success);
    assert!(resp.checkout_request_id.is_none());

    let stored = orders
        .find_by_id(&resp.order_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.payment, "cash orders are paid at creation");
    assert!(stored.mpesa.checkout_request_id.is_none());
}

#[tokio::test]
async fn mpesa_order_confirms_via_callback() {
    let (service, orders) = service_with(StubGateway::new()).await;

    // Placement: order stored unpaid, correlated
    let resp = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap();
    let order_id = resp.order_id.unwrap();
    let crid = resp.checkout_request_id.unwrap();
    assert_eq!(crid, "ws_1");

    let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!stored.payment);
    assert_eq!(stored.mpesa.checkout_request_id.as_deref(), Some("ws_1"));

    // Callback: payment flips, receipt recorded
    let cb = success_callback(&crid, "R123").body.stk_callback;
    service.apply_callback(&order_id, cb).await.unwrap();

    let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(stored.payment);
    assert_eq!(stored.mpesa.mpesa_receipt_number.as_deref(), Some("R123"));
    assert_eq!(stored.mpesa.transaction_date, Some(20260101120000));
    assert_eq!(stored.mpesa.phone_number.as_deref(), Some("254712345678"));
    assert_eq!(stored.mpesa.result_code, Some(0));
}

#[tokio::test]
async fn redelivered_success_callback_is_idempotent() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let resp = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap();
    let order_id = resp.order_id.unwrap();
    let crid = resp.checkout_request_id.unwrap();

    let cb = success_callback(&crid, "R123").body.stk_callback;
    service.apply_callback(&order_id, cb).await.unwrap();
    let first = orders.find_by_id(&order_id).await.unwrap().unwrap();

    // Gateways retry; a second identical delivery re-applies the same
    // values and must not flip or mangle anything.
    let cb = success_callback(&crid, "R123").body.stk_callback;
    service.apply_callback(&order_id, cb).await.unwrap();

    let second = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(second.payment);
    assert_eq!(second.mpesa, first.mpesa);
}

#[tokio::test]
async fn failed_callback_records_code_and_stays_unpaid() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let resp = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap();
    let order_id = resp.order_id.unwrap();
    let crid = resp.checkout_request_id.unwrap();

    let cb = failure_callback(&crid, 1032, "Request cancelled by user")
        .body
        .stk_callback;
    service.apply_callback(&order_id, cb).await.unwrap();

    let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!stored.payment);
    assert_eq!(stored.mpesa.result_code, Some(1032));
    assert_eq!(
        stored.mpesa.result_desc.as_deref(),
        Some("Request cancelled by user")
    );
    assert!(stored.mpesa.mpesa_receipt_number.is_none());
}

#[tokio::test]
async fn failure_after_success_discards_receipt_fields() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let resp = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap();
    let order_id = resp.order_id.unwrap();
    let crid = resp.checkout_request_id.unwrap();

    let ok = success_callback(&crid, "R123").body.stk_callback;
    service.apply_callback(&order_id, ok).await.unwrap();

    let failed = failure_callback(&crid, 1, "Gateway retraction")
        .body
        .stk_callback;
    service.apply_callback(&order_id, failed).await.unwrap();

    let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!stored.payment);
    assert!(
        stored.mpesa.mpesa_receipt_number.is_none(),
        "a failure write replaces the whole sub-record"
    );
}

#[tokio::test]
async fn unknown_correlation_id_is_rejected_without_mutation() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let resp = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap();
    let order_id = resp.order_id.unwrap();

    let cb = success_callback("ws_other", "R999").body.stk_callback;
    let err = service.apply_callback(&order_id, cb).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!stored.payment);
    assert!(stored.mpesa.mpesa_receipt_number.is_none());
}

#[tokio::test]
async fn gateway_failure_leaves_order_persisted_uncorrelated() {
    let (service, orders) = service_with(StubGateway::failing()).await;

    let err = service
        .place_order(&customer(), request(PaymentMethod::Mpesa, 200.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    let all = orders.find_all_desc().await.unwrap();
    assert_eq!(all.len(), 1, "order stays persisted on initiation failure");
    assert!(!all[0].payment);
    assert!(all[0].mpesa.checkout_request_id.is_none());
}

#[tokio::test]
async fn empty_items_and_bad_amount_are_rejected() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let mut req = request(PaymentMethod::Cash, 230.0);
    req.items.clear();
    assert!(matches!(
        service.place_order(&customer(), req).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let req = request(PaymentMethod::Cash, 0.0);
    assert!(matches!(
        service.place_order(&customer(), req).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(orders.find_all_desc().await.unwrap().is_empty());
}

#[tokio::test]
async fn mpesa_requires_valid_phone() {
    let (service, orders) = service_with(StubGateway::new()).await;

    let mut req = request(PaymentMethod::Mpesa, 200.0);
    req.address.phone = "0712345678".to_string();
    assert!(matches!(
        service.place_order(&customer(), req).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(
        orders.find_all_desc().await.unwrap().is_empty(),
        "phone is validated before the order document is written"
    );
}

#[tokio::test]
async fn listing_scopes_by_role_newest_first() {
    let (service, _orders) = service_with(StubGateway::new()).await;

    let alice = customer();
    let bob = CurrentUser {
        id: "user:bob".to_string(),
        role: Role::User,
    };

    service
        .place_order(&alice, request(PaymentMethod::Cash, 230.0))
        .await
        .unwrap();
    service
        .place_order(&bob, request(PaymentMethod::Cash, 130.0))
        .await
        .unwrap();
    service
        .place_order(&alice, request(PaymentMethod::Cash, 330.0))
        .await
        .unwrap();

    let mine = service.list_orders(&alice).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].amount, 330.0);
    assert_eq!(mine[1].amount, 230.0);

    let everyone = service.list_orders(&admin()).await.unwrap();
    assert_eq!(everyone.len(), 3);
}
