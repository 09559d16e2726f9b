//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::request::{PlaceOrderRequest, StkCallbackBody};
use shared::response::{CallbackAck, OrderListResponse, PlaceOrderResponse};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// POST /api/order/place - 下单;mpesa 订单同步发起 STK 推送
pub async fn place(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<PlaceOrderResponse>> {
    let resp = state.checkout_service().place_order(&user, req).await?;
    Ok(Json(resp))
}

/// POST /api/order/callback/{order_id} - 网关回调 (无认证)
///
/// 路径里的订单 id 只用于日志;对账以回调体中的
/// CheckoutRequestID 为唯一关联键。与软失败策略不同,
/// 本端点对网关说常规 HTTP 状态码。
pub async fn callback(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(body): Json<StkCallbackBody>,
) -> Response {
    let result = state
        .checkout_service()
        .apply_callback(&order_id, body.body.stk_callback)
        .await;

    match result {
        Ok(()) => Json(CallbackAck {
            message: "Callback processed".to_string(),
        })
        .into_response(),
        Err(AppError::NotFound(msg)) => (
            StatusCode::NOT_FOUND,
            Json(CallbackAck { message: msg }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(order_id, error = %e, "Callback processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CallbackAck {
                    message: "Callback processing failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/order/list - 订单列表;admin 看全部,用户只看自己的
pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<OrderListResponse>> {
    let orders = state.checkout_service().list_orders(&user).await?;
    Ok(Json(OrderListResponse {
        success: true,
        data: orders,
        message: None,
    }))
}
