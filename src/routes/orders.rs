use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::CreateOrderBody,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    services::order_service,
    state::AppState,
    views::OrderView,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_order))
        .route("/my-orders", get(list_my_orders))
        .route("/{id}", get(get_my_order))
}

/// An empty or whitespace-only body means "check out my cart".
pub fn parse_body(raw: &[u8]) -> AppResult<CreateOrderBody> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateOrderBody::default());
    }
    serde_json::from_slice(raw).map_err(|err| AppError::BadRequest(format!("Invalid JSON body: {err}")))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body(
        content = CreateOrderBody,
        description = "Omit, or leave out `total_amount`/`order_items`, to check out the cart"
    ),
    responses(
        (status = 201, description = "Order created", body = OrderView),
        (status = 400, description = "Cart is empty or body is not JSON"),
        (status = 500, description = "Failed to create order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> AppResult<(StatusCode, Json<OrderView>)> {
    let body = parse_body(&body)?;
    let order = order_service::create_order(&state, &user, body).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders/my-orders",
    responses(
        (status = 200, description = "Orders of the caller, newest first", body = Vec<OrderView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = order_service::list_my_orders(&state, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order", body = OrderView),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_my_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderView>> {
    let order = order_service::get_my_order(&state, &user, id).await?;
    Ok(Json(order))
}
