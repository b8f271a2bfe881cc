mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, StatusCode, header},
};
use axum_orders_api::{
    middleware::auth::issue_token, pricing::tax_inclusive_price, routes::create_api_router,
};
use common::{JWT_SECRET, create_product, create_user, database_url, fill_cart, setup_state};
use serde_json::Value;
use tower::ServiceExt;

fn request(method: Method, uri: &str, token: Option<&str>, body: &str) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

async fn json_body(response: Response<Body>) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn order_routes_answer_with_expected_statuses() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };

    let state = setup_state(&database_url).await?;
    let shopper = create_user(&state, "routes@example.com").await?;
    let rice = create_product(&state, "Rice", 12.5, Some(5.0)).await?;
    fill_cart(&state, &shopper, &[(rice, 2)]).await?;

    let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
    let token = issue_token(shopper.user_id, exp, JWT_SECRET)?;
    let app = Router::new()
        .nest("/api", create_api_router())
        .with_state(state);

    // Whitespace-only body checks out the cart.
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/orders", Some(&token), " \n ")?)
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = json_body(response).await?;
    let expected_total = 0.0 + tax_inclusive_price(12.5, Some(5.0)) * 2.0;
    assert_eq!(order["totalPrice"], expected_total);
    assert_eq!(order["total_amount"], expected_total);
    assert_eq!(order["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(order["items"][0]["product"]["reviews_count"], 0);

    // Cart is now empty.
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/orders", Some(&token), "")?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await?["message"], "Cart is empty");

    // A body that is not JSON is rejected before any use case runs.
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/orders", Some(&token), "total_amount=5")?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed payload collapses into the generic failure.
    let body = format!(
        r#"{{"total_amount": 10, "order_items": [{{"product_id": {rice}, "quantity": 1, "price": "abc"}}]}}"#
    );
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/orders", Some(&token), &body)?)
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await?["message"], "Failed to create order");

    // No identity, no orders.
    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/orders/my-orders", None, "")?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/orders/my-orders", Some(&token), "")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let history = json_body(response).await?;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["id"], order["id"]);

    Ok(())
}
