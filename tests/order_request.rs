use axum_orders_api::{
    coerce::{CoerceError, float_field, int_field, is_truthy},
    dto::orders::{CreateOrderBody, CreateOrderRequest, DirectOrder, DirectOrderItem},
    error::AppError,
    routes::orders::parse_body,
};
use serde_json::{Value, json};

fn body(value: Value) -> CreateOrderBody {
    serde_json::from_value(value).expect("body")
}

#[test]
fn empty_body_checks_out_the_cart() {
    let request = CreateOrderRequest::try_from(CreateOrderBody::default()).unwrap();
    assert_eq!(request, CreateOrderRequest::FromCart);
}

#[test]
fn total_without_items_checks_out_the_cart() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": 10,
        "delivery_address": "12 Market St"
    })))
    .unwrap();
    assert_eq!(request, CreateOrderRequest::FromCart);
}

#[test]
fn zero_total_checks_out_the_cart() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": 0,
        "order_items": [{ "product_id": 1, "quantity": 1, "price": 1 }]
    })))
    .unwrap();
    assert_eq!(request, CreateOrderRequest::FromCart);
}

#[test]
fn full_payload_is_taken_as_sent() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": 99.99,
        "delivery_address": "12 Market St",
        "payment_method": "cod",
        "order_items": [{ "product_id": 1, "quantity": 2, "price": 49.995 }]
    })))
    .unwrap();

    assert_eq!(
        request,
        CreateOrderRequest::FromPayload(DirectOrder {
            user_id: None,
            total_amount: 99.99,
            delivery_address: Some("12 Market St".into()),
            payment_method: Some("cod".into()),
            items: vec![DirectOrderItem {
                product_id: 1,
                quantity: 2,
                price: 49.995,
            }],
        })
    );
}

#[test]
fn numeric_strings_are_accepted() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": "25.50",
        "user_id": 9,
        "order_items": [{ "product_id": "4", "quantity": 1, "price": "25.5" }]
    })))
    .unwrap();

    let CreateOrderRequest::FromPayload(order) = request else {
        panic!("expected a direct payload");
    };
    assert_eq!(order.user_id, Some(9));
    assert_eq!(order.total_amount, 25.5);
    assert_eq!(order.items[0].product_id, 4);
    assert_eq!(order.items[0].price, 25.5);
}

#[test]
fn unvalidated_values_pass_through() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": 5,
        "order_items": [{ "product_id": 3, "quantity": -2, "price": -1.5 }]
    })))
    .unwrap();

    let CreateOrderRequest::FromPayload(order) = request else {
        panic!("expected a direct payload");
    };
    assert_eq!(order.items[0].quantity, -2);
    assert_eq!(order.items[0].price, -1.5);
}

#[test]
fn empty_item_list_is_still_a_payload() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": 5,
        "order_items": []
    })))
    .unwrap();

    let CreateOrderRequest::FromPayload(order) = request else {
        panic!("expected a direct payload");
    };
    assert!(order.items.is_empty());
}

#[test]
fn non_numeric_price_is_rejected() {
    let err = CreateOrderRequest::try_from(body(json!({
        "total_amount": 10,
        "order_items": [{ "product_id": 1, "quantity": 1, "price": "abc" }]
    })))
    .unwrap_err();

    assert!(matches!(err, CoerceError::NotANumber { field: "price", .. }));
}

#[test]
fn items_must_be_an_array() {
    let err = CreateOrderRequest::try_from(body(json!({
        "total_amount": 10,
        "order_items": { "product_id": 1 }
    })))
    .unwrap_err();

    assert_eq!(err, CoerceError::NotAnArray("order_items"));
}

#[test]
fn fractional_quantity_is_rejected() {
    let err = CreateOrderRequest::try_from(body(json!({
        "total_amount": 10,
        "order_items": [{ "product_id": 1, "quantity": 1.5, "price": 10 }]
    })))
    .unwrap_err();

    assert!(matches!(err, CoerceError::NotAnInteger { field: "quantity", .. }));
}

#[test]
fn truthiness_follows_loose_rules() {
    assert!(!is_truthy(None));
    assert!(!is_truthy(Some(&Value::Null)));
    assert!(!is_truthy(Some(&json!(0))));
    assert!(!is_truthy(Some(&json!(""))));
    assert!(!is_truthy(Some(&json!(false))));
    assert!(is_truthy(Some(&json!("0"))));
    assert!(is_truthy(Some(&json!([]))));
    assert!(is_truthy(Some(&json!(0.01))));
}

#[test]
fn integers_truncate_fractions() {
    assert_eq!(int_field("product_id", Some(&json!(12.9))), Ok(12));
    assert_eq!(int_field("product_id", Some(&json!(" 12 "))), Ok(12));
    assert_eq!(
        int_field("product_id", None),
        Err(CoerceError::Missing("product_id"))
    );
}

#[test]
fn strings_are_read_up_to_their_first_non_digit() {
    assert_eq!(int_field("product_id", Some(&json!("12abc"))), Ok(12));
    assert_eq!(int_field("product_id", Some(&json!("-3 units"))), Ok(-3));
    assert_eq!(int_field("product_id", Some(&json!("7.9"))), Ok(7));
    assert!(int_field("product_id", Some(&json!("abc12"))).is_err());
    assert!(int_field("product_id", Some(&json!(""))).is_err());

    assert_eq!(float_field("price", Some(&json!("49.995abc"))), Ok(49.995));
    assert_eq!(float_field("price", Some(&json!("  .5"))), Ok(0.5));
    assert_eq!(float_field("price", Some(&json!("1e3x"))), Ok(1000.0));
    assert_eq!(float_field("price", Some(&json!("2e"))), Ok(2.0));
    assert_eq!(float_field("price", Some(&json!("12."))), Ok(12.0));
    assert!(float_field("price", Some(&json!("-"))).is_err());
    assert!(float_field("price", Some(&json!("Infinity"))).is_err());
}

#[test]
fn partly_numeric_payload_values_are_accepted() {
    let request = CreateOrderRequest::try_from(body(json!({
        "total_amount": "20 USD",
        "order_items": [{ "product_id": "5th", "quantity": 2, "price": "10.00 each" }]
    })))
    .unwrap();

    let CreateOrderRequest::FromPayload(order) = request else {
        panic!("expected a direct payload");
    };
    assert_eq!(order.total_amount, 20.0);
    assert_eq!(order.items[0].product_id, 5);
    assert_eq!(order.items[0].price, 10.0);
}

#[test]
fn blank_request_body_checks_out_the_cart() {
    for raw in ["", "   ", "\n\t "] {
        let parsed = parse_body(raw.as_bytes()).unwrap();
        assert_eq!(
            CreateOrderRequest::try_from(parsed).unwrap(),
            CreateOrderRequest::FromCart
        );
    }
}

#[test]
fn json_request_body_is_parsed() {
    let parsed = parse_body(br#"{"total_amount": 5, "order_items": []}"#).unwrap();
    assert!(parsed.is_direct_payload());
}

#[test]
fn non_json_request_body_is_a_bad_request() {
    for raw in ["total_amount=5", "{", "nope"] {
        let err = parse_body(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.starts_with("Invalid JSON body")));
    }
}
