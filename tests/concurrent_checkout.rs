mod common;

use axum_orders_api::{dto::orders::CreateOrderBody, error::AppError, services::order_service};
use common::{count_orders, create_product, create_user, database_url, fill_cart, setup_state};

// Two checkouts racing over one cart: the row lock makes the loser see an empty cart.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn simultaneous_checkouts_of_one_cart_create_one_order() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };

    let state = setup_state(&database_url).await?;
    let shopper = create_user(&state, "racer@example.com").await?;
    let rice = create_product(&state, "Rice", 12.5, Some(5.0)).await?;
    let bottle = create_product(&state, "Bottle", 18.0, None).await?;

    for round in 1..=10 {
        fill_cart(&state, &shopper, &[(rice, 1), (bottle, 2)]).await?;
        let before = count_orders(&state).await?;

        let (first, second) = tokio::join!(
            order_service::create_order(&state, &shopper, CreateOrderBody::default()),
            order_service::create_order(&state, &shopper, CreateOrderBody::default()),
        );

        let (created, rejected) = match (first, second) {
            (Ok(order), Err(err)) | (Err(err), Ok(order)) => (order, err),
            (Ok(a), Ok(b)) => panic!("round {round}: one cart produced orders {} and {}", a.id, b.id),
            (Err(a), Err(b)) => panic!("round {round}: both checkouts failed: {a:?} / {b:?}"),
        };

        assert!(
            matches!(rejected, AppError::BadRequest(ref msg) if msg == "Cart is empty"),
            "round {round}: unexpected error {rejected:?}"
        );
        assert_eq!(created.items.len(), 2);
        assert_eq!(count_orders(&state).await?, before + 1);
    }

    Ok(())
}
