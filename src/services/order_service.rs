use std::collections::{HashMap, HashSet};

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::orders::{CreateOrderBody, CreateOrderRequest, DirectOrder},
    entity::{
        Categories,
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    pricing::{CartLine, lines_total, quote_cart, totals_match},
    state::AppState,
    views::{OrderItemView, OrderView, ProductView},
};

struct NewOrder {
    user_id: i32,
    total: f64,
    delivery_address: Option<String>,
    payment_method: Option<String>,
    lines: Vec<NewLine>,
}

struct NewLine {
    product_id: i32,
    quantity: i32,
    price: f64,
}

/// Entry point for `POST /orders`: picks the use case from the body shape.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    body: CreateOrderBody,
) -> AppResult<OrderView> {
    match CreateOrderRequest::try_from(body) {
        Ok(CreateOrderRequest::FromCart) => create_from_cart(state, user).await,
        Ok(CreateOrderRequest::FromPayload(order)) => create_from_payload(state, user, order).await,
        Err(err) => {
            tracing::error!(error = %err, user_id = user.user_id, "error creating order");
            Err(AppError::OrderCreationFailed)
        }
    }
}

/// Checks out the caller's cart. Reading the cart, writing the order and
/// clearing the cart share one transaction, and the cart rows stay locked
/// until commit so a concurrent checkout sees an empty cart.
pub async fn create_from_cart(state: &AppState, user: &AuthUser) -> AppResult<OrderView> {
    let txn = state.orm.begin().await?;

    let cart = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if cart.is_empty() {
        txn.rollback().await?;
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let product_ids: Vec<i32> = cart.iter().map(|row| row.product_id).collect();
    let products: HashMap<i32, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let lines = cart
        .iter()
        .map(|row| {
            let product = products.get(&row.product_id).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "cart references missing product {}",
                    row.product_id
                ))
            })?;
            Ok(CartLine {
                product_id: row.product_id,
                quantity: row.quantity,
                price: product.price,
                tax_percent: product.tax_percent,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let quote = quote_cart(&lines);

    let order = insert_order(
        &txn,
        NewOrder {
            user_id: user.user_id,
            total: quote.total,
            delivery_address: None,
            payment_method: None,
            lines: quote
                .lines
                .iter()
                .map(|line| NewLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.unit_price,
                })
                .collect(),
        },
    )
    .await?;

    // clear cart
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    let view = load_order_view(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = view.id,
        user_id = user.user_id,
        total = view.total_price,
        items = view.items.len(),
        "order created from cart"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": view.id, "source": "cart" }),
    )
    .await;

    Ok(view)
}

/// Stores a client-assembled order as sent. Any failure is logged and
/// reported as [`AppError::OrderCreationFailed`].
pub async fn create_from_payload(
    state: &AppState,
    user: &AuthUser,
    order: DirectOrder,
) -> AppResult<OrderView> {
    match persist_direct_order(state, user, order).await {
        Ok(view) => Ok(view),
        Err(err) => {
            tracing::error!(error = ?err, user_id = user.user_id, "error creating order");
            Err(AppError::OrderCreationFailed)
        }
    }
}

async fn persist_direct_order(
    state: &AppState,
    user: &AuthUser,
    order: DirectOrder,
) -> AppResult<OrderView> {
    let owner = order.user_id.unwrap_or(user.user_id);

    // The client total is stored as sent; a mismatch is only reported.
    let items_total = lines_total(order.items.iter().map(|item| (item.quantity, item.price)));
    if !totals_match(items_total, order.total_amount) {
        tracing::warn!(
            user_id = owner,
            total_amount = order.total_amount,
            items_total,
            "client total differs from its line items"
        );
    }

    let txn = state.orm.begin().await?;
    let created = insert_order(
        &txn,
        NewOrder {
            user_id: owner,
            total: order.total_amount,
            delivery_address: order.delivery_address,
            payment_method: order.payment_method,
            lines: order
                .items
                .into_iter()
                .map(|item| NewLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        },
    )
    .await?;
    let view = load_order_view(&txn, created).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = view.id,
        user_id = owner,
        total = view.total_amount,
        items = view.items.len(),
        "order created from payload"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": view.id, "source": "payload", "owner_id": owner }),
    )
    .await;

    Ok(view)
}

pub async fn list_my_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<OrderView>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?;

    let views = load_order_views(&state.orm, orders).await?;
    Ok(views)
}

pub async fn get_my_order(state: &AppState, user: &AuthUser, id: i32) -> AppResult<OrderView> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let view = load_order_view(&state.orm, order).await?;
    Ok(view)
}

async fn insert_order<C: ConnectionTrait>(conn: &C, new: NewOrder) -> Result<OrderModel, DbErr> {
    let order = OrderActive {
        id: NotSet,
        user_id: Set(new.user_id),
        total_price: Set(new.total),
        total_amount: Set(new.total),
        delivery_address: Set(new.delivery_address),
        payment_method: Set(new.payment_method),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;

    if !new.lines.is_empty() {
        OrderItems::insert_many(new.lines.into_iter().map(|line| OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
        }))
        .exec(conn)
        .await?;
    }

    Ok(order)
}

async fn load_order_view<C: ConnectionTrait>(conn: &C, order: OrderModel) -> AppResult<OrderView> {
    let mut views = load_order_views(conn, vec![order]).await?;
    views
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order view missing after load")))
}

/// Attaches items, products and categories to already-ordered orders.
pub async fn load_order_views<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderView>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Id)
        .all(conn)
        .await?;

    let product_ids: Vec<i32> = items
        .iter()
        .map(|item| item.product_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let products: HashMap<i32, ProductView> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .find_also_related(Categories)
            .all(conn)
            .await?
            .into_iter()
            .map(|(product, category)| (product.id, ProductView::from_entity(product, category)))
            .collect()
    };

    let mut by_order: HashMap<i32, Vec<OrderItemView>> = HashMap::new();
    for item in items {
        let product = products.get(&item.product_id).cloned();
        by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItemView::from_entity(item, product));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderView::from_entity(order, items)
        })
        .collect())
}
