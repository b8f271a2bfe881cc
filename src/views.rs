//! Wire shapes for order responses.
//!
//! Persisted fields are rendered in camelCase. The storefront also reads a
//! handful of snake_case names, which are emitted next to them from here and
//! nowhere else.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::{
    categories::Model as CategoryModel, order_items::Model as OrderItemModel,
    orders::Model as OrderModel, products::Model as ProductModel,
};

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub tax_percent: Option<f64>,
    pub available_stock: i32,
    pub original_price: Option<f64>,
    pub image_url: Option<String>,
    pub reviews_count: Option<i32>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryView>,

    #[serde(rename = "image_url")]
    pub image_url_alias: Option<String>,
    #[serde(rename = "stock_quantity")]
    pub stock_quantity_alias: i32,
    #[serde(rename = "original_price")]
    pub original_price_alias: Option<f64>,
    #[serde(rename = "reviews_count")]
    pub reviews_count_alias: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: f64,
    pub product: Option<ProductView>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i32,
    pub user_id: i32,
    pub total_price: f64,
    pub total_amount: f64,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,

    #[serde(rename = "total_amount")]
    pub total_amount_alias: f64,
    #[serde(rename = "delivery_address")]
    pub delivery_address_alias: Option<String>,
    #[serde(rename = "payment_method")]
    pub payment_method_alias: Option<String>,
}

impl From<CategoryModel> for CategoryView {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl ProductView {
    pub fn from_entity(model: ProductModel, category: Option<CategoryModel>) -> Self {
        Self {
            image_url_alias: model.image_url.clone(),
            stock_quantity_alias: model.available_stock,
            original_price_alias: model.original_price,
            reviews_count_alias: model.reviews_count.unwrap_or(0),
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            tax_percent: model.tax_percent,
            available_stock: model.available_stock,
            original_price: model.original_price,
            image_url: model.image_url,
            reviews_count: model.reviews_count,
            category_id: model.category_id,
            created_at: model.created_at.with_timezone(&Utc),
            category: category.map(CategoryView::from),
        }
    }
}

impl OrderItemView {
    pub fn from_entity(model: OrderItemModel, product: Option<ProductView>) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price: model.price,
            product,
        }
    }
}

impl OrderView {
    pub fn from_entity(model: OrderModel, items: Vec<OrderItemView>) -> Self {
        // A zero amount falls back to the price column.
        let total_amount_alias = if model.total_amount != 0.0 {
            model.total_amount
        } else {
            model.total_price
        };

        Self {
            id: model.id,
            user_id: model.user_id,
            total_price: model.total_price,
            total_amount: model.total_amount,
            delivery_address_alias: model.delivery_address.clone(),
            payment_method_alias: model.payment_method.clone(),
            delivery_address: model.delivery_address,
            payment_method: model.payment_method,
            created_at: model.created_at.with_timezone(&Utc),
            items,
            total_amount_alias,
        }
    }
}
