use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartLineDto>,
}

/// A cart line with the catalog data shown at checkout.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub tax_percent: Option<f64>,
    /// Tax-inclusive price per unit, the price the order line will carry.
    pub unit_price: f64,
    pub quantity: i32,
}
