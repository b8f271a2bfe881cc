use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::coerce::{
    CoerceError, array_field, float_field, int_field, is_truthy, text_field,
};

/// Raw create-order body. Every field is optional and loosely typed; the
/// storefront sends numbers as strings in some places.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderBody {
    pub total_amount: Option<Value>,
    pub delivery_address: Option<Value>,
    pub payment_method: Option<Value>,
    /// Array of `{product_id, quantity, price}`.
    pub order_items: Option<Value>,
    pub user_id: Option<Value>,
}

/// Which checkout use case a request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOrderRequest {
    FromCart,
    FromPayload(DirectOrder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectOrder {
    /// Owner override. `None` means the authenticated caller.
    pub user_id: Option<i32>,
    pub total_amount: f64,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<DirectOrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    pub price: f64,
}

impl CreateOrderBody {
    /// A body carries a complete order when both the total and the items are truthy.
    pub fn is_direct_payload(&self) -> bool {
        is_truthy(self.total_amount.as_ref()) && is_truthy(self.order_items.as_ref())
    }
}

impl TryFrom<CreateOrderBody> for CreateOrderRequest {
    type Error = CoerceError;

    fn try_from(body: CreateOrderBody) -> Result<Self, Self::Error> {
        if !body.is_direct_payload() {
            return Ok(CreateOrderRequest::FromCart);
        }

        let items = array_field("order_items", body.order_items.as_ref())?
            .iter()
            .map(DirectOrderItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let user_id = if is_truthy(body.user_id.as_ref()) {
            Some(int_field("user_id", body.user_id.as_ref())?)
        } else {
            None
        };

        Ok(CreateOrderRequest::FromPayload(DirectOrder {
            user_id,
            total_amount: float_field("total_amount", body.total_amount.as_ref())?,
            delivery_address: text_field("delivery_address", body.delivery_address.as_ref())?,
            payment_method: text_field("payment_method", body.payment_method.as_ref())?,
            items,
        }))
    }
}

impl TryFrom<&Value> for DirectOrderItem {
    type Error = CoerceError;

    fn try_from(item: &Value) -> Result<Self, Self::Error> {
        // Quantity is stored as given; only a non-integer is rejected.
        let quantity = match item.get("quantity") {
            Some(v @ Value::Number(n)) => n
                .as_i64()
                .and_then(|q| i32::try_from(q).ok())
                .ok_or_else(|| CoerceError::NotAnInteger {
                    field: "quantity",
                    value: v.to_string(),
                })?,
            None | Some(Value::Null) => return Err(CoerceError::Missing("quantity")),
            Some(v) => {
                return Err(CoerceError::NotAnInteger {
                    field: "quantity",
                    value: v.to_string(),
                });
            }
        };

        Ok(DirectOrderItem {
            product_id: int_field("product_id", item.get("product_id"))?,
            quantity,
            price: float_field("price", item.get("price"))?,
        })
    }
}
