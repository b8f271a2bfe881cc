use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartLineDto, CartList},
        orders::CreateOrderBody,
    },
    models::CartItem,
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params},
    views::{CategoryView, OrderItemView, OrderView, ProductView},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::list_my_orders,
        orders::get_my_order,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart
    ),
    components(
        schemas(
            CreateOrderBody,
            OrderView,
            OrderItemView,
            ProductView,
            CategoryView,
            AddToCartRequest,
            CartItem,
            CartLineDto,
            CartList,
            params::Pagination,
            Meta,
            ApiResponse<CartList>,
            ApiResponse<CartItem>,
            health::HealthData
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Cart", description = "Cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
