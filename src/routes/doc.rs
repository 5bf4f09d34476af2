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
        auth::{AccessTokenResponse, LoginPayload, LoginRequest, LoginResponse, RefreshRequest},
        checkout::{CartItems, CartLine, CheckoutResponse},
        orders::{CreatedOrderResponse, NewOrderRequest, OrdersResponse},
        products::{CreateProductRequest, ProductListResponse, UpdateProductRequest},
        users::{
            AddedUserResponse, ChangePasswordRequest, NewUserRequest, SaveResultResponse,
            UserListResponse,
        },
    },
    models::{OrderWithProducts, OrderedProduct, Product, ProductCategory, User},
    response::ApiResponse,
    routes::{authorization, checkout, health, orders, products, users},
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
        authorization::login,
        authorization::refresh,
        checkout::checkout,
        orders::list_orders,
        orders::place_order,
        orders::delete_order,
        users::list_users,
        users::add_user,
        users::change_password,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product
    ),
    components(
        schemas(
            User,
            Product,
            ProductCategory,
            OrderWithProducts,
            OrderedProduct,
            LoginRequest,
            LoginPayload,
            LoginResponse,
            RefreshRequest,
            AccessTokenResponse,
            CartItems,
            CartLine,
            CheckoutResponse,
            NewOrderRequest,
            CreatedOrderResponse,
            OrdersResponse,
            NewUserRequest,
            ChangePasswordRequest,
            AddedUserResponse,
            SaveResultResponse,
            UserListResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductListResponse,
            ApiResponse<Product>,
            ApiResponse<ProductListResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Authorization", description = "Login and token refresh"),
        (name = "Checkout", description = "Guest checkout tokens"),
        (name = "Orders", description = "Order placement and administration"),
        (name = "Users", description = "User management"),
        (name = "Products", description = "Product store"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
