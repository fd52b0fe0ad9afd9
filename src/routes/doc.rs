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
    domain::{
        cart_lines::LineItem,
        catalog::{CategoryInfo, ProductCategory, ProductSize},
        failure_reason::{FailureReason, FailureReasonInfo},
        order_status::OrderStatus,
        policy::UserRole,
        stats::{DriverStats, OrderStatusCounts},
    },
    dto::{
        addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
        admin::{AdminStats, DriverList, UserList},
        auth::{
            ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, RegisterRequest,
            ResetPasswordRequest, TokenResponse,
        },
        cart::{AddToCartRequest, UpdateCartItemRequest},
        driver::{DriverOrders, FailureReasonList},
        orders::{
            AssignDriverRequest, CheckoutRequest, CheckoutResponse, CustomerOrderList, OrderList,
            UpdateOrderStatusRequest,
        },
        products::{BrandList, CategoryList, CreateProductRequest, ProductList, UpdateProductRequest},
        profile::UpdateProfileRequest,
    },
    models::{
        Address, CartView, Language, Order, OrderWithCustomer, PaymentMethod, Product, User,
        UserSummary,
    },
    response::{ApiResponse, Empty, Meta},
    routes::{
        addresses, admin, auth, cart, driver, health, orders, params, products as product_routes,
        profile,
    },
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
    info(title = "GAZ MAN API", description = "Gas cylinder ordering and delivery"),
    paths(
        health::health_check,
        health::api_root,
        auth::register,
        auth::login,
        auth::me,
        auth::forgot_password,
        auth::reset_password,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::list_categories,
        product_routes::list_brands,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        profile::get_profile,
        profile::update_profile,
        addresses::list_addresses,
        addresses::create_address,
        addresses::get_address,
        addresses::update_address,
        addresses::delete_address,
        addresses::set_default,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::assign_driver,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::list_users,
        admin::list_drivers,
        admin::stats,
        driver::stats,
        driver::list_orders,
        driver::get_order,
        driver::update_order_status,
        driver::failure_reasons
    ),
    components(
        schemas(
            User,
            UserSummary,
            UserRole,
            Language,
            Product,
            ProductCategory,
            ProductSize,
            CategoryInfo,
            LineItem,
            CartView,
            Order,
            OrderStatus,
            OrderWithCustomer,
            PaymentMethod,
            FailureReason,
            FailureReasonInfo,
            Address,
            OrderStatusCounts,
            DriverStats,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            ResetPasswordRequest,
            AddToCartRequest,
            UpdateCartItemRequest,
            CheckoutRequest,
            CheckoutResponse,
            UpdateOrderStatusRequest,
            AssignDriverRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateAddressRequest,
            UpdateAddressRequest,
            UpdateProfileRequest,
            OrderList,
            CustomerOrderList,
            ProductList,
            CategoryList,
            BrandList,
            AddressList,
            UserList,
            DriverList,
            AdminStats,
            DriverOrders,
            FailureReasonList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::UserListQuery,
            Meta,
            Empty,
            health::HealthData,
            health::ApiInfo,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartView>,
            ApiResponse<TokenResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and password reset"),
        (name = "Products", description = "Public catalog"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and the caller's orders"),
        (name = "Profile", description = "Caller's profile"),
        (name = "Addresses", description = "Delivery address book"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Driver", description = "Delivery driver endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_order_lifecycle_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/orders",
            "/api/admin/orders/{id}/status",
            "/api/admin/orders/{id}/assign-driver",
            "/api/driver/orders/{id}/status",
            "/api/driver/failure-reasons",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
