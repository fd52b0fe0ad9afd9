use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{catalog::ProductCategory, order_status::OrderStatus, policy::UserRole};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<ProductCategory>,
    pub brand: Option<String>,
    /// Case-insensitive substring over name, brand and description.
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// `name`, `price`, `rating`, `created_at`, `stock` or `brand`; prefix with `-` for descending.
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<UserRole>,
}

// Query strings carry numbers as text, which `#[serde(flatten)]` cannot
// decode, so list queries repeat the paging fields.
macro_rules! paged {
    ($($query:ty),+) => {
        $(impl $query {
            pub fn pagination(&self) -> Pagination {
                Pagination::new(self.page, self.per_page)
            }
        })+
    };
}

paged!(ProductQuery, OrderListQuery, UserListQuery);

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusFilter {
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (3, 100, 200));
        let p = Pagination {
            page: Some(-2),
            per_page: Some(0),
        };
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn far_pages_saturate_instead_of_overflowing() {
        let uri: axum::http::Uri = "/api/products?page=9223372036854775807&per_page=100"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<ProductQuery>::try_from_uri(&uri).unwrap();
        let (page, per_page, offset) = query.pagination().normalize();
        assert_eq!(page, i64::MAX);
        assert_eq!(per_page, 100);
        assert_eq!(offset, i64::MAX);
        assert!(offset >= 0);
    }

    #[test]
    fn product_query_parses_from_a_query_string() {
        let uri: axum::http::Uri = "/api/products?page=2&per_page=5&category=refill&sort=-price&min_price=1000"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<ProductQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (2, 5, 5));
        assert_eq!(query.category, Some(ProductCategory::Refill));
        assert_eq!(query.min_price, Some(1000));
        assert_eq!(query.sort.as_deref(), Some("-price"));
    }

    #[test]
    fn order_query_rejects_unknown_status() {
        let uri: axum::http::Uri = "/api/admin/orders?status=shipped".parse().unwrap();
        assert!(axum::extract::Query::<OrderListQuery>::try_from_uri(&uri).is_err());
    }
}
