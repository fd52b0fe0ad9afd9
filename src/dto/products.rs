use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::catalog::{CategoryInfo, ProductCategory, ProductSize},
    error::AppError,
    models::Product,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    pub category: ProductCategory,
    pub size: ProductSize,
    pub capacity: String,
    pub price: i64,
    pub stock: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    pub rating: Option<f64>,
    pub delivery_time: Option<String>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        require_text("brand", &self.brand)?;
        require_text("capacity", &self.capacity)?;
        check_price(self.price)?;
        check_stock(self.stock)?;
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }
}

/// Partial update; only the listed fields can be changed.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<ProductCategory>,
    pub size: Option<ProductSize>,
    pub capacity: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub delivery_time: Option<String>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.size.is_none()
            && self.capacity.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
            && self.description.is_none()
            && self.rating.is_none()
            && self.delivery_time.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(brand) = &self.brand {
            require_text("brand", brand)?;
        }
        if let Some(capacity) = &self.capacity {
            require_text("capacity", capacity)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(stock) = self.stock {
            check_stock(stock)?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Highest unit price (XAF) accepted for a catalog item.
pub const MAX_PRICE: i64 = 100_000_000;

fn check_price(price: i64) -> Result<(), AppError> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(AppError::BadRequest(format!(
            "price must be between 0 and {MAX_PRICE}"
        )));
    }
    Ok(())
}

fn check_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}

fn check_rating(rating: f64) -> Result<(), AppError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(AppError::BadRequest("rating must be between 0 and 5".into()));
    }
    Ok(())
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Serialize, ToSchema)]
pub struct BrandList {
    pub brands: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_rejected() {
        let err = UpdateProductRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");
    }

    #[test]
    fn update_checks_each_provided_field() {
        let update = UpdateProductRequest {
            price: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateProductRequest {
            price: Some(MAX_PRICE + 1),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateProductRequest {
            rating: Some(5.5),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateProductRequest {
            stock: Some(12),
            description: Some("Bouteille 12,5 kg".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_not_merged() {
        let parsed: Result<UpdateProductRequest, _> =
            serde_json::from_str(r#"{"price": 7000, "owner": "someone"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn create_requires_names() {
        let request = CreateProductRequest {
            name: "  ".into(),
            brand: "Tradex".into(),
            category: ProductCategory::Domestic,
            size: ProductSize::Medium,
            capacity: "12.5kg".into(),
            price: 6500,
            stock: 10,
            image_url: String::new(),
            description: String::new(),
            rating: None,
            delivery_time: None,
        };
        assert_eq!(request.validate().unwrap_err().to_string(), "name must not be empty");
    }
}
