use std::str::FromStr;

use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    #[sea_orm(string_value = "domestic")]
    Domestic,
    #[sea_orm(string_value = "industrial")]
    Industrial,
    #[sea_orm(string_value = "refill")]
    Refill,
    #[sea_orm(string_value = "rental")]
    Rental,
    #[sea_orm(string_value = "installation")]
    Installation,
    #[sea_orm(string_value = "emergency")]
    Emergency,
}

impl ProductCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Domestic => "Domestic Gas",
            ProductCategory::Industrial => "Industrial Gas",
            ProductCategory::Refill => "Cylinder Refills",
            ProductCategory::Rental => "Cylinder Rentals",
            ProductCategory::Installation => "Installation & Maintenance",
            ProductCategory::Emergency => "Emergency Intervention",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryInfo {
    pub value: ProductCategory,
    pub label: String,
}

pub fn categories() -> Vec<CategoryInfo> {
    ProductCategory::iter()
        .map(|value| CategoryInfo {
            value,
            label: value.label().to_string(),
        })
        .collect()
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ProductSize {
    #[sea_orm(string_value = "small")]
    Small,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "large")]
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    Rating,
    CreatedAt,
    Stock,
    Brand,
}

/// A catalog ordering parsed from `sort=<field>` or `sort=-<field>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            descending: false,
        }
    }
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "name" => SortField::Name,
            "price" => SortField::Price,
            "rating" => SortField::Rating,
            "created_at" => SortField::CreatedAt,
            "stock" => SortField::Stock,
            "brand" => SortField::Brand,
            other => {
                return Err(format!(
                    "Invalid sort field '{other}'. Must be one of: name, price, rating, created_at, stock, brand"
                ));
            }
        };
        Ok(Self { field, descending })
    }
}

/// Build an ILIKE pattern matching `needle` anywhere, with wildcards escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_name_ascending() {
        let sort = ProductSort::default();
        assert_eq!(sort.field, SortField::Name);
        assert!(!sort.descending);
    }

    #[test]
    fn dash_prefix_means_descending() {
        let sort: ProductSort = "-price".parse().unwrap();
        assert_eq!(
            sort,
            ProductSort {
                field: SortField::Price,
                descending: true
            }
        );
        let sort: ProductSort = "rating".parse().unwrap();
        assert_eq!(sort.field, SortField::Rating);
        assert!(!sort.descending);
    }

    #[test]
    fn unknown_sort_field_is_an_error() {
        let err = "-password_hash".parse::<ProductSort>().unwrap_err();
        assert!(err.contains("password_hash"));
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("gas"), "%gas%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn categories_carry_labels() {
        let list = categories();
        assert_eq!(list.len(), 6);
        assert_eq!(list[0].value, ProductCategory::Domestic);
        assert_eq!(list[0].label, "Domestic Gas");
    }

    #[test]
    fn medium_is_the_default_size() {
        assert_eq!(ProductSize::default(), ProductSize::Medium);
    }
}
