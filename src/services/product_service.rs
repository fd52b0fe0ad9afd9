use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    audit::record,
    domain::catalog::{self, ProductSort, SortField},
    dto::products::{BrandList, CategoryList, CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        Products,
        products::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Empty, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let sort = match query.sort.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw.parse::<ProductSort>().map_err(AppError::BadRequest)?,
        None => ProductSort::default(),
    };

    let mut condition = Condition::all();
    if let Some(category) = query.category {
        condition = condition.add(Column::Category.eq(category));
    }
    if let Some(brand) = query.brand.as_ref().filter(|b| !b.is_empty()) {
        condition = condition.add(Column::Brand.eq(brand.as_str()));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.trim().is_empty()) {
        let pattern = catalog::contains_pattern(search.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Brand).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_col = match sort.field {
        SortField::Name => Column::Name,
        SortField::Price => Column::Price,
        SortField::Rating => Column::Rating,
        SortField::CreatedAt => Column::CreatedAt,
        SortField::Stock => Column::Stock,
        SortField::Brand => Column::Brand,
    };

    let mut finder = Products::find().filter(condition);
    finder = if sort.descending {
        finder.order_by_desc(sort_col)
    } else {
        finder.order_by_asc(sort_col)
    };
    finder = finder.order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from)
        .ok_or(AppError::NotFound("Product"))?;
    Ok(ApiResponse::success("Product", product, Some(Meta::empty())))
}

pub fn list_categories() -> ApiResponse<CategoryList> {
    ApiResponse::success(
        "Categories",
        CategoryList {
            categories: catalog::categories(),
        },
        Some(Meta::empty()),
    )
}

pub async fn list_brands(state: &AppState) -> AppResult<ApiResponse<BrandList>> {
    let brands: Vec<String> = Products::find()
        .select_only()
        .column(Column::Brand)
        .distinct()
        .order_by_asc(Column::Brand)
        .into_tuple()
        .all(&state.orm)
        .await?;
    Ok(ApiResponse::success("Brands", BrandList { brands }, Some(Meta::empty())))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        brand: Set(payload.brand.trim().to_string()),
        category: Set(payload.category),
        size: Set(payload.size),
        capacity: Set(payload.capacity),
        price: Set(payload.price),
        stock: Set(payload.stock),
        image_url: Set(payload.image_url),
        description: Set(payload.description),
        rating: Set(payload.rating.unwrap_or(4.5)),
        delivery_time: Set(payload
            .delivery_time
            .unwrap_or_else(|| "15-20 min".to_string())),
        created_at: Set(Utc::now().into()),
    };
    let product = active.insert(&state.orm).await.map_err(duplicate_name)?;

    record(
        &state.orm,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand.trim().to_string());
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(size) = payload.size {
        active.size = Set(size);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(delivery_time) = payload.delivery_time {
        active.delivery_time = Set(delivery_time);
    }

    let product = active.update(&state.orm).await.map_err(duplicate_name)?;

    record(
        &state.orm,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Orders keep their own line snapshots, so deleting a product never touches them.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Empty>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product"));
    }

    record(
        &state.orm,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Deleted"))
}

fn duplicate_name(err: sea_orm::DbErr) -> AppError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A product with this name already exists".into())
        }
        _ => AppError::OrmError(err),
    }
}
