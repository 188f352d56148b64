use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::{Ability, Principal};
use crate::modules::products::models::{CreateProductRequest, UpdateProductRequest};
use crate::modules::products::repositories::{ProductFilter, DEFAULT_PAGE_SIZE};
use crate::modules::products::services::ProductService;

/// Query parameters for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl From<&ListProductsQuery> for ProductFilter {
    fn from(query: &ListProductsQuery) -> Self {
        ProductFilter::new(query.category_id, query.limit, query.offset)
    }
}

/// List products
/// GET /products
pub async fn list_products(
    service: web::Data<Arc<ProductService>>,
    principal: Principal,
    query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::AccessProducts)?;

    let products = service
        .list_products(ProductFilter::from(&query.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(products))
}

/// Create a new product
/// POST /products
pub async fn create_product(
    service: web::Data<Arc<ProductService>>,
    principal: Principal,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::CreateProducts)?;

    let product = service.create_product(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(product))
}

/// Get product by ID
/// GET /products/{id}
pub async fn get_product(
    service: web::Data<Arc<ProductService>>,
    principal: Principal,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::ShowProducts)?;

    let product = service.get_product(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(product))
}

/// Update product
/// PUT /products/{id}
pub async fn update_product(
    service: web::Data<Arc<ProductService>>,
    principal: Principal,
    path: web::Path<i64>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::EditProducts)?;

    let product = service
        .update_product(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(product))
}

/// Delete product
/// DELETE /products/{id}
pub async fn delete_product(
    service: web::Data<Arc<ProductService>>,
    principal: Principal,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::DeleteProducts)?;

    service.delete_product(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
