use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::{Ability, Principal};
use crate::modules::categories::models::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::modules::categories::services::CategoryService;

/// List categories with their product counts
/// GET /categories
pub async fn list_categories(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::AccessCategories)?;

    let categories = service.list_categories().await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// Create a new category
/// POST /categories
pub async fn create_category(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::CreateCategories)?;

    let category = service.create_category(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(category))
}

/// Get category by ID
/// GET /categories/{id}
pub async fn get_category(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::EditCategories)?;

    let category = service.get_category(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(category))
}

/// Update category
/// PUT /categories/{id}
pub async fn update_category(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
    path: web::Path<i64>,
    request: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::EditCategories)?;

    let category = service
        .update_category(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(category))
}

/// Delete category
/// DELETE /categories/{id}
pub async fn delete_category(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::DeleteCategories)?;

    service.delete_category(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Products in a category
/// GET /categories/{id}/products
pub async fn list_category_products(
    service: web::Data<Arc<CategoryService>>,
    principal: Principal,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    principal.authorize(Ability::AccessProducts)?;

    let products = service.category_products(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(products))
}

/// Configure category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category))
            .route("/{id}/products", web::get().to(list_category_products)),
    );
}
