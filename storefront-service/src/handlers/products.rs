//! Catalog handlers.
//!
//! The public listing only shows available products; the admin listing and
//! the create/update endpoints expose the full catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    /// Case-insensitive search over name, description, and category.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[validate(length(min = 1, message = "Unit must not be empty"))]
    pub unit: String,
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let filter = ProductFilter {
        category: query.category,
        search: query.q,
        only_available: true,
    };
    let products = state.catalog.list_products(&filter).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn admin_list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let filter = ProductFilter {
        category: query.category,
        search: query.q,
        only_available: false,
    };
    let products = state.catalog.list_products(&filter).await?;
    Ok(Json(products))
}

#[instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    if request.price < Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Price must not be negative"
        )));
    }

    let product = state
        .catalog
        .create_product(&CreateProduct {
            name: request.name,
            description: request.description,
            price: request.price,
            unit: request.unit,
            category: request.category,
            is_available: request.is_available,
        })
        .await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, request))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    if let Some(price) = request.price {
        if price < Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Price must not be negative"
            )));
        }
    }
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Product name must not be empty"
            )));
        }
    }

    let product = state
        .catalog
        .update_product(
            id,
            &UpdateProduct {
                name: request.name,
                description: request.description,
                price: request.price,
                unit: request.unit,
                category: request.category,
                is_available: request.is_available,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

    if request.price.is_some() {
        state.notifier.send_price_update().await?;
    }

    Ok(Json(product))
}
