use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    errors::ServiceError, services::products::CreateProductWithStock, AppState,
};

/// Price accepted as either a JSON number or a string. The literal text is
/// carried through so the quantizer sees the exact decimal the caller wrote,
/// never an f64 approximation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    fn raw(&self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    /// Product display name
    pub name: String,
    /// Stock keeping unit; normalized (trimmed, upper-cased) before storage
    pub sku: String,
    /// Unit price as decimal text or number
    #[schema(value_type = String, example = "19.99")]
    pub price: PriceInput,
    /// Quantity at or below which low-stock alerts fire (default 10)
    pub reorder_threshold: Option<i32>,
    /// Warehouse to seed initial stock into
    pub warehouse_id: Option<i32>,
    /// Opening quantity; requires warehouse_id
    pub initial_quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateProductResponse {
    pub message: String,
    pub product_id: i32,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_product))
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = CreateProductWithStock {
        name: payload.name,
        sku: payload.sku,
        price: payload.price.raw(),
        reorder_threshold: payload.reorder_threshold,
        warehouse_id: payload.warehouse_id,
        initial_quantity: payload.initial_quantity,
    };

    let product_id = state
        .services
        .products
        .create_product_with_stock(input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created".to_string(),
            product_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_input_preserves_number_literal() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"n","sku":"s","price":19.99}"#).unwrap();
        assert_eq!(req.price.raw(), "19.99");
    }

    #[test]
    fn price_input_accepts_string() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"n","sku":"s","price":"2.675"}"#).unwrap();
        assert_eq!(req.price.raw(), "2.675");
    }
}
