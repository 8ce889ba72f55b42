//! Part inventory endpoints under `/api/v1/parts`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::PartId;
use domain::{Part, PartService};
use part_store::PartStore;
use serde::Deserialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: PartStore> {
    pub part_service: PartService<S>,
}

// -- Request types --

/// Body of `POST /api/v1/parts`.
///
/// Missing and `null` fields are reported as blank field errors rather than
/// as an unreadable body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPartRequest {
    #[serde(default)]
    pub material_number: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub supplier_number: Option<String>,
}

impl AddPartRequest {
    fn into_part_id(self) -> Result<PartId, ApiError> {
        Ok(PartId::parse(
            self.material_number.unwrap_or_default(),
            self.serial_number.unwrap_or_default(),
            self.supplier_number.unwrap_or_default(),
        )?)
    }
}

/// Query string of the quantity adjustment endpoints.
#[derive(Debug, Deserialize)]
pub struct AmountParams {
    pub amount: i64,
}

type IdPath = Result<Path<(String, String, String)>, PathRejection>;

// -- Handlers --

/// GET /api/v1/parts — list every part in the warehouse.
#[tracing::instrument(skip(state))]
pub async fn list<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Part>>, ApiError> {
    let parts = state.part_service.list().await?;
    Ok(Json(parts))
}

/// GET /api/v1/parts/{material}/{serial}/{supplier} — load one part.
#[tracing::instrument(skip(state))]
pub async fn get<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: IdPath,
) -> Result<Json<Part>, ApiError> {
    let id = parse_part_id(path)?;
    let part = state.part_service.get(&id).await?;
    Ok(Json(part))
}

/// POST /api/v1/parts — add a new part with quantity zero.
#[tracing::instrument(skip(state))]
pub async fn add<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<AddPartRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Part>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = req.into_part_id()?;

    let part = state.part_service.add(id).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

/// DELETE /api/v1/parts/{material}/{serial}/{supplier} — delete an empty part.
#[tracing::instrument(skip(state))]
pub async fn delete<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = parse_part_id(path)?;
    state.part_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/parts/{material}/{serial}/{supplier}/add?amount=N — increase quantity.
#[tracing::instrument(skip(state))]
pub async fn increase<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: IdPath,
    params: Result<Query<AmountParams>, QueryRejection>,
) -> Result<Json<Part>, ApiError> {
    let id = parse_part_id(path)?;
    let amount = parse_amount(params)?;
    let part = state.part_service.increase(&id, amount).await?;
    Ok(Json(part))
}

/// PATCH /api/v1/parts/{material}/{serial}/{supplier}/subtract?amount=N — decrease quantity.
#[tracing::instrument(skip(state))]
pub async fn decrease<S: PartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    path: IdPath,
    params: Result<Query<AmountParams>, QueryRejection>,
) -> Result<Json<Part>, ApiError> {
    let id = parse_part_id(path)?;
    let amount = parse_amount(params)?;
    let part = state.part_service.decrease(&id, amount).await?;
    Ok(Json(part))
}

fn parse_part_id(path: IdPath) -> Result<PartId, ApiError> {
    let Path((material, serial, supplier)) =
        path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(PartId::parse(material, serial, supplier)?)
}

fn parse_amount(params: Result<Query<AmountParams>, QueryRejection>) -> Result<i64, ApiError> {
    let Query(params) = params.map_err(|e| {
        ApiError::BadRequest(format!(
            "Request parameter 'amount' is missing or not an integer: {}",
            e.body_text()
        ))
    })?;
    Ok(params.amount)
}
