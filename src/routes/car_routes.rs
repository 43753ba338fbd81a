use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::car_dto::{
    ApiResponse, CarResponse, ListCarsQuery, ValidateFieldRequest, ValidateFieldResponse,
};
use crate::schema::RawRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_car).get(list_cars))
        .route("/validate", post(validate_field))
        .route("/:id", get(get_car).put(update_car))
}

async fn create_car(
    State(state): State<AppState>,
    Json(raw): Json<RawRecord>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let response = state.car_controller().create(raw).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<ListCarsQuery>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let response = state.car_controller().list(query).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let response = state.car_controller().get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(raw): Json<RawRecord>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let response = state.car_controller().update(id, raw).await?;
    Ok(Json(response))
}

async fn validate_field(
    State(state): State<AppState>,
    Json(request): Json<ValidateFieldRequest>,
) -> Result<Json<ValidateFieldResponse>, AppError> {
    let response = state.car_controller().validate_field(request)?;
    Ok(Json(response))
}
