use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::Car;
use crate::schema::{RawValue, ViolationKind};

// Request para validar un campo aislado (onBlur del formulario)
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateFieldRequest {
    #[validate(length(min = 1, max = 64))]
    pub field: String,

    #[serde(default)]
    pub value: RawValue,
}

// Response de validación de un campo
#[derive(Debug, Serialize)]
pub struct ValidateFieldResponse {
    pub field: String,
    pub valid: bool,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ViolationKind>,
}

// Filtros de paginación para el listado
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListCarsQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

impl ListCarsQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

// Response de car
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year_manufacture: i32,
    pub imported: bool,
    pub plates: String,
    pub selling_date: Option<DateTime<Utc>>,
    pub selling_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            brand: car.brand,
            model: car.model,
            color: car.color,
            year_manufacture: car.year_manufacture,
            imported: car.imported,
            plates: car.plates,
            selling_date: car.selling_date,
            selling_price: car.selling_price,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
