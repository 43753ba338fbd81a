//! Modelo de Car
//!
//! `NewCar` es el registro normalizado que produce el esquema; `Car` es el
//! registro persistido, que mapea a la tabla `cars`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::schema::{CarField, RawRecord};

/// Registro normalizado, ya validado y con tipos coercionados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year_manufacture: i32,
    pub imported: bool,
    pub plates: String,
    pub selling_date: Option<DateTime<Utc>>,
    pub selling_price: Option<f64>,
}

/// Car persistido - mapea exactamente a la tabla cars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Car {
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

impl Car {
    /// Crear un car nuevo a partir de un registro validado
    pub fn from_new(id: Uuid, car: NewCar, now: DateTime<Utc>) -> Self {
        Self {
            id,
            brand: car.brand,
            model: car.model,
            color: car.color,
            year_manufacture: car.year_manufacture,
            imported: car.imported,
            plates: car.plates,
            selling_date: car.selling_date,
            selling_price: car.selling_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sustituir los campos del registro manteniendo id y created_at
    pub fn apply(&mut self, car: NewCar, now: DateTime<Utc>) {
        self.brand = car.brand;
        self.model = car.model;
        self.color = car.color;
        self.year_manufacture = car.year_manufacture;
        self.imported = car.imported;
        self.plates = car.plates;
        self.selling_date = car.selling_date;
        self.selling_price = car.selling_price;
        self.updated_at = now;
    }
}

impl From<&NewCar> for RawRecord {
    fn from(car: &NewCar) -> Self {
        RawRecord::new()
            .with(CarField::Brand, car.brand.as_str())
            .with(CarField::Model, car.model.as_str())
            .with(CarField::Color, car.color.as_str())
            .with(CarField::YearManufacture, car.year_manufacture)
            .with(CarField::Imported, car.imported)
            .with(CarField::Plates, car.plates.as_str())
            .with(CarField::SellingDate, car.selling_date)
            .with(CarField::SellingPrice, car.selling_price)
    }
}

impl From<Car> for NewCar {
    fn from(car: Car) -> Self {
        Self {
            brand: car.brand,
            model: car.model,
            color: car.color,
            year_manufacture: car.year_manufacture,
            imported: car.imported,
            plates: car.plates,
            selling_date: car.selling_date,
            selling_price: car.selling_price,
        }
    }
}
