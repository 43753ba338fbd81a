//! Campos del registro de vehículo
//!
//! El conjunto de campos es cerrado y conocido en compilación, así que se
//! modela como un enum en lugar de buscar reglas por reflexión.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::UnknownFieldError;

/// Campo del registro de vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarField {
    Brand,
    Model,
    Color,
    YearManufacture,
    Imported,
    Plates,
    SellingDate,
    SellingPrice,
}

impl CarField {
    /// Todos los campos, en el orden en que se evalúan
    pub const ALL: [CarField; 8] = [
        CarField::Brand,
        CarField::Model,
        CarField::Color,
        CarField::YearManufacture,
        CarField::Imported,
        CarField::Plates,
        CarField::SellingDate,
        CarField::SellingPrice,
    ];

    /// Nombre del campo tal como viaja en el payload
    pub fn as_str(&self) -> &'static str {
        match self {
            CarField::Brand => "brand",
            CarField::Model => "model",
            CarField::Color => "color",
            CarField::YearManufacture => "year_manufacture",
            CarField::Imported => "imported",
            CarField::Plates => "plates",
            CarField::SellingDate => "selling_date",
            CarField::SellingPrice => "selling_price",
        }
    }

    /// Indica si el campo es obligatorio
    pub fn is_required(&self) -> bool {
        !matches!(self, CarField::SellingDate | CarField::SellingPrice)
    }
}

impl fmt::Display for CarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}
