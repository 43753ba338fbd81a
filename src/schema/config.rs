//! Configuración del esquema de vehículo
//!
//! Límites que leen las reglas en cada llamada. Los valores por defecto
//! corresponden a la tienda: apertura el 20/03/2020, 13 colores de catálogo.

use chrono::NaiveDate;
use thiserror::Error;

/// Colores permitidos por defecto
pub const DEFAULT_COLORS: [&str; 13] = [
    "AMARELO", "AZUL", "BRANCO", "CINZA", "DOURADO", "LARANJA", "MARROM", "PRATA", "PRETO",
    "ROSA", "ROXO", "VERDE", "VERMELHO",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuración de las reglas del esquema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaConfig {
    pub text_min_len: usize,
    pub text_max_len: usize,
    pub plates_len: usize,
    pub colors: Vec<String>,
    pub min_year_manufacture: i32,
    pub store_opened_on: NaiveDate,
    pub min_selling_price: f64,
    pub max_selling_price: f64,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            text_min_len: 1,
            text_max_len: 25,
            plates_len: 8,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            min_year_manufacture: 1960,
            store_opened_on: NaiveDate::from_ymd_opt(2020, 3, 20)
                .expect("store opening date is a valid calendar date"),
            min_selling_price: 5_000.0,
            max_selling_price: 5_000_000.0,
        }
    }
}

impl SchemaConfig {
    /// Cargar la configuración desde variables de entorno
    ///
    /// - `STORE_OPENED_ON` (YYYY-MM-DD)
    /// - `MIN_YEAR_MANUFACTURE`
    /// - `CAR_COLORS` (lista separada por comas)
    pub fn from_env() -> Result<Self, SchemaConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Igual que `from_env`, con una fuente de variables inyectable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SchemaConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("STORE_OPENED_ON") {
            config.store_opened_on = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| SchemaConfigError::InvalidValue {
                    var: "STORE_OPENED_ON",
                    value,
                })?;
        }

        if let Some(value) = lookup("MIN_YEAR_MANUFACTURE") {
            config.min_year_manufacture =
                value
                    .trim()
                    .parse()
                    .map_err(|_| SchemaConfigError::InvalidValue {
                        var: "MIN_YEAR_MANUFACTURE",
                        value,
                    })?;
        }

        if let Some(value) = lookup("CAR_COLORS") {
            let colors: Vec<String> = value
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if colors.is_empty() {
                return Err(SchemaConfigError::Empty("CAR_COLORS"));
            }
            config.colors = colors;
        }

        Ok(config)
    }
}
