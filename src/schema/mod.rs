//! Motor de validación del registro de vehículo
//!
//! Dos modos de evaluación sobre las mismas reglas:
//!
//! - `validate_field`: un solo campo, aislado del resto (validación al
//!   editar o al salir de un input).
//! - `validate_record`: el registro completo; evalúa todos los campos y
//!   devuelve el registro normalizado o el mapa campo -> mensaje.
//!
//! Cada regla de campo es una cadena presencia -> coerción -> longitud,
//! rango o conjunto, y se detiene en el primer fallo. Los límites dinámicos
//! (año actual, instante actual) salen del `now` de cada llamada.

pub mod config;
pub mod errors;
pub mod fields;
pub mod rules;
pub mod value;

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;

use crate::models::car::NewCar;

pub use config::SchemaConfig;
pub use errors::{FieldViolation, RecordValidationError, UnknownFieldError, ViolationKind};
pub use fields::CarField;
pub use value::{RawRecord, RawValue};

use rules::Bound;

/// Valor de un campo que no viene en el registro crudo
static ABSENT: RawValue = RawValue::Null;

/// Esquema del vehículo. Sin estado mutable: se puede compartir entre hilos.
#[derive(Debug, Clone, Default)]
pub struct CarSchema {
    config: SchemaConfig,
}

impl CarSchema {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// Validar un campo aislado con el reloj real
    pub fn validate_field(&self, field: CarField, value: &RawValue) -> Option<FieldViolation> {
        self.validate_field_at(field, value, Utc::now())
    }

    /// Validar un campo aislado con un instante dado
    ///
    /// Devuelve `None` si el valor cumple todas las reglas del campo.
    pub fn validate_field_at(
        &self,
        field: CarField,
        value: &RawValue,
        now: DateTime<Utc>,
    ) -> Option<FieldViolation> {
        let outcome = match field {
            CarField::Brand | CarField::Model => self.text_field(field, value).map(drop),
            CarField::Color => self.color(value).map(drop),
            CarField::YearManufacture => self.year_manufacture(value, now).map(drop),
            CarField::Imported => self.imported(value).map(drop),
            CarField::Plates => self.plates(value).map(drop),
            CarField::SellingDate => self.selling_date(value, now).map(drop),
            CarField::SellingPrice => self.selling_price(value).map(drop),
        };
        outcome.err()
    }

    /// Validar un campo a partir de su nombre en el payload
    pub fn validate_field_named(
        &self,
        name: &str,
        value: &RawValue,
    ) -> Result<Option<FieldViolation>, UnknownFieldError> {
        let field: CarField = name.parse()?;
        Ok(self.validate_field(field, value))
    }

    /// Validar el registro completo con el reloj real
    pub fn validate_record(&self, raw: &RawRecord) -> Result<NewCar, RecordValidationError> {
        self.validate_record_at(raw, Utc::now())
    }

    /// Validar el registro completo con un instante dado
    ///
    /// Todos los campos se evalúan, aunque alguno falle, para devolver el
    /// conjunto completo de errores en una sola pasada.
    pub fn validate_record_at(
        &self,
        raw: &RawRecord,
        now: DateTime<Utc>,
    ) -> Result<NewCar, RecordValidationError> {
        let mut errors = BTreeMap::new();
        let value_of = |field: CarField| raw.get(field).unwrap_or(&ABSENT);

        let brand = collect(&mut errors, CarField::Brand, self.text_field(CarField::Brand, value_of(CarField::Brand)));
        let model = collect(&mut errors, CarField::Model, self.text_field(CarField::Model, value_of(CarField::Model)));
        let color = collect(&mut errors, CarField::Color, self.color(value_of(CarField::Color)));
        let year_manufacture = collect(
            &mut errors,
            CarField::YearManufacture,
            self.year_manufacture(value_of(CarField::YearManufacture), now),
        );
        let imported = collect(&mut errors, CarField::Imported, self.imported(value_of(CarField::Imported)));
        let plates = collect(&mut errors, CarField::Plates, self.plates(value_of(CarField::Plates)));
        let selling_date = collect(
            &mut errors,
            CarField::SellingDate,
            self.selling_date(value_of(CarField::SellingDate), now),
        );
        let selling_price = collect(
            &mut errors,
            CarField::SellingPrice,
            self.selling_price(value_of(CarField::SellingPrice)),
        );

        match (
            brand,
            model,
            color,
            year_manufacture,
            imported,
            plates,
            selling_date,
            selling_price,
        ) {
            (
                Some(brand),
                Some(model),
                Some(color),
                Some(year_manufacture),
                Some(imported),
                Some(plates),
                Some(selling_date),
                Some(selling_price),
            ) if errors.is_empty() => Ok(NewCar {
                brand,
                model,
                color,
                year_manufacture,
                imported,
                plates,
                selling_date,
                selling_price,
            }),
            _ => Err(RecordValidationError::new(errors)),
        }
    }

    // Reglas por campo. Las obligatorias devuelven el valor; las opcionales,
    // `None` cuando no se informan.

    fn text_field(&self, field: CarField, value: &RawValue) -> Result<String, FieldViolation> {
        let label = label(field);
        let text = present(field, rules::coerce_text(value, label)?)?;
        let (min, max) = (self.config.text_min_len, self.config.text_max_len);

        match rules::check_length(&text, min, max) {
            Ok(()) => Ok(text),
            Err(Bound::Below) => Err(FieldViolation::structural(format!(
                "{} must have at least {} character(s).",
                label, min
            ))),
            Err(Bound::Above) => Err(FieldViolation::structural(format!(
                "{} can have at most {} characters.",
                label, max
            ))),
        }
    }

    fn color(&self, value: &RawValue) -> Result<String, FieldViolation> {
        let color = present(CarField::Color, rules::coerce_text(value, label(CarField::Color))?)?;

        if rules::check_member(&color, &self.config.colors) {
            Ok(color)
        } else {
            Err(FieldViolation::set_membership(format!(
                "Invalid color. Must be one of the predefined options: {}.",
                self.config.colors.join(", ")
            )))
        }
    }

    fn year_manufacture(&self, value: &RawValue, now: DateTime<Utc>) -> Result<i32, FieldViolation> {
        let label = label(CarField::YearManufacture);
        let year = present(CarField::YearManufacture, rules::coerce_integer(value, label)?)?;
        let (min, max) = (self.config.min_year_manufacture, now.year());

        match rules::check_range(year, min, max) {
            Ok(()) => Ok(year),
            Err(Bound::Below) => Err(FieldViolation::range(format!(
                "{} cannot be earlier than {}.",
                label, min
            ))),
            Err(Bound::Above) => Err(FieldViolation::range(format!(
                "{} cannot be later than {}.",
                label, max
            ))),
        }
    }

    fn imported(&self, value: &RawValue) -> Result<bool, FieldViolation> {
        let label = label(CarField::Imported);
        present(CarField::Imported, rules::coerce_bool(value, label)?)
    }

    fn plates(&self, value: &RawValue) -> Result<String, FieldViolation> {
        let label = label(CarField::Plates);
        let plates = present(CarField::Plates, rules::coerce_text(value, label)?)?;
        let len = self.config.plates_len;

        if rules::check_length(&plates, len, len).is_ok() {
            Ok(plates)
        } else {
            Err(FieldViolation::structural(format!(
                "{} must have exactly {} characters.",
                label, len
            )))
        }
    }

    fn selling_date(
        &self,
        value: &RawValue,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, FieldViolation> {
        let label = label(CarField::SellingDate);
        let Some(date) = rules::coerce_date(value, label)? else {
            return Ok(None);
        };
        let opened_on = self.config.store_opened_on;
        let min = opened_on
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        match rules::check_range(date, min, now) {
            Ok(()) => Ok(Some(date)),
            Err(Bound::Below) => Err(FieldViolation::range(format!(
                "{} cannot be earlier than the store opening ({}).",
                label,
                opened_on.format("%Y-%m-%d")
            ))),
            Err(Bound::Above) => Err(FieldViolation::range(format!(
                "{} cannot be later than the current date.",
                label
            ))),
        }
    }

    fn selling_price(&self, value: &RawValue) -> Result<Option<f64>, FieldViolation> {
        let label = label(CarField::SellingPrice);
        let Some(price) = rules::coerce_float(value, label)? else {
            return Ok(None);
        };
        let (min, max) = (self.config.min_selling_price, self.config.max_selling_price);

        match rules::check_range(price, min, max) {
            Ok(()) => Ok(Some(price)),
            Err(Bound::Below) => Err(FieldViolation::range(format!(
                "{} must be at least {:.2}.",
                label, min
            ))),
            Err(Bound::Above) => Err(FieldViolation::range(format!(
                "{} must be at most {:.2}.",
                label, max
            ))),
        }
    }
}

/// Etiqueta legible del campo para los mensajes
fn label(field: CarField) -> &'static str {
    match field {
        CarField::Brand => "Brand",
        CarField::Model => "Model",
        CarField::Color => "Color",
        CarField::YearManufacture => "Manufacture year",
        CarField::Imported => "Imported",
        CarField::Plates => "Plates",
        CarField::SellingDate => "Selling date",
        CarField::SellingPrice => "Selling price",
    }
}

/// Presencia de un campo obligatorio
fn present<T>(field: CarField, value: Option<T>) -> Result<T, FieldViolation> {
    value.ok_or_else(|| FieldViolation::presence(format!("{} is required.", label(field))))
}

/// Guarda el error del campo, si lo hay, y devuelve el valor en caso de éxito
fn collect<T>(
    errors: &mut BTreeMap<CarField, FieldViolation>,
    field: CarField,
    outcome: Result<T, FieldViolation>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(violation) => {
            errors.insert(field, violation);
            None
        }
    }
}
