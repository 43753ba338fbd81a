//! Valores crudos de entrada
//!
//! Lo que llega del formulario o del payload JSON antes de cualquier
//! coerción: texto, números, booleanos, fechas o null.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::CarField;

/// Valor crudo de un campo
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(DateTime<Utc>),
    /// Arrays u objetos JSON: nunca válidos para ningún campo
    Unsupported(&'static str),
}

impl RawValue {
    /// Nombre del tipo, para mensajes de error
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) | RawValue::Float(_) => "number",
            RawValue::Text(_) => "string",
            RawValue::Date(_) => "date",
            RawValue::Unsupported(kind) => *kind,
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else {
                    // u64 > i64::MAX o decimales
                    n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Unsupported("number"))
                }
            }
            Value::String(s) => RawValue::Text(s),
            Value::Array(_) => RawValue::Unsupported("array"),
            Value::Object(_) => RawValue::Unsupported("object"),
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawValue::from)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value.into())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::Date(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        value
            .and_hms_opt(0, 0, 0)
            .map(|midnight| RawValue::Date(midnight.and_utc()))
            .unwrap_or(RawValue::Null)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

/// Registro crudo: nombre de campo -> valor. Una clave ausente significa
/// "todavía no informado".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, RawValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: añade un campo y devuelve el registro
    pub fn with(mut self, field: CarField, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Builder: elimina un campo y devuelve el registro
    pub fn without(mut self, field: CarField) -> Self {
        self.remove(field);
        self
    }

    pub fn insert(&mut self, field: CarField, value: impl Into<RawValue>) {
        self.0.insert(field.as_str().to_string(), value.into());
    }

    pub fn remove(&mut self, field: CarField) -> Option<RawValue> {
        self.0.remove(field.as_str())
    }

    pub fn get(&self, field: CarField) -> Option<&RawValue> {
        self.0.get(field.as_str())
    }
}

impl From<serde_json::Map<String, Value>> for RawRecord {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_values() {
        assert_eq!(RawValue::from(json!(null)), RawValue::Null);
        assert_eq!(RawValue::from(json!(true)), RawValue::Bool(true));
        assert_eq!(RawValue::from(json!(2021)), RawValue::Int(2021));
        assert_eq!(RawValue::from(json!(5000.5)), RawValue::Float(5000.5));
        assert_eq!(RawValue::from(json!("AZUL")), RawValue::Text("AZUL".into()));
        assert_eq!(RawValue::from(json!([1, 2])), RawValue::Unsupported("array"));
        assert_eq!(RawValue::from(json!({"a": 1})), RawValue::Unsupported("object"));
    }

    #[test]
    fn test_deserialize_record() {
        let record: RawRecord = serde_json::from_value(json!({
            "brand": "Fiat",
            "year_manufacture": "2021",
            "selling_date": null
        }))
        .unwrap();

        assert_eq!(record.get(CarField::Brand), Some(&RawValue::Text("Fiat".into())));
        assert_eq!(record.get(CarField::YearManufacture), Some(&RawValue::Text("2021".into())));
        assert_eq!(record.get(CarField::SellingDate), Some(&RawValue::Null));
        assert_eq!(record.get(CarField::Plates), None);
    }

    #[test]
    fn test_option_into_raw_value() {
        assert_eq!(RawValue::from(None::<f64>), RawValue::Null);
        assert_eq!(RawValue::from(Some(7000.0)), RawValue::Float(7000.0));
    }
}
