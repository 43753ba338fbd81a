//! Primitivas de validación
//!
//! Coerción de valores crudos al tipo semántico de cada campo y
//! comprobaciones de longitud, rango y pertenencia. Las primitivas de
//! coerción devuelven `Ok(None)` cuando el valor está ausente (null o texto
//! vacío); la política obligatorio/opcional la decide el esquema.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::errors::FieldViolation;
use super::value::RawValue;

/// Lado del límite que se ha violado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Below,
    Above,
}

/// Texto: se recorta; vacío tras el recorte equivale a ausente
pub fn coerce_text(value: &RawValue, label: &str) -> Result<Option<String>, FieldViolation> {
    match value {
        RawValue::Null => Ok(None),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        other => Err(FieldViolation::type_mismatch(format!(
            "{} must be text, got {}.",
            label,
            other.type_name()
        ))),
    }
}

/// Entero: acepta enteros, flotantes sin parte decimal y cadenas numéricas
pub fn coerce_integer(value: &RawValue, label: &str) -> Result<Option<i32>, FieldViolation> {
    let not_a_number = || FieldViolation::type_mismatch(format!("{} must be a number.", label));
    let not_an_integer = || FieldViolation::type_mismatch(format!("{} must be an integer.", label));

    let number = match value {
        RawValue::Null => return Ok(None),
        RawValue::Int(i) => return i32::try_from(*i).map(Some).map_err(|_| not_a_number()),
        RawValue::Float(f) => *f,
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return i32::try_from(i).map(Some).map_err(|_| not_a_number());
            }
            trimmed.parse::<f64>().map_err(|_| not_a_number())?
        }
        _ => return Err(not_a_number()),
    };

    if !number.is_finite() {
        return Err(not_a_number());
    }
    if number.fract() != 0.0 {
        return Err(not_an_integer());
    }
    if number < i32::MIN as f64 || number > i32::MAX as f64 {
        return Err(not_a_number());
    }
    Ok(Some(number as i32))
}

/// Flotante: acepta números y cadenas numéricas finitas
pub fn coerce_float(value: &RawValue, label: &str) -> Result<Option<f64>, FieldViolation> {
    let not_a_number = || FieldViolation::type_mismatch(format!("{} must be a number.", label));

    let number = match value {
        RawValue::Null => return Ok(None),
        RawValue::Int(i) => *i as f64,
        RawValue::Float(f) => *f,
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map_err(|_| not_a_number())?
        }
        _ => return Err(not_a_number()),
    };

    if !number.is_finite() {
        return Err(not_a_number());
    }
    Ok(Some(number))
}

/// Fecha: acepta fechas y cadenas ISO-8601
pub fn coerce_date(value: &RawValue, label: &str) -> Result<Option<DateTime<Utc>>, FieldViolation> {
    match value {
        RawValue::Null => Ok(None),
        RawValue::Date(date) => Ok(Some(*date)),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_date(trimmed).map(Some).ok_or_else(|| {
                FieldViolation::type_mismatch(format!("{} must be a valid date.", label))
            })
        }
        _ => Err(FieldViolation::type_mismatch(format!(
            "{} must be a valid date.",
            label
        ))),
    }
}

/// Booleano: solo `true` o `false`, sin interpretar cadenas
pub fn coerce_bool(value: &RawValue, label: &str) -> Result<Option<bool>, FieldViolation> {
    match value {
        RawValue::Null => Ok(None),
        RawValue::Bool(b) => Ok(Some(*b)),
        _ => Err(FieldViolation::type_mismatch(format!(
            "{} must be true or false.",
            label
        ))),
    }
}

/// Interpretar una cadena ISO-8601 como instante UTC
///
/// Formatos aceptados: RFC 3339, fecha y hora sin zona (UTC) y fecha sola
/// (medianoche UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Longitud en caracteres dentro de `[min, max]`
pub fn check_length(value: &str, min: usize, max: usize) -> Result<(), Bound> {
    check_range(value.chars().count(), min, max)
}

/// Valor dentro de `[min, max]`, ambos incluidos
pub fn check_range<T: PartialOrd>(value: T, min: T, max: T) -> Result<(), Bound> {
    if value < min {
        Err(Bound::Below)
    } else if value > max {
        Err(Bound::Above)
    } else {
        Ok(())
    }
}

/// Pertenencia exacta a la lista de valores permitidos
pub fn check_member(value: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|candidate| candidate == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::ViolationKind;
    use chrono::TimeZone;

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&"  Fiat ".into(), "Brand").unwrap(), Some("Fiat".to_string()));
        assert_eq!(coerce_text(&"   ".into(), "Brand").unwrap(), None);
        assert_eq!(coerce_text(&RawValue::Null, "Brand").unwrap(), None);

        let err = coerce_text(&RawValue::Int(3), "Brand").unwrap_err();
        assert_eq!(err.kind, ViolationKind::Type);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&RawValue::Int(2021), "Year").unwrap(), Some(2021));
        assert_eq!(coerce_integer(&"2021".into(), "Year").unwrap(), Some(2021));
        assert_eq!(coerce_integer(&" 2021.0 ".into(), "Year").unwrap(), Some(2021));
        assert_eq!(coerce_integer(&RawValue::Float(1999.0), "Year").unwrap(), Some(1999));
        assert_eq!(coerce_integer(&"".into(), "Year").unwrap(), None);

        let fractional = coerce_integer(&RawValue::Float(2020.5), "Year").unwrap_err();
        assert_eq!(fractional.kind, ViolationKind::Type);
        assert!(fractional.message.contains("integer"));

        for bad in [
            RawValue::from("abc"),
            RawValue::from("NaN"),
            RawValue::from("inf"),
            RawValue::Int(i64::MAX),
            RawValue::Bool(true),
        ] {
            let err = coerce_integer(&bad, "Year").unwrap_err();
            assert_eq!(err.kind, ViolationKind::Type, "{:?}", bad);
        }
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_float(&RawValue::Int(5000), "Price").unwrap(), Some(5000.0));
        assert_eq!(coerce_float(&"12500.75".into(), "Price").unwrap(), Some(12500.75));
        assert_eq!(coerce_float(&" ".into(), "Price").unwrap(), None);
        assert!(coerce_float(&"12,5".into(), "Price").is_err());
        assert!(coerce_float(&"infinity".into(), "Price").is_err());
    }

    #[test]
    fn test_coerce_date() {
        let expected = Utc.with_ymd_and_hms(2021, 5, 10, 0, 0, 0).unwrap();
        assert_eq!(coerce_date(&"2021-05-10".into(), "Date").unwrap(), Some(expected));
        assert_eq!(coerce_date(&"2021-05-10T00:00:00Z".into(), "Date").unwrap(), Some(expected));
        assert_eq!(coerce_date(&"2021-05-10T03:00:00+03:00".into(), "Date").unwrap(), Some(expected));
        assert_eq!(coerce_date(&"2021-05-10T00:00:00.000".into(), "Date").unwrap(), Some(expected));
        assert_eq!(coerce_date(&RawValue::Date(expected), "Date").unwrap(), Some(expected));

        assert!(coerce_date(&"10/05/2021".into(), "Date").is_err());
        assert!(coerce_date(&RawValue::Int(1620604800000), "Date").is_err());
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_bool(&RawValue::Bool(false), "Imported").unwrap(), Some(false));
        assert_eq!(coerce_bool(&RawValue::Null, "Imported").unwrap(), None);
        assert!(coerce_bool(&"true".into(), "Imported").is_err());
        assert!(coerce_bool(&RawValue::Int(1), "Imported").is_err());
    }

    #[test]
    fn test_check_length() {
        assert!(check_length("test", 1, 10).is_ok());
        assert_eq!(check_length("test", 5, 10), Err(Bound::Below));
        assert_eq!(check_length("test", 1, 3), Err(Bound::Above));
        // caracteres, no bytes
        assert!(check_length("Citroën", 7, 7).is_ok());
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(5, 1, 10).is_ok());
        assert!(check_range(1, 1, 10).is_ok());
        assert!(check_range(10, 1, 10).is_ok());
        assert_eq!(check_range(0, 1, 10), Err(Bound::Below));
        assert_eq!(check_range(15, 1, 10), Err(Bound::Above));
    }

    #[test]
    fn test_check_member() {
        let allowed = vec!["AZUL".to_string(), "PRETO".to_string()];
        assert!(check_member("AZUL", &allowed));
        assert!(!check_member("azul", &allowed));
        assert!(!check_member("BEGE", &allowed));
    }
}
