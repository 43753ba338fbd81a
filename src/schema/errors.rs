//! Errores del motor de validación
//!
//! Cada campo reporta, como mucho, una violación: la primera regla que falla.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::fields::CarField;

/// Categoría de la regla violada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Campo obligatorio ausente, nulo o vacío
    Presence,
    /// El valor no se puede convertir al tipo del campo
    Type,
    /// Valor numérico o fecha fuera de sus límites
    Range,
    /// Valor fuera del conjunto permitido
    SetMembership,
    /// Longitud de texto inválida
    Structural,
}

/// Violación de una regla de campo, con su mensaje legible
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn presence(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Presence, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Type, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Range, message)
    }

    pub fn set_membership(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::SetMembership, message)
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Structural, message)
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Fallo de validación de un registro completo
///
/// Solo contiene los campos que fallaron; los válidos quedan fuera del mapa.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} field(s) are invalid", .errors.len())]
pub struct RecordValidationError {
    errors: BTreeMap<CarField, FieldViolation>,
}

impl RecordValidationError {
    pub(crate) fn new(errors: BTreeMap<CarField, FieldViolation>) -> Self {
        Self { errors }
    }

    pub fn get(&self, field: CarField) -> Option<&FieldViolation> {
        self.errors.get(&field)
    }

    /// Mapa campo -> mensaje, listo para mostrar junto a cada input
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, violation)| (field.as_str(), violation.message.clone()))
            .collect()
    }
}

/// Nombre de campo desconocido: fallo del llamador, no un resultado de validación
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field: '{0}'")]
pub struct UnknownFieldError(pub String);
