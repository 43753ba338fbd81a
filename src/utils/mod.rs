//! Utilidades del sistema
//!
//! Este módulo contiene utilidades comunes, como el manejo de errores.

pub mod errors;

pub use errors::{AppError, AppResult};
