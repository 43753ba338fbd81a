//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos y variables de
//! entorno. La configuración de las reglas vive en `schema::config`.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
