//! Car Registry
//!
//! Motor de validación del registro de vehículos y el servicio HTTP que lo
//! expone (alta, consulta, edición y listado de cars).

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use schema::{CarField, CarSchema, RawRecord, RawValue, RecordValidationError};
pub use state::AppState;
