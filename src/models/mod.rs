//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL.

pub mod car;

pub use car::{Car, NewCar};
