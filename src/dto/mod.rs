//! DTOs de la API
//!
//! Envoltorios de request/response que viajan por HTTP.

pub mod car_dto;
