//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::CarController;
use crate::repositories::CarRepository;
use crate::schema::CarSchema;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub schema: Arc<CarSchema>,
    pub repository: Arc<dyn CarRepository>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        schema: CarSchema,
        repository: Arc<dyn CarRepository>,
    ) -> Self {
        Self {
            config,
            schema: Arc::new(schema),
            repository,
        }
    }

    pub fn car_controller(&self) -> CarController {
        CarController::new(self.schema.clone(), self.repository.clone())
    }
}
