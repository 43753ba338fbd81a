//! Repositorio en memoria
//!
//! Se usa cuando no hay DATABASE_URL configurada y en los tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::car_repository::CarRepository;
use crate::models::car::{Car, NewCar};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

#[derive(Clone, Default)]
pub struct InMemoryCarRepository {
    cars: Arc<RwLock<HashMap<Uuid, Car>>>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn create(&self, car: NewCar) -> AppResult<Car> {
        let mut cars = self.cars.write().await;
        if plates_taken(&cars, &car.plates, None) {
            return Err(conflict_error("Car", "plates", &car.plates));
        }

        let car = Car::from_new(Uuid::new_v4(), car, Utc::now());
        cars.insert(car.id, car.clone());
        Ok(car)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.cars.read().await.get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Car>> {
        let cars = self.cars.read().await;
        let mut all: Vec<Car> = cars.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, id: Uuid, car: NewCar) -> AppResult<Car> {
        let mut cars = self.cars.write().await;
        if !cars.contains_key(&id) {
            return Err(not_found_error("Car", &id.to_string()));
        }
        if plates_taken(&cars, &car.plates, Some(id)) {
            return Err(conflict_error("Car", "plates", &car.plates));
        }

        let current = cars
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        current.apply(car, Utc::now());
        Ok(current.clone())
    }

    async fn plates_exist(&self, plates: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let cars = self.cars.read().await;
        Ok(plates_taken(&cars, plates, exclude))
    }
}

/// La comprobación y la escritura comparten el mismo guard
fn plates_taken(cars: &HashMap<Uuid, Car>, plates: &str, exclude: Option<Uuid>) -> bool {
    cars.values()
        .any(|car| car.plates == plates && Some(car.id) != exclude)
}
