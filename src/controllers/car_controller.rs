use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{
    ApiResponse, CarResponse, ListCarsQuery, ValidateFieldRequest, ValidateFieldResponse,
};
use crate::repositories::CarRepository;
use crate::schema::{CarSchema, RawRecord};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct CarController {
    schema: Arc<CarSchema>,
    repository: Arc<dyn CarRepository>,
}

impl CarController {
    pub fn new(schema: Arc<CarSchema>, repository: Arc<dyn CarRepository>) -> Self {
        Self { schema, repository }
    }

    pub async fn create(&self, raw: RawRecord) -> AppResult<ApiResponse<CarResponse>> {
        let car = self.schema.validate_record(&raw)?;

        // Verificar que la placa no exista; el repositorio lo vuelve a comprobar al escribir
        if self.repository.plates_exist(&car.plates, None).await? {
            return Err(conflict_error("Car", "plates", &car.plates));
        }

        let car = self.repository.create(car).await?;
        info!("🚗 Car {} creado ({} {})", car.id, car.brand, car.model);

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Car saved successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarResponse> {
        let car = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        Ok(CarResponse::from(car))
    }

    pub async fn list(&self, query: ListCarsQuery) -> AppResult<Vec<CarResponse>> {
        query.validate()?;

        let cars = self.repository.list(query.limit(), query.offset()).await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        raw: RawRecord,
    ) -> AppResult<ApiResponse<CarResponse>> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Car", &id.to_string()));
        }

        let car = self.schema.validate_record(&raw)?;

        if self.repository.plates_exist(&car.plates, Some(id)).await? {
            return Err(conflict_error("Car", "plates", &car.plates));
        }

        let car = self.repository.update(id, car).await?;
        info!("✏️ Car {} actualizado", car.id);

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Car updated successfully".to_string(),
        ))
    }

    /// Validación de un solo campo, sin tocar la persistencia
    pub fn validate_field(
        &self,
        request: ValidateFieldRequest,
    ) -> AppResult<ValidateFieldResponse> {
        request.validate()?;

        let violation = self
            .schema
            .validate_field_named(&request.field, &request.value)
            .map_err(|e| {
                warn!("⚠️ Campo desconocido en validación: {}", request.field);
                AppError::from(e)
            })?;

        Ok(ValidateFieldResponse {
            field: request.field,
            valid: violation.is_none(),
            kind: violation.as_ref().map(|v| v.kind),
            message: violation.map(|v| v.message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryCarRepository;
    use crate::schema::{CarField, RawValue};

    fn controller() -> CarController {
        CarController::new(
            Arc::new(CarSchema::default()),
            Arc::new(InMemoryCarRepository::new()),
        )
    }

    fn raw_car(plates: &str) -> RawRecord {
        RawRecord::new()
            .with(CarField::Brand, "Fiat")
            .with(CarField::Model, "Uno")
            .with(CarField::Color, "AZUL")
            .with(CarField::YearManufacture, "2021")
            .with(CarField::Imported, false)
            .with(CarField::Plates, plates)
            .with(CarField::SellingPrice, "")
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let controller = controller();
        let created = controller.create(raw_car("ABC-1234")).await.unwrap();
        let car = created.data.unwrap();
        assert_eq!(car.year_manufacture, 2021);
        assert_eq!(car.selling_price, None);

        let fetched = controller.get_by_id(car.id).await.unwrap();
        assert_eq!(fetched.plates, "ABC-1234");
    }

    #[tokio::test]
    async fn test_create_invalid_record_is_not_persisted() {
        let controller = controller();
        let err = controller
            .create(raw_car("ABC-1234").with(CarField::Color, "BEGE"))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(e) => {
                assert_eq!(e.messages().len(), 1);
                assert!(e.get(CarField::Color).is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(controller.list(ListCarsQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_plates_conflict() {
        let controller = controller();
        controller.create(raw_car("ABC-1234")).await.unwrap();
        let err = controller.create(raw_car("ABC-1234")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_plates() {
        for _ in 0..50 {
            let controller = Arc::new(controller());
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let controller = Arc::clone(&controller);
                    tokio::spawn(async move { controller.create(raw_car("ABC-1234")).await })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => created += 1,
                    Err(err) => assert!(matches!(err, AppError::Conflict(_))),
                }
            }
            assert_eq!(created, 1);
            assert_eq!(controller.list(ListCarsQuery::default()).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_update_keeps_own_plates() {
        let controller = controller();
        let car = controller.create(raw_car("ABC-1234")).await.unwrap().data.unwrap();

        let updated = controller
            .update(car.id, raw_car("ABC-1234").with(CarField::Imported, true))
            .await
            .unwrap()
            .data
            .unwrap();
        assert!(updated.imported);
        assert_eq!(updated.id, car.id);
    }

    #[tokio::test]
    async fn test_update_unknown_car() {
        let controller = controller();
        let err = controller.update(Uuid::new_v4(), raw_car("ABC-1234")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validate_field() {
        let controller = controller();

        let ok = controller
            .validate_field(ValidateFieldRequest {
                field: "plates".to_string(),
                value: RawValue::from("ABC-1234"),
            })
            .unwrap();
        assert!(ok.valid);
        assert_eq!(ok.message, None);

        let bad = controller
            .validate_field(ValidateFieldRequest {
                field: "plates".to_string(),
                value: RawValue::from("AB12345"),
            })
            .unwrap();
        assert!(!bad.valid);
        assert!(bad.message.is_some());

        let unknown = controller.validate_field(ValidateFieldRequest {
            field: "mileage".to_string(),
            value: RawValue::Null,
        });
        assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    }
}
