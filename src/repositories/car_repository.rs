use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::car::{Car, NewCar};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

/// Persistencia de cars. Solo recibe registros ya validados por el esquema.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn create(&self, car: NewCar) -> AppResult<Car>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>>;

    /// Listado paginado, los más recientes primero
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Car>>;

    async fn update(&self, id: Uuid, car: NewCar) -> AppResult<Car>;

    /// Indica si la placa ya existe, ignorando opcionalmente un car
    async fn plates_exist(&self, plates: &str, exclude: Option<Uuid>) -> AppResult<bool>;
}

/// Código SQLSTATE de violación de restricción UNIQUE
const UNIQUE_VIOLATION: &str = "23505";

/// Una inserción concurrente con la misma placa llega como violación del índice único
fn plates_conflict(err: sqlx::Error, plates: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            conflict_error("Car", "plates", plates)
        }
        _ => AppError::Database(err),
    }
}

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn create(&self, car: NewCar) -> AppResult<Car> {
        let id = Uuid::new_v4();
        let plates = car.plates.clone();
        let now = Utc::now();

        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                id, brand, model, color, year_manufacture, imported, plates,
                selling_date, selling_price, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#
        )
        .bind(id)
        .bind(car.brand)
        .bind(car.model)
        .bind(car.color)
        .bind(car.year_manufacture)
        .bind(car.imported)
        .bind(car.plates)
        .bind(car.selling_date)
        .bind(car.selling_price)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| plates_conflict(e, &plates))?;

        debug!("💾 Car {} insertado", car.id);
        Ok(car)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT * FROM cars ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    async fn update(&self, id: Uuid, car: NewCar) -> AppResult<Car> {
        let plates = car.plates.clone();
        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET brand = $2, model = $3, color = $4, year_manufacture = $5, imported = $6,
                plates = $7, selling_date = $8, selling_price = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(car.brand)
        .bind(car.model)
        .bind(car.color)
        .bind(car.year_manufacture)
        .bind(car.imported)
        .bind(car.plates)
        .bind(car.selling_date)
        .bind(car.selling_price)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| plates_conflict(e, &plates))?;

        updated.ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    async fn plates_exist(&self, plates: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE plates = $1 AND ($2::uuid IS NULL OR id <> $2))"
        )
        .bind(plates)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint \"cars_plates_key\"")]
    struct UniqueViolation;

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"cars_plates_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(UNIQUE_VIOLATION))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = plates_conflict(sqlx::Error::Database(Box::new(UniqueViolation)), "ABC-1234");
        match err {
            AppError::Conflict(msg) => assert!(msg.contains("ABC-1234")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_database_errors_stay_database_errors() {
        let err = plates_conflict(sqlx::Error::RowNotFound, "ABC-1234");
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
