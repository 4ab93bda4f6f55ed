/// Car database operations
use async_trait::async_trait;
use sqlx::PgPool;

use super::CarRepository;
use crate::error::Result;
use crate::models::{Car, CarUpdate, NewCar};

#[derive(Clone)]
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
    async fn list(&self) -> Result<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT id, make, model, year, price FROM cars ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    async fn find(&self, id: i64) -> Result<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            "SELECT id, make, model, year, price FROM cars WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }

    async fn create(&self, car: &NewCar) -> Result<Car> {
        let created = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (make, model, year, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, make, model, year, price
            "#,
        )
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.year)
        .bind(car.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &CarUpdate) -> Result<Option<Car>> {
        // Single statement, so a partial update can never be half applied
        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET make = COALESCE($2, make),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                price = COALESCE($5, price)
            WHERE id = $1
            RETURNING id, make, model, year, price
            "#,
        )
        .bind(id)
        .bind(changes.make.as_deref())
        .bind(changes.model.as_deref())
        .bind(changes.year)
        .bind(changes.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
