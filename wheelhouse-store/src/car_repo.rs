use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use wheelhouse_domain::repository::{CarRepository, RepoError};
use wheelhouse_domain::Car;

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CarRow {
    id: Uuid,
    owner_id: Uuid,
    daily_rate: i32,
    is_listed: bool,
    location: String,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Car {
            id: row.id,
            owner_id: row.owner_id,
            daily_rate: row.daily_rate,
            is_listed: row.is_listed,
            location: row.location,
        }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, RepoError> {
        let row = sqlx::query_as::<_, CarRow>(
            "SELECT id, owner_id, daily_rate, is_listed, location FROM cars WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        Ok(row.map(Car::from))
    }

    async fn find_listed_by_location(&self, location: &str) -> Result<Vec<Car>, RepoError> {
        let rows = sqlx::query_as::<_, CarRow>(
            "SELECT id, owner_id, daily_rate, is_listed, location FROM cars \
             WHERE location = $1 AND is_listed",
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn insert(&self, car: &Car) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO cars (id, owner_id, daily_rate, is_listed, location) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(car.id)
        .bind(car.owner_id)
        .bind(car.daily_rate)
        .bind(car.is_listed)
        .bind(&car.location)
        .execute(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        Ok(())
    }
}
