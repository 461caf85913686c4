use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wheelhouse_domain::repository::{BookingRepository, RepoError};
use wheelhouse_domain::{Booking, BookingStatus, RentalPeriod};

/// SQLSTATE raised by the `bookings_no_active_overlap` exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    car_id: Uuid,
    renter_id: Uuid,
    owner_id: Uuid,
    pickup_date: NaiveDate,
    return_date: NaiveDate,
    status: String,
    price: i32,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        let status = BookingStatus::parse(&self.status).ok_or_else(|| {
            RepoError::Backend(format!("unknown booking status `{}`", self.status).into())
        })?;
        let period = RentalPeriod::new(self.pickup_date, self.return_date)
            .map_err(|e| RepoError::Backend(Box::new(e)))?;

        Ok(Booking {
            id: self.id,
            car_id: self.car_id,
            renter_id: self.renter_id,
            owner_id: self.owner_id,
            period,
            status,
            price: self.price,
            created_at: self.created_at,
        })
    }
}

const SELECT_BOOKING: &str = "SELECT id, car_id, renter_id, owner_id, pickup_date, return_date, \
                              status, price, created_at FROM bookings";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn count_active_overlapping(
        &self,
        car_id: Uuid,
        period: &RentalPeriod,
    ) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE car_id = $1 AND status <> 'cancelled' \
             AND pickup_date <= $2 AND return_date >= $3",
        )
        .bind(car_id)
        .bind(period.return_date)
        .bind(period.pickup_date)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        Ok(count as u64)
    }

    async fn insert_if_free(&self, booking: &Booking) -> Result<(), RepoError> {
        let result = sqlx::query(
            "INSERT INTO bookings \
             (id, car_id, renter_id, owner_id, pickup_date, return_date, status, price, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(booking.id)
        .bind(booking.car_id)
        .bind(booking.renter_id)
        .bind(booking.owner_id)
        .bind(booking.period.pickup_date)
        .bind(booking.period.return_date)
        .bind(booking.status.as_str())
        .bind(booking.price)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(EXCLUSION_VIOLATION) => {
                Err(RepoError::Conflict)
            }
            Err(e) => Err(RepoError::backend(e)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::backend)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_by_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE renter_id = $1 ORDER BY created_at DESC"
        ))
        .bind(renter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError> {
        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepoError::backend)?;

        Ok(())
    }

    async fn cancel_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled' \
             WHERE status = 'pending' AND created_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(RepoError::backend)?;

        Ok(result.rows_affected())
    }
}
