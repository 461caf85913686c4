use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use wheelhouse_domain::repository::{BookingRepository, CarRepository, RepoError};
use wheelhouse_domain::{Booking, BookingStatus, Car, RentalPeriod};

/// In-memory store used by tests and local experiments. Where Postgres
/// closes the commit race with an exclusion constraint, this store holds
/// one mutex across the overlap check and the insert, serializing commits.
#[derive(Default)]
pub struct MemoryStore {
    cars: Mutex<HashMap<Uuid, Car>>,
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, RepoError> {
        Ok(self.cars.lock().await.get(&id).cloned())
    }

    async fn find_listed_by_location(&self, location: &str) -> Result<Vec<Car>, RepoError> {
        Ok(self
            .cars
            .lock()
            .await
            .values()
            .filter(|car| car.is_listed && car.location == location)
            .cloned()
            .collect())
    }

    async fn insert(&self, car: &Car) -> Result<(), RepoError> {
        self.cars.lock().await.insert(car.id, car.clone());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn count_active_overlapping(
        &self,
        car_id: Uuid,
        period: &RentalPeriod,
    ) -> Result<u64, RepoError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .values()
            .filter(|b| b.car_id == car_id && b.status.is_active() && b.period.overlaps(period))
            .count() as u64)
    }

    async fn insert_if_free(&self, booking: &Booking) -> Result<(), RepoError> {
        // Check and insert under one guard; concurrent commits for the same
        // car cannot interleave between the two.
        let mut bookings = self.bookings.lock().await;

        let taken = bookings.values().any(|b| {
            b.car_id == booking.car_id && b.status.is_active() && b.period.overlaps(&booking.period)
        });
        if taken {
            return Err(RepoError::Conflict);
        }

        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.bookings.lock().await.get(&id).cloned())
    }

    async fn list_by_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.renter_id == renter_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError> {
        if let Some(booking) = self.bookings.lock().await.get_mut(&id) {
            booking.status = status;
        }
        Ok(())
    }

    async fn cancel_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError> {
        let mut bookings = self.bookings.lock().await;
        let mut cancelled = 0;
        for booking in bookings.values_mut() {
            if booking.status == BookingStatus::Pending && booking.created_at < cutoff {
                booking.status = BookingStatus::Cancelled;
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }
}
