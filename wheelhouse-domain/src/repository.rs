use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, RentalPeriod};
use crate::car::Car;

/// Errors surfaced by repository implementations. `Conflict` is reserved
/// for the store-enforced overlap constraint failing at insert time; every
/// other backend failure is opaque to the domain.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("conflicting reservation")]
    Conflict,

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepoError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepoError::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, RepoError>;

    /// Cars at `location` with the listing flag set. Reservation state is
    /// not consulted here; that is the oracle's job.
    async fn find_listed_by_location(&self, location: &str) -> Result<Vec<Car>, RepoError>;

    async fn insert(&self, car: &Car) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Number of active (non-cancelled) bookings for `car_id` overlapping
    /// `period` under the shared predicate.
    async fn count_active_overlapping(
        &self,
        car_id: Uuid,
        period: &RentalPeriod,
    ) -> Result<u64, RepoError>;

    /// Persist `booking` only if no active booking for the same car
    /// overlaps its period. Check and insert are a single atomic step in
    /// every implementation; a lost race returns `RepoError::Conflict`.
    async fn insert_if_free(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// Bookings made by `renter_id`, newest first.
    async fn list_by_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    /// Bookings whose captured owner is `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), RepoError>;

    /// Cancel every pending booking created before `cutoff` in one atomic
    /// sweep, returning how many were cancelled.
    async fn cancel_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError>;
}
