use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::future::join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::{rental_price, Booking, BookingStatus, RentalPeriod};
use crate::car::Car;
use crate::error::BookingError;
use crate::repository::{BookingRepository, CarRepository};

/// Availability oracle and booking committer over the persistent store.
/// All coordination between concurrent commits lives in the store (see
/// `BookingRepository::insert_if_free`); the service itself keeps no
/// mutable state.
pub struct BookingService {
    cars: Arc<dyn CarRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(cars: Arc<dyn CarRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { cars, bookings }
    }

    /// A car is available for `period` iff no active booking for it
    /// overlaps the requested range.
    pub async fn is_available(
        &self,
        car_id: Uuid,
        period: &RentalPeriod,
    ) -> Result<bool, BookingError> {
        let overlapping = self
            .bookings
            .count_active_overlapping(car_id, period)
            .await?;
        Ok(overlapping == 0)
    }

    /// All listed cars at `location` that pass the oracle check for
    /// `period`. Per-car checks are independent and run concurrently; the
    /// result carries no ordering guarantee.
    pub async fn list_available(
        &self,
        location: &str,
        period: &RentalPeriod,
    ) -> Result<Vec<Car>, BookingError> {
        let cars = self.cars.find_listed_by_location(location).await?;

        let checks = cars.into_iter().map(|car| async move {
            let free = self.is_available(car.id, period).await?;
            Ok::<_, BookingError>((car, free))
        });

        let mut available = Vec::new();
        for result in join_all(checks).await {
            let (car, free) = result?;
            if free {
                available.push(car);
            }
        }

        debug!(location, count = available.len(), "availability query");
        Ok(available)
    }

    /// Commit a booking for `renter_id`. The oracle check runs first for a
    /// precise rejection, but the store's conditional insert is what closes
    /// the check-then-insert window: a commit that loses the race fails
    /// with `ConflictRace` and writes nothing.
    pub async fn book_car(
        &self,
        car_id: Uuid,
        renter_id: Uuid,
        period: RentalPeriod,
    ) -> Result<Booking, BookingError> {
        // 1. Oracle check over the requested range
        if !self.is_available(car_id, &period).await? {
            return Err(BookingError::CarUnavailable);
        }

        // 2. Load the car for its rate and owner snapshot
        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or(BookingError::NotFound("Car"))?;

        // 3. Price the span, then conditionally insert
        let price = rental_price(car.daily_rate, &period);
        let booking = Booking::new(car_id, renter_id, car.owner_id, period, price);

        self.bookings.insert_if_free(&booking).await?;

        info!(booking_id = %booking.id, car_id = %car_id, price, "booking committed");
        Ok(booking)
    }

    /// Owner-gated status transition. Only the booking's captured owner may
    /// move it, and only along the forward-only machine.
    pub async fn set_status(
        &self,
        booking_id: Uuid,
        requester_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound("Booking"))?;

        if booking.owner_id != requester_id {
            return Err(BookingError::Unauthorized);
        }

        if !booking.status.can_transition_to(new_status) {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: new_status.to_string(),
            });
        }

        self.bookings.update_status(booking_id, new_status).await?;
        booking.status = new_status;

        info!(booking_id = %booking_id, status = %new_status, "booking status changed");
        Ok(booking)
    }

    pub async fn bookings_for_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.list_by_renter(renter_id).await?)
    }

    pub async fn bookings_for_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.list_by_owner(owner_id).await?)
    }

    /// Cancel pending bookings older than `max_age_hours`. Invoked by the
    /// background sweeper; reuses the ordinary pending → cancelled
    /// transition so expired slots free up under the same invariant as a
    /// manual cancellation.
    pub async fn expire_stale_pending(&self, max_age_hours: u64) -> Result<u64, BookingError> {
        let cutoff = Utc::now() - Duration::hours(max_age_hours as i64);
        let cancelled = self.bookings.cancel_stale_pending(cutoff).await?;
        if cancelled > 0 {
            info!(cancelled, "expired stale pending bookings");
        }
        Ok(cancelled)
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService").finish_non_exhaustive()
    }
}
