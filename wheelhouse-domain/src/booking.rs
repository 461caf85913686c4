use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::BookingError;

/// An inclusive pickup/return date span. Construction validates ordering,
/// so every `RentalPeriod` in the system satisfies `pickup_date <= return_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl RentalPeriod {
    pub fn new(pickup_date: NaiveDate, return_date: NaiveDate) -> Result<Self, BookingError> {
        if pickup_date > return_date {
            return Err(BookingError::InvalidRange);
        }
        Ok(Self {
            pickup_date,
            return_date,
        })
    }

    /// The shared overlap predicate: two inclusive ranges overlap iff each
    /// range starts on or before the other ends. A single shared boundary
    /// day counts as overlap, not adjacency.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.pickup_date <= other.return_date && self.return_date >= other.pickup_date
    }

    /// Days charged for this period. A same-day pickup and return still
    /// charges one full day.
    pub fn chargeable_days(&self) -> i64 {
        (self.return_date - self.pickup_date).num_days().max(1)
    }
}

/// Total rental price for a period at a car's daily rate, in minor units.
pub fn rental_price(daily_rate: i32, period: &RentalPeriod) -> i32 {
    daily_rate * period.chargeable_days() as i32
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Cancelled bookings release their slot; everything else holds it.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Forward-only lifecycle: pending may confirm or cancel, confirmed may
    /// only cancel, cancelled is terminal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed reservation. `owner_id` is a snapshot of the car's owner
/// taken at creation time; status authorization checks compare against this
/// field, not the car's current owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub renter_id: Uuid,
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub period: RentalPeriod,
    pub status: BookingStatus,
    /// Price in minor currency units, fixed at commit time.
    pub price: i32,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        car_id: Uuid,
        renter_id: Uuid,
        owner_id: Uuid,
        period: RentalPeriod,
        price: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            renter_id,
            owner_id,
            period,
            status: BookingStatus::Pending,
            price,
            created_at: Utc::now(),
        }
    }
}
