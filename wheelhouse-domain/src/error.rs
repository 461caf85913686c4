use crate::repository::RepoError;

/// Failure taxonomy for the booking core. Everything a handler can surface
/// to a client maps onto one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Return date must not precede pickup date")]
    InvalidRange,

    #[error("Car is not available for the requested dates")]
    CarUnavailable,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Another commit won the race for the same car and an overlapping
    /// range between our check and our insert.
    #[error("Booking conflicts with a concurrent reservation")]
    ConflictRace,

    #[error("Storage failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RepoError> for BookingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict => BookingError::ConflictRace,
            RepoError::Backend(source) => BookingError::Store(source),
        }
    }
}
