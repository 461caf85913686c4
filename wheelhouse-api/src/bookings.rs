use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wheelhouse_domain::{Booking, BookingError, BookingStatus, Car, RentalPeriod};

use crate::error::ApiError;
use crate::middleware::auth::{CurrentUser, Role};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub booking_id: Uuid,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCarsResponse {
    pub success: bool,
    pub available_cars: Vec<Car>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-availability", post(check_availability))
        .route("/create", post(create_booking))
        .route("/user", get(user_bookings))
        .route("/owner", get(owner_bookings))
        .route("/change-status", post(change_status))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/bookings/check-availability
/// All listed cars at the location that are free over the requested range.
async fn check_availability(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Json(req): Json<CheckAvailabilityRequest>,
) -> Result<Json<AvailableCarsResponse>, ApiError> {
    let period = RentalPeriod::new(req.pickup_date, req.return_date)?;
    let available_cars = state.service.list_available(&req.location, &period).await?;

    Ok(Json(AvailableCarsResponse {
        success: true,
        available_cars,
    }))
}

/// POST /api/bookings/create
/// Commit a booking for the authenticated renter.
async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let period = RentalPeriod::new(req.pickup_date, req.return_date)?;
    let booking = state.service.book_car(req.car_id, user.id, period).await?;

    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

/// GET /api/bookings/user
async fn user_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let bookings = state.service.bookings_for_renter(user.id).await?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings,
    }))
}

/// GET /api/bookings/owner
/// Bookings against the caller's cars. Owner role required.
async fn owner_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BookingsResponse>, ApiError> {
    if user.role != Role::Owner {
        return Err(BookingError::Unauthorized.into());
    }
    let bookings = state.service.bookings_for_owner(user.id).await?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings,
    }))
}

/// POST /api/bookings/change-status
/// Owner-gated transition along the forward-only status machine.
async fn change_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let status = BookingStatus::parse(&req.status)
        .ok_or_else(|| ApiError::Validation(format!("Unknown status `{}`", req.status)))?;

    let booking = state
        .service
        .set_status(req.booking_id, user.id, status)
        .await?;

    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}
