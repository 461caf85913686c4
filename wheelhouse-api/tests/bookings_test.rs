use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use wheelhouse_api::middleware::auth::Claims;
use wheelhouse_api::state::AuthConfig;
use wheelhouse_api::{app, AppState};
use wheelhouse_domain::repository::CarRepository;
use wheelhouse_domain::{BookingService, Car};
use wheelhouse_store::MemoryStore;

const SECRET: &str = "test-secret";

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(BookingService::new(store.clone(), store.clone()));
    let state = AppState {
        service,
        auth: AuthConfig {
            secret: SECRET.to_string(),
        },
    };
    (app(state), store)
}

fn token_for(user_id: Uuid, role: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_car(store: &MemoryStore, daily_rate: i32, location: &str) -> Car {
    let car = Car::new(Uuid::new_v4(), daily_rate, location);
    store.insert(&car).await.unwrap();
    car
}

#[tokio::test]
async fn root_is_public() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn booking_routes_require_a_token() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        None,
        Some(json!({
            "carId": Uuid::new_v4(),
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn end_to_end_booking_flow() {
    let (app, store) = test_app();
    let car = seed_car(&store, 100, "X").await;
    let renter = token_for(Uuid::new_v4(), "renter");
    let owner = token_for(car.owner_id, "owner");

    // The car shows up as available for the range
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/check-availability",
        Some(&renter),
        Some(json!({
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
            "location": "X",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availableCars"].as_array().unwrap().len(), 1);

    // Book it: three chargeable days at rate 100
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&renter),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["booking"]["price"], json!(300));
    assert_eq!(body["booking"]["status"], json!("pending"));
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    // An overlapping second booking is refused
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&token_for(Uuid::new_v4(), "renter")),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-03",
            "returnDate": "2024-03-05",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    // And the car no longer lists as available for the range
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/bookings/check-availability",
        Some(&renter),
        Some(json!({
            "pickupDate": "2024-03-03",
            "returnDate": "2024-03-05",
            "location": "X",
        })),
    )
    .await;
    assert!(body["availableCars"].as_array().unwrap().is_empty());

    // The owner confirms the booking
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/change-status",
        Some(&owner),
        Some(json!({ "bookingId": booking_id, "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], json!("confirmed"));

    // Renter sees their booking, owner sees the booking on their fleet
    let (_, body) = send(&app, Method::GET, "/api/bookings/user", Some(&renter), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/api/bookings/owner", Some(&owner), None).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (app, store) = test_app();
    let car = seed_car(&store, 100, "X").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&token_for(Uuid::new_v4(), "renter")),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-04",
            "returnDate": "2024-03-01",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn owner_listing_requires_owner_role() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/bookings/owner",
        Some(&token_for(Uuid::new_v4(), "renter")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn only_the_captured_owner_may_change_status() {
    let (app, store) = test_app();
    let car = seed_car(&store, 100, "X").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&token_for(Uuid::new_v4(), "renter")),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
        })),
    )
    .await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    // Another owner-role user is still a stranger to this booking
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/change-status",
        Some(&token_for(Uuid::new_v4(), "owner")),
        Some(json!({ "bookingId": booking_id, "status": "confirmed" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn cancelled_booking_cannot_be_confirmed() {
    let (app, store) = test_app();
    let car = seed_car(&store, 100, "X").await;
    let owner = token_for(car.owner_id, "owner");

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&token_for(Uuid::new_v4(), "renter")),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
        })),
    )
    .await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/bookings/change-status",
        Some(&owner),
        Some(json!({ "bookingId": booking_id, "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/change-status",
        Some(&owner),
        Some(json!({ "bookingId": booking_id, "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    // The cancellation reopened the slot
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/bookings/create",
        Some(&token_for(Uuid::new_v4(), "renter")),
        Some(json!({
            "carId": car.id,
            "pickupDate": "2024-03-01",
            "returnDate": "2024-03-04",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let (app, store) = test_app();
    let car = seed_car(&store, 100, "X").await;
    let owner = token_for(car.owner_id, "owner");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings/change-status",
        Some(&owner),
        Some(json!({ "bookingId": Uuid::new_v4(), "status": "archived" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}
