use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wheelhouse_api::{app, state::AuthConfig, AppState};
use wheelhouse_domain::BookingService;
use wheelhouse_store::{DbClient, PgBookingRepository, PgCarRepository};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wheelhouse_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = wheelhouse_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Wheelhouse API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let cars = Arc::new(PgCarRepository::new(db.pool.clone()));
    let bookings = Arc::new(PgBookingRepository::new(db.pool.clone()));
    let service = Arc::new(BookingService::new(cars, bookings));

    tokio::spawn(wheelhouse_api::worker::start_expiry_sweeper(
        service.clone(),
        config.business_rules.clone(),
    ));

    let app_state = AppState {
        service,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
