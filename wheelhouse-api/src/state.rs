use std::sync::Arc;
use wheelhouse_domain::BookingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub auth: AuthConfig,
}
