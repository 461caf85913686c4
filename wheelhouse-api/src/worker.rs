use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use wheelhouse_domain::BookingService;
use wheelhouse_store::app_config::BusinessRules;

/// Background sweep cancelling pending bookings that were never confirmed.
/// Runs for the life of the process; each pass is one atomic store update.
pub async fn start_expiry_sweeper(service: Arc<BookingService>, rules: BusinessRules) {
    let interval = Duration::from_secs(rules.expiry_sweep_interval_seconds.max(1));

    info!(
        max_age_hours = rules.pending_expiry_hours,
        every_seconds = interval.as_secs(),
        "Expiry sweeper started"
    );

    loop {
        sleep(interval).await;
        if let Err(e) = service
            .expire_stale_pending(rules.pending_expiry_hours)
            .await
        {
            error!("Expiry sweep failed: {}", e);
        }
    }
}
