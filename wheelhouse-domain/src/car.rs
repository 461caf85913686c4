use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rental listing. The `is_listed` flag is listing-level visibility and
/// independent of any reservations against the car.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Daily rate in minor currency units (cents).
    pub daily_rate: i32,
    pub is_listed: bool,
    pub location: String,
}

impl Car {
    pub fn new(owner_id: Uuid, daily_rate: i32, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            daily_rate,
            is_listed: true,
            location: location.into(),
        }
    }
}
