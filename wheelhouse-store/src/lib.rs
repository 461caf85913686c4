pub mod app_config;
pub mod booking_repo;
pub mod car_repo;
pub mod database;
pub mod memory;

pub use booking_repo::PgBookingRepository;
pub use car_repo::PgCarRepository;
pub use database::DbClient;
pub use memory::MemoryStore;
