pub mod booking;
pub mod car;
pub mod error;
pub mod repository;
pub mod service;

pub use booking::{rental_price, Booking, BookingStatus, RentalPeriod};
pub use car::Car;
pub use error::BookingError;
pub use repository::{BookingRepository, CarRepository, RepoError};
pub use service::BookingService;
