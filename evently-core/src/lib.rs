pub mod booking;
pub mod pii;
pub mod query;
pub mod repository;

pub use booking::{Booking, BookingId, BookingPatch, NewBooking};
pub use repository::BookingRepository;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("No booking found with id {0}")]
    NotFound(String),
    #[error("Invalid booking id: {0}")]
    MalformedId(String),
    #[error("{0}")]
    Persistence(String),
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
