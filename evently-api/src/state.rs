use std::sync::Arc;
use evently_core::BookingRepository;

/// Handle to the booking store, injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }
}
