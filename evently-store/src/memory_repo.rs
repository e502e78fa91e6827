//! Process-local booking store.
//!
//! Backs the `memory` storage backend and the API tests. Bookings live in a
//! `Vec` so listing preserves insertion order.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use evently_core::{
    Booking, BookingError, BookingId, BookingPatch, BookingRepository, BookingResult, NewBooking,
};

#[derive(Clone, Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }

    async fn find_contains<F>(&self, needle: &str, field: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> &str,
    {
        let needle = needle.to_lowercase();
        self.bookings
            .read()
            .await
            .iter()
            .filter(|b| field(b).to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn list_all(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }

    async fn create(&self, booking: NewBooking) -> BookingResult<Booking> {
        booking.validate()?;
        let booking = booking.into_booking(BookingId::new());
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn get_by_id(&self, id: &str) -> BookingResult<Option<Booking>> {
        let id = BookingId::parse(id)?;
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn update(&self, id: &str, patch: BookingPatch) -> BookingResult<Booking> {
        let booking_id = BookingId::parse(id)?;
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        booking.apply(&patch);
        Ok(booking.clone())
    }

    async fn delete(&self, id: &str) -> BookingResult<Booking> {
        let booking_id = BookingId::parse(id)?;
        let mut bookings = self.bookings.write().await;
        let pos = bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        Ok(bookings.remove(pos))
    }

    async fn find_by_email_contains(&self, needle: &str) -> BookingResult<Vec<Booking>> {
        Ok(self.find_contains(needle, |b| b.email.as_str()).await)
    }

    async fn find_by_event_contains(&self, needle: &str) -> BookingResult<Vec<Booking>> {
        Ok(self.find_contains(needle, |b| b.event.as_str()).await)
    }

    async fn ping(&self) -> BookingResult<()> {
        Ok(())
    }
}
