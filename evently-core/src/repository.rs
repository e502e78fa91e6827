use async_trait::async_trait;

use crate::booking::{Booking, BookingPatch, NewBooking};
use crate::BookingResult;

/// Persistence contract for bookings.
///
/// Identifiers are taken as the raw strings the caller received; each
/// implementation parses them and answers `MalformedId` for anything that is
/// not a valid [`BookingId`](crate::BookingId). Operations are independent,
/// there are no cross-call transactions.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// All bookings in insertion order.
    async fn list_all(&self) -> BookingResult<Vec<Booking>>;

    async fn create(&self, booking: NewBooking) -> BookingResult<Booking>;

    /// `Ok(None)` when the id is well-formed but unknown.
    async fn get_by_id(&self, id: &str) -> BookingResult<Option<Booking>>;

    /// Fails with `NotFound` when the id does not resolve.
    async fn update(&self, id: &str, patch: BookingPatch) -> BookingResult<Booking>;

    /// Returns the record as it was before removal.
    async fn delete(&self, id: &str) -> BookingResult<Booking>;

    /// Case-insensitive substring match on `email`.
    async fn find_by_email_contains(&self, needle: &str) -> BookingResult<Vec<Booking>>;

    /// Case-insensitive substring match on `event`.
    async fn find_by_event_contains(&self, needle: &str) -> BookingResult<Vec<Booking>>;

    /// Connection readiness check.
    async fn ping(&self) -> BookingResult<()>;
}
