//! Translation of raw request input into store calls.
//!
//! Bodies and query strings are deserialized into the loose `*Request` /
//! `*Params` shapes below, where every field is optional. The functions in
//! this module apply the presence rules and hand back the typed values the
//! [`BookingRepository`](crate::BookingRepository) accepts. Empty or
//! whitespace-only strings count as absent everywhere.

use serde::Deserialize;

use crate::booking::{BookingPatch, NewBooking};
use crate::{BookingError, BookingResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    pub ticket_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    pub ticket_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailSearchParams {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventFilterParams {
    pub event: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn new_booking(req: CreateBookingRequest) -> BookingResult<NewBooking> {
    let new = NewBooking {
        name: present(req.name).unwrap_or_default(),
        email: present(req.email).unwrap_or_default(),
        event: present(req.event).unwrap_or_default(),
        ticket_type: present(req.ticket_type),
    };
    new.validate()?;
    Ok(new)
}

/// Every field is optional; an empty patch is a legal no-op.
pub fn booking_patch(req: UpdateBookingRequest) -> BookingPatch {
    BookingPatch {
        name: present(req.name),
        email: present(req.email),
        event: present(req.event),
        ticket_type: present(req.ticket_type),
    }
}

/// Blank search terms count as missing; anything else is matched exactly as
/// sent, surrounding whitespace included.
fn needle(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn email_needle(params: EmailSearchParams) -> BookingResult<String> {
    needle(params.email)
        .ok_or_else(|| BookingError::validation("Please provide an email query parameter"))
}

pub fn event_needle(params: EventFilterParams) -> BookingResult<String> {
    needle(params.event)
        .ok_or_else(|| BookingError::validation("Please provide an event query parameter"))
}
