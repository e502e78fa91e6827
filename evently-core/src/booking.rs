use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::BookingError;

/// Store-assigned booking identifier.
///
/// Path parameters arrive as raw strings; [`BookingId::parse`] is the single
/// structural check, and a failure is reported as [`BookingError::MalformedId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, BookingError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| BookingError::MalformedId(raw.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BookingId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for BookingId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub email: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Applies the supplied fields of `patch`, leaving the rest untouched.
    /// Returns whether anything was overwritten.
    pub fn apply(&mut self, patch: &BookingPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(event) = &patch.event {
            self.event = event.clone();
        }
        if let Some(ticket_type) = &patch.ticket_type {
            self.ticket_type = Some(ticket_type.clone());
        }
        self.updated_at = Utc::now();
        true
    }
}

/// Validated input for a new booking. Only the query translator builds one,
/// so the required fields are known to be non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub event: String,
    pub ticket_type: Option<String>,
}

impl NewBooking {
    /// Required fields must be non-empty before anything is persisted.
    pub fn validate(&self) -> Result<(), BookingError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("event", &self.event),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Validation(format!(
                "Missing required field: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn into_booking(self, id: BookingId) -> Booking {
        let now = Utc::now();
        Booking {
            id,
            name: self.name,
            email: self.email,
            event: self.event,
            ticket_type: self.ticket_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-by-field update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    pub ticket_type: Option<String>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.event.is_none()
            && self.ticket_type.is_none()
    }
}
