//! Event aggregate and its validation rules.
//!
//! Creation input arrives as an [`EventDraft`] whose fields may be missing.
//! [`EventDraft::validate`] checks every rule and reports all violations at
//! once, so clients see one cause per failing field rather than only the
//! first.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GeoPoint, UserId};

/// Stable event identifier.
///
/// Comparisons use the UUID value, which is the canonical representation for
/// both path parameters and stored references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

/// Returned when an event identifier is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event id must be a valid UUID")]
pub struct InvalidEventId;

impl EventId {
    /// Parse an [`EventId`] from its textual form.
    ///
    /// # Examples
    /// ```
    /// use eventwait::domain::EventId;
    ///
    /// assert!(EventId::new("00000000-0000-0000-0000-000000000001").is_ok());
    /// assert!(EventId::new("5a1b2c3d").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidEventId> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(InvalidEventId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| InvalidEventId)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// A single failed validation rule for event creation.
///
/// `Display` yields the client-facing cause string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    #[error("A name is required")]
    MissingName,
    #[error("A description is required")]
    MissingDescription,
    #[error("A location is required")]
    MissingLocation,
    #[error("Location is out of range")]
    InvalidLocation,
    #[error("A date is required")]
    MissingDate,
    #[error("A valid date is required")]
    InvalidDate,
}

/// Validated, persistable event fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    name: String,
    description: String,
    address: Option<String>,
    location: GeoPoint,
    date: DateTime<Utc>,
}

impl EventDetails {
    /// Construct details from already typed values, checking the text rules.
    ///
    /// Used by persistence adapters rehydrating stored rows.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        address: Option<String>,
        location: GeoPoint,
        date: DateTime<Utc>,
    ) -> Result<Self, EventValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EventValidationError::MissingName);
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(EventValidationError::MissingDescription);
        }
        Ok(Self {
            name,
            description,
            address: normalise_address(address),
            location,
            date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn location(&self) -> &GeoPoint {
        &self.location
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

fn normalise_address(address: Option<String>) -> Option<String> {
    address.filter(|value| !value.trim().is_empty())
}

/// Raw creation input as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC).
    pub date: Option<String>,
}

impl EventDraft {
    /// Check every rule and return either the validated details or the full
    /// list of violations in field order (name, description, location, date).
    ///
    /// # Examples
    /// ```
    /// use eventwait::domain::{EventDraft, EventValidationError};
    ///
    /// let errors = EventDraft {
    ///     name: Some("Gig".to_owned()),
    ///     ..EventDraft::default()
    /// }
    /// .validate()
    /// .expect_err("incomplete draft");
    /// assert_eq!(
    ///     errors,
    ///     vec![
    ///         EventValidationError::MissingDescription,
    ///         EventValidationError::MissingLocation,
    ///         EventValidationError::MissingDate,
    ///     ]
    /// );
    /// ```
    pub fn validate(self) -> Result<EventDetails, Vec<EventValidationError>> {
        let mut errors = Vec::new();

        let name = required_text(self.name, EventValidationError::MissingName, &mut errors);
        let description = required_text(
            self.description,
            EventValidationError::MissingDescription,
            &mut errors,
        );
        let location = match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => GeoPoint::new(longitude, latitude)
                .map_err(|_| errors.push(EventValidationError::InvalidLocation))
                .ok(),
            _ => {
                errors.push(EventValidationError::MissingLocation);
                None
            }
        };
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(EventValidationError::MissingDate);
                None
            }
            Some(raw) => parse_event_date(raw)
                .map_err(|err| errors.push(err))
                .ok(),
        };

        match (name, description, location, date) {
            (Some(name), Some(description), Some(location), Some(date)) if errors.is_empty() => {
                Ok(EventDetails {
                    name,
                    description,
                    address: normalise_address(self.address),
                    location,
                    date,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    value: Option<String>,
    missing: EventValidationError,
    errors: &mut Vec<EventValidationError>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            errors.push(missing);
            None
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare calendar date.
/// Timestamps keep at most microsecond precision, matching `timestamptz`.
fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, EventValidationError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc).trunc_subsecs(6));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(EventValidationError::InvalidDate)
}

/// A location-tagged event and the users waiting at it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    details: EventDetails,
    waiters: BTreeSet<UserId>,
}

impl Event {
    pub fn new(id: EventId, details: EventDetails, waiters: BTreeSet<UserId>) -> Self {
        Self {
            id,
            details,
            waiters,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    /// Users currently waiting at this event.
    pub fn waiters(&self) -> &BTreeSet<UserId> {
        &self.waiters
    }

    pub fn has_waiter(&self, user: &UserId) -> bool {
        self.waiters.contains(user)
    }
}
