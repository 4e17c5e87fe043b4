//! Users as seen by the waiting core.
//!
//! Users are registered elsewhere; this module only models the identity, a
//! display name, and the `waiter_current_event` pointer mutated by join and
//! leave.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventId;

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
}

/// Stable user identifier.
///
/// The UUID value is the canonical representation: two ids are equal when
/// their UUIDs are equal, regardless of the textual casing they arrived in.
///
/// # Examples
/// ```
/// use eventwait::domain::UserId;
///
/// let lower = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid");
/// let upper = UserId::new("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid");
/// assert_eq!(lower, upper);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already parsed UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user in the role of a waiter.
///
/// ## Invariants
/// - `current_event == Some(e)` only while event `e` lists this user among
///   its waiters. Repositories uphold this by writing both sides in one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waiter {
    id: UserId,
    display_name: DisplayName,
    #[serde(rename = "waiterCurrentEvent")]
    current_event: Option<EventId>,
}

impl Waiter {
    pub fn new(id: UserId, display_name: DisplayName, current_event: Option<EventId>) -> Self {
        Self {
            id,
            display_name,
            current_event,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Event the user is currently waiting at, if any.
    pub fn current_event(&self) -> Option<&EventId> {
        self.current_event.as_ref()
    }

    /// Whether the user is currently waiting at `event`.
    pub fn is_waiting_at(&self, event: &EventId) -> bool {
        self.current_event.as_ref() == Some(event)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
    }

    #[rstest]
    fn displays_canonical_lowercase_form() {
        let id = UserId::new("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn rejects_invalid_display_names() {
        assert_eq!(
            DisplayName::new("   "),
            Err(UserValidationError::EmptyDisplayName)
        );
        assert_eq!(
            DisplayName::new("x".repeat(DISPLAY_NAME_MAX + 1)),
            Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            })
        );
    }

    #[rstest]
    fn waiter_reports_current_event() {
        let event = EventId::random();
        let waiter = Waiter::new(
            UserId::random(),
            DisplayName::new("Ada").expect("valid"),
            Some(event),
        );
        assert!(waiter.is_waiting_at(&event));
        assert!(!waiter.is_waiting_at(&EventId::random()));
    }

    #[rstest]
    fn waiter_serialises_pointer_as_waiter_current_event() {
        let waiter = Waiter::new(
            UserId::random(),
            DisplayName::new("Ada").expect("valid"),
            None,
        );
        let value = serde_json::to_value(&waiter).expect("serialise");
        assert!(value["waiterCurrentEvent"].is_null());
        assert_eq!(value["displayName"], "Ada");
    }
}
