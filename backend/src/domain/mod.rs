//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters and the services that enforce the waiting rules. Types are
//! immutable; invariants are documented on each type.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - Event, EventId, EventDraft, EventDetails: the event aggregate.
//! - Waiter, UserId, DisplayName: users in the waiter role.
//! - GeoPoint, BoundingBox, ZoomRadii: proximity search primitives.
//! - EventService, WaiterService: driving-port implementations.

pub mod auth;
pub mod error;
pub mod event;
mod event_service;
pub mod geo;
pub mod ports;
pub mod trace_id;
pub mod user;
mod waiter_service;

pub use self::auth::AccessClaims;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{
    Event, EventDetails, EventDraft, EventId, EventValidationError, InvalidEventId,
};
pub use self::event_service::EventService;
pub use self::geo::{
    BoundingBox, DEFAULT_ZOOM_RADII_M, EARTH_RADIUS_M, GeoPoint, GeoPointValidationError,
    ZoomRadii, ZoomRadiiError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DISPLAY_NAME_MAX, DisplayName, UserId, UserValidationError, Waiter};
pub use self::waiter_service::WaiterService;
