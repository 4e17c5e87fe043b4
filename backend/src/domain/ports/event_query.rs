//! Driving port for event reads.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventId, GeoPoint};

/// Proximity search input, already parsed into typed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyEventsRequest {
    pub center: GeoPoint,
    /// 1-based zoom level indexing the configured radius table.
    pub zoom: u32,
}

/// Driving port for looking up events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Fetch one event. Absent events yield [`crate::domain::ErrorCode::NotFound`].
    async fn get_event(&self, id: &EventId) -> Result<Event, Error>;

    /// Every event, unpaginated.
    async fn list_events(&self) -> Result<Vec<Event>, Error>;

    /// Events within the zoom radius of `request.center`, boundary inclusive.
    async fn events_near(&self, request: NearbyEventsRequest) -> Result<Vec<Event>, Error>;
}
