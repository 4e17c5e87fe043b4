//! Test helpers for inbound HTTP components.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAccessTokenVerifier, MockEventCommand, MockEventQuery, MockWaiterCommand,
};
use crate::domain::{Event, EventDetails, EventId, GeoPoint, UserId};
use crate::inbound::http::state::HttpState;

/// Mocked driving ports. Unset fields panic if a handler reaches them.
#[derive(Default)]
pub struct TestPorts {
    pub events: MockEventCommand,
    pub events_query: MockEventQuery,
    pub waiters: MockWaiterCommand,
    pub access_tokens: MockAccessTokenVerifier,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.events),
            Arc::new(self.events_query),
            Arc::new(self.waiters),
            Arc::new(self.access_tokens),
        )
    }
}

/// State whose only configured port is the event query.
pub fn state_with(events_query: MockEventQuery) -> HttpState {
    TestPorts {
        events_query,
        ..TestPorts::default()
    }
    .into_state()
}

/// A Paris gig with one waiter.
pub fn sample_event() -> Event {
    let details = EventDetails::new(
        "Gig",
        "Live music",
        Some("1 Rue de Rivoli".to_owned()),
        GeoPoint::new(2.35, 48.85).expect("valid point"),
        Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0)
            .single()
            .expect("valid date"),
    )
    .expect("valid details");
    Event::new(
        EventId::random(),
        details,
        BTreeSet::from([UserId::random()]),
    )
}
