//! In-memory adapter implementing the event and waiter repositories.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. A single lock guards both maps so join, leave and delete update the
//! user pointer and the event waiter set atomically.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, WaiterRepository, WaiterRepositoryError,
};
use crate::domain::{BoundingBox, DisplayName, Event, EventDetails, EventId, UserId, Waiter};

#[derive(Debug, Clone)]
struct StoredEvent {
    details: EventDetails,
    waiters: BTreeSet<UserId>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    display_name: DisplayName,
    current_event: Option<EventId>,
}

#[derive(Debug, Default)]
struct State {
    events: BTreeMap<EventId, StoredEvent>,
    users: BTreeMap<UserId, StoredUser>,
}

impl State {
    fn event(&self, id: &EventId) -> Option<Event> {
        self.events
            .get(id)
            .map(|stored| Event::new(*id, stored.details.clone(), stored.waiters.clone()))
    }
}

/// Process-local store shared by both repository ports.
///
/// Events are listed in identifier order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Users are owned by an external identity service, so
    /// this is the only way to make one known to the store.
    ///
    /// Any current-event pointer on `waiter` is ignored; new users start idle.
    pub async fn insert_user(&self, waiter: Waiter) {
        let mut state = self.state.write().await;
        state.users.insert(
            *waiter.id(),
            StoredUser {
                display_name: waiter.display_name().clone(),
                current_event: None,
            },
        );
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut state = self.state.write().await;
        if state.events.contains_key(event.id()) {
            return Err(EventRepositoryError::query(format!(
                "event {} already exists",
                event.id()
            )));
        }
        state.events.insert(
            *event.id(),
            StoredEvent {
                details: event.details().clone(),
                waiters: event.waiters().clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(self.state.read().await.event(id))
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let state = self.state.read().await;
        Ok(state.events.keys().filter_map(|id| state.event(id)).collect())
    }

    async fn list_within(&self, bounds: &BoundingBox) -> Result<Vec<Event>, EventRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|(_, stored)| bounds.contains(stored.details.location()))
            .filter_map(|(id, _)| state.event(id))
            .collect())
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        let mut state = self.state.write().await;
        let Some(removed) = state.events.remove(id) else {
            return Ok(false);
        };
        for user in &removed.waiters {
            if let Some(stored) = state.users.get_mut(user)
                && stored.current_event == Some(*id)
            {
                stored.current_event = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl WaiterRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Waiter>, WaiterRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(id)
            .map(|stored| Waiter::new(*id, stored.display_name.clone(), stored.current_event)))
    }

    async fn join(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError> {
        let mut state = self.state.write().await;
        let State { events, users } = &mut *state;

        let stored_user = users
            .get_mut(user)
            .ok_or_else(|| WaiterRepositoryError::query(format!("user {user} not found")))?;
        let stored_event = events
            .get_mut(event)
            .ok_or_else(WaiterRepositoryError::event_missing)?;
        if stored_user.current_event.is_some() {
            return Err(WaiterRepositoryError::pointer_conflict());
        }

        stored_user.current_event = Some(*event);
        stored_event.waiters.insert(*user);
        Ok(())
    }

    async fn leave(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError> {
        let mut state = self.state.write().await;
        let State { events, users } = &mut *state;

        let stored_user = users
            .get_mut(user)
            .ok_or_else(|| WaiterRepositoryError::query(format!("user {user} not found")))?;
        let stored_event = events
            .get_mut(event)
            .ok_or_else(WaiterRepositoryError::event_missing)?;
        if stored_user.current_event != Some(*event) {
            return Err(WaiterRepositoryError::pointer_conflict());
        }

        stored_user.current_event = None;
        stored_event.waiters.remove(user);
        Ok(())
    }
}
