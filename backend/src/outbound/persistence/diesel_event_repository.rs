//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Waiter sets live in `event_waiters` and are loaded alongside the event
//! rows. Deletion clears the pointers of waiting users in the same
//! transaction.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use diesel::dsl;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{BoundingBox, Event, EventDetails, EventId, GeoPoint, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventRow, EventWaiterRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::{event_waiters, events, users};

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow, waiters: BTreeSet<UserId>) -> Result<Event, EventRepositoryError> {
    let EventRow {
        id,
        name,
        description,
        address,
        longitude,
        latitude,
        date,
    } = row;
    let location = GeoPoint::new(longitude, latitude)
        .map_err(|err| EventRepositoryError::query(format!("stored event {id}: {err}")))?;
    let details = EventDetails::new(name, description, address, location, date)
        .map_err(|err| EventRepositoryError::query(format!("stored event {id}: {err}")))?;
    Ok(Event::new(EventId::from_uuid(id), details, waiters))
}

/// Load the waiter sets for `rows` with one query and build domain events.
async fn attach_waiters(
    conn: &mut AsyncPgConnection,
    rows: Vec<EventRow>,
) -> Result<Vec<Event>, EventRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let memberships: Vec<EventWaiterRow> = event_waiters::table
        .filter(event_waiters::event_id.eq_any(&ids))
        .select(EventWaiterRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut by_event: BTreeMap<Uuid, BTreeSet<UserId>> = BTreeMap::new();
    for membership in memberships {
        by_event
            .entry(membership.event_id)
            .or_default()
            .insert(UserId::from_uuid(membership.user_id));
    }

    rows.into_iter()
        .map(|row| {
            let waiters = by_event.remove(&row.id).unwrap_or_default();
            row_to_event(row, waiters)
        })
        .collect()
}

type EventLock = dsl::ForUpdate<dsl::Select<dsl::Find<events::table, Uuid>, events::id>>;

/// Exclusive lock on one event row.
fn event_lock(event_id: Uuid) -> EventLock {
    events::table.find(event_id).select(events::id).for_update()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn create(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = event.details();
        let row = NewEventRow {
            id: *event.id().as_uuid(),
            name: details.name(),
            description: details.description(),
            address: details.address(),
            longitude: details.location().longitude(),
            latitude: details.location().latitude(),
            date: details.date(),
        };

        diesel::insert_into(events::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EventRow> = events::table
            .find(*id.as_uuid())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => Ok(attach_waiters(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .order(events::id.asc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        attach_waiters(&mut conn, rows).await
    }

    async fn list_within(&self, bounds: &BoundingBox) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (min_lat, max_lat) = bounds.latitude;
        let mut query = events::table
            .filter(events::latitude.between(min_lat, max_lat))
            .order(events::id.asc())
            .select(EventRow::as_select())
            .into_boxed();
        if let Some((min_lon, max_lon)) = bounds.longitude {
            query = query.filter(events::longitude.between(min_lon, max_lon));
        }

        let rows: Vec<EventRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        debug!(candidates = rows.len(), "bounding box prefilter");
        attach_waiters(&mut conn, rows).await
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                // Same lock order as join and leave: event row, then users.
                let locked: Option<Uuid> = event_lock(event_id)
                    .get_result(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(false);
                }

                let released = diesel::update(
                    users::table.filter(users::waiter_current_event.eq(event_id)),
                )
                .set((
                    users::waiter_current_event.eq(None::<Uuid>),
                    users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .await?;

                diesel::delete(event_waiters::table.filter(event_waiters::event_id.eq(event_id)))
                    .execute(conn)
                    .await?;

                let deleted = diesel::delete(events::table.find(event_id))
                    .execute(conn)
                    .await?;

                debug!(%event_id, released, deleted, "event delete applied");
                Ok::<_, diesel::result::Error>(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn row(longitude: f64, latitude: f64) -> EventRow {
        EventRow {
            id: Uuid::new_v4(),
            name: "Gig".to_owned(),
            description: "Live music".to_owned(),
            address: Some("1 Rue de Rivoli".to_owned()),
            longitude,
            latitude,
            date: Utc::now(),
        }
    }

    #[rstest]
    fn rows_become_events_with_their_waiters() {
        let waiter = UserId::random();
        let source = row(2.35, 48.85);
        let id = source.id;

        let event = row_to_event(source, BTreeSet::from([waiter])).expect("valid row");

        assert_eq!(event.id().as_uuid(), &id);
        assert!(event.has_waiter(&waiter));
        assert_eq!(event.details().address(), Some("1 Rue de Rivoli"));
    }

    #[rstest]
    fn delete_locks_the_event_row_for_update() {
        let sql =
            diesel::debug_query::<diesel::pg::Pg, _>(&event_lock(Uuid::new_v4())).to_string();
        assert!(sql.contains("FROM \"events\""), "{sql}");
        assert!(sql.contains("FOR UPDATE"), "{sql}");
    }

    #[rstest]
    fn corrupt_coordinates_surface_as_query_errors() {
        let err = row_to_event(row(500.0, 0.0), BTreeSet::new()).expect_err("invalid row");
        assert!(matches!(err, EventRepositoryError::Query { .. }));
    }
}
