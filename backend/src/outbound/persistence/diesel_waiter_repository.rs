//! PostgreSQL-backed `WaiterRepository` implementation using Diesel ORM.
//!
//! Join and leave run in one transaction each. The event row is share-locked
//! so a concurrent delete cannot interleave, and the pointer update is
//! conditional on the expected current value so two racing joins cannot both
//! succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{WaiterRepository, WaiterRepositoryError};
use crate::domain::{DisplayName, EventId, UserId, Waiter};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewEventWaiterRow, WaiterRow};
use super::pool::{DbPool, PoolError};
use super::schema::{event_waiters, events, users};

/// Diesel-backed implementation of the waiter repository port.
#[derive(Clone)]
pub struct DieselWaiterRepository {
    pool: DbPool,
}

impl DieselWaiterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WaiterRepositoryError {
    map_basic_pool_error(error, WaiterRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WaiterRepositoryError {
    map_basic_diesel_error(
        error,
        WaiterRepositoryError::query,
        WaiterRepositoryError::connection,
    )
}

/// Transaction failure: either a database error or a rejected transition.
#[derive(Debug)]
enum TransitionError {
    Database(diesel::result::Error),
    Rejected(WaiterRepositoryError),
}

impl From<diesel::result::Error> for TransitionError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl From<TransitionError> for WaiterRepositoryError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::Database(error) => map_diesel_error(error),
            TransitionError::Rejected(error) => error,
        }
    }
}

fn row_to_waiter(row: WaiterRow) -> Result<Waiter, WaiterRepositoryError> {
    let display_name = DisplayName::new(row.display_name)
        .map_err(|err| WaiterRepositoryError::query(format!("stored user {}: {err}", row.id)))?;
    Ok(Waiter::new(
        UserId::from_uuid(row.id),
        display_name,
        row.waiter_current_event.map(EventId::from_uuid),
    ))
}

/// Share-lock the event row, failing when it no longer exists.
async fn lock_event(conn: &mut AsyncPgConnection, event_id: Uuid) -> Result<(), TransitionError> {
    let found: Option<Uuid> = events::table
        .find(event_id)
        .select(events::id)
        .for_share()
        .get_result(conn)
        .await
        .optional()?;
    found
        .map(|_| ())
        .ok_or(TransitionError::Rejected(WaiterRepositoryError::EventMissing))
}

#[async_trait]
impl WaiterRepository for DieselWaiterRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Waiter>, WaiterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WaiterRow> = users::table
            .find(*id.as_uuid())
            .select(WaiterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_waiter).transpose()
    }

    async fn join(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let event_id = *event.as_uuid();

        conn.transaction::<_, TransitionError, _>(|conn| {
            async move {
                lock_event(conn, event_id).await?;

                let claimed = diesel::update(
                    users::table
                        .find(user_id)
                        .filter(users::waiter_current_event.is_null()),
                )
                .set((
                    users::waiter_current_event.eq(Some(event_id)),
                    users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .await?;
                if claimed == 0 {
                    return Err(TransitionError::Rejected(
                        WaiterRepositoryError::PointerConflict,
                    ));
                }

                diesel::insert_into(event_waiters::table)
                    .values(&NewEventWaiterRow { event_id, user_id })
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(WaiterRepositoryError::from)
    }

    async fn leave(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let event_id = *event.as_uuid();

        conn.transaction::<_, TransitionError, _>(|conn| {
            async move {
                lock_event(conn, event_id).await?;

                let released = diesel::update(
                    users::table
                        .find(user_id)
                        .filter(users::waiter_current_event.eq(event_id)),
                )
                .set((
                    users::waiter_current_event.eq(None::<Uuid>),
                    users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .await?;
                if released == 0 {
                    return Err(TransitionError::Rejected(
                        WaiterRepositoryError::PointerConflict,
                    ));
                }

                diesel::delete(
                    event_waiters::table
                        .filter(event_waiters::event_id.eq(event_id))
                        .filter(event_waiters::user_id.eq(user_id)),
                )
                .execute(conn)
                .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(WaiterRepositoryError::from)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn rejected_transitions_pass_through_unchanged() {
        let mapped =
            WaiterRepositoryError::from(TransitionError::Rejected(WaiterRepositoryError::EventMissing));
        assert_eq!(mapped, WaiterRepositoryError::EventMissing);
    }

    #[rstest]
    fn database_failures_become_query_errors() {
        let mapped = WaiterRepositoryError::from(TransitionError::from(
            diesel::result::Error::RollbackTransaction,
        ));
        assert!(matches!(mapped, WaiterRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_keep_the_current_event_pointer() {
        let event = Uuid::new_v4();
        let waiter = row_to_waiter(WaiterRow {
            id: Uuid::new_v4(),
            display_name: "Ada".to_owned(),
            waiter_current_event: Some(event),
        })
        .expect("valid row");
        assert!(waiter.is_waiting_at(&EventId::from_uuid(event)));
    }
}
