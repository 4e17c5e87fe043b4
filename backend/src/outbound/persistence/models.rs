//! Diesel row structs. Internal to the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{event_waiters, events, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub address: Option<&'a str>,
    pub longitude: f64,
    pub latitude: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WaiterRow {
    pub id: Uuid,
    pub display_name: String,
    pub waiter_current_event: Option<Uuid>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_waiters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventWaiterRow {
    pub event_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_waiters)]
pub(crate) struct NewEventWaiterRow {
    pub event_id: Uuid,
    pub user_id: Uuid,
}
