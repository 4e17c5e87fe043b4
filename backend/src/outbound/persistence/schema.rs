//! Diesel table definitions for the event store.
//!
//! Kept in sync with `backend/migrations` by hand.

diesel::table! {
    /// Users known to the service. Rows are provisioned by the identity
    /// service; this crate only updates `waiter_current_event`.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        /// Event the user is currently waiting at.
        waiter_current_event -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        address -> Nullable<Varchar>,
        longitude -> Float8,
        latitude -> Float8,
        date -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership of users in an event's waiter set.
    event_waiters (event_id, user_id) {
        event_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::joinable!(event_waiters -> events (event_id));
diesel::joinable!(event_waiters -> users (user_id));
diesel::joinable!(users -> events (waiter_current_event));

diesel::allow_tables_to_appear_in_same_query!(users, events, event_waiters);
