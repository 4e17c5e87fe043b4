//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types.
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`; migrations run once at startup over a blocking connection.
//!
//! ```no_run
//! use eventwait::outbound::persistence::{
//!     DbPool, DieselEventRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/eventwait";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let events = DieselEventRepository::new(pool);
//! # let _ = events;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_waiter_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_waiter_repository::DieselWaiterRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
