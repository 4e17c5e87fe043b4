//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel.
//! - **memory**: process-local repositories used without a database.
//! - **token**: HS256 JWT verification for the access-token port.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod memory;
pub mod persistence;
pub mod token;
