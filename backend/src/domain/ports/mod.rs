//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_verifier;
mod event_command;
mod event_query;
mod event_repository;
mod waiter_command;
mod waiter_repository;

#[cfg(test)]
pub use access_token_verifier::MockAccessTokenVerifier;
pub use access_token_verifier::{AccessTokenError, AccessTokenVerifier};
#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_command::EventCommand;
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_query::{EventQuery, NearbyEventsRequest};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use waiter_command::MockWaiterCommand;
pub use waiter_command::{WaiterCommand, WaiterMove};
#[cfg(test)]
pub use waiter_repository::MockWaiterRepository;
pub use waiter_repository::{WaiterRepository, WaiterRepositoryError};
