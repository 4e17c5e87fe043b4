//! HTTP inbound adapter exposing the event and waiter endpoints.

pub mod access_token;
pub mod envelope;
pub mod error;
pub mod events;
pub mod existing_event;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod waiters;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Register the `/event` scope and the JSON body configuration.
///
/// Route order matters: literal prefixes such as `/create` and `/long/...`
/// are registered before the `/{id}` patterns that would otherwise shadow
/// them.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use eventwait::inbound::http::{configure, state::HttpState};
///
/// fn app(state: HttpState) {
///     let _app = App::new().app_data(web::Data::new(state)).configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request("Invalid JSON body")
            .with_cause(err.to_string())
            .into()
    }))
    .service(
        web::scope("/event")
            .service(web::resource(["", "/"]).route(web::get().to(events::list_events)))
            .service(events::create_event)
            .service(events::events_near)
            .service(waiters::join_event)
            .service(waiters::leave_event)
            .service(events::delete_event)
            .service(events::get_event),
    );
}
