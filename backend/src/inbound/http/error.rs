//! HTTP adapter mapping for domain errors.
//!
//! Client faults render as JSend `fail` envelopes carrying the message and
//! causes. Server faults render as `error` envelopes; internal error messages
//! are redacted before leaving the process.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::envelope::{Envelope, FailData};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the wire envelope for `error`.
fn envelope_for(error: &Error) -> Envelope<()> {
    match error.code() {
        code if code.is_client_fault() => Envelope::Fail {
            data: FailData {
                message: error.message().to_owned(),
                causes: error.causes().to_vec(),
            },
        },
        ErrorCode::InternalError => Envelope::Error {
            message: REDACTED_MESSAGE.to_owned(),
        },
        _ => Envelope::Error {
            message: error.message().to_owned(),
        },
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, trace_id = self.trace_id(), "request failed");
        } else {
            warn!(error = %self, trace_id = self.trace_id(), "request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(envelope_for(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
