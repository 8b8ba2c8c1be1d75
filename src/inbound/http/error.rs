//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON responses and status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidFormat | ErrorCode::OutOfRange | ErrorCode::InvalidState => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidFormat, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::OutOfRange, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InvalidState, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn each_code_maps_to_one_status(#[case] code: ErrorCode, #[case] status: StatusCode) {
        assert_eq!(status_for(code), status);
    }

    #[rstest]
    fn internal_errors_are_redacted() {
        let redacted = redact_if_internal(&Error::internal("connection string leaked"));
        assert_eq!(redacted.message(), "Internal server error");
    }

    #[rstest]
    fn taxonomy_errors_keep_their_message() {
        let error = Error::conflict("a live coupon already exists with code ABC123");
        assert_eq!(redact_if_internal(&error), error);
    }
}
