//! Maps [`AppError`] onto HTTP responses.
//!
//! Every failure leaves the API as `{"error": "<message>"}`. Storage detail
//! is logged by the handler and never reaches the body.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use diary_core::{AppError, ErrorBody};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotReady | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.0.public_message().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (AppError::Validation("x".into()), 400),
            (AppError::PayloadTooLarge("x".into()), 413),
            (AppError::NotFound("x".into()), 404),
            (AppError::NotReady, 500),
            (AppError::Internal("x".into()), 500),
            (AppError::RateLimitExceeded("x".into()), 429),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code().as_u16(), status);
        }
    }
}
