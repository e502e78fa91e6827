use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evently_core::BookingError;

use crate::envelope::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("No booking found with id {0}")]
    NotFoundError(String),
    #[error("Invalid booking id: {0}")]
    MalformedIdError(String),
    #[error("Database connection failed: {0}")]
    ConnectionError(String),
    #[error("{0}")]
    InternalServerError(String),
    #[error("Route not found")]
    RouteNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => AppError::ValidationError(msg),
            BookingError::NotFound(id) => AppError::NotFoundError(id),
            BookingError::MalformedId(id) => AppError::MalformedIdError(id),
            BookingError::Persistence(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// The only path parameter is the booking id, so an undecodable segment is a
/// malformed id.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedIdError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedIdError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFoundError(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ConnectionError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::ValidationError(msg) => Envelope::failure(msg, None),
            AppError::NotFoundError(id) => Envelope::failure(
                "Booking not found",
                Some(format!("No booking found with id {}", id)),
            ),
            AppError::MalformedIdError(id) => Envelope::failure(
                "Invalid booking id",
                Some(format!("'{}' is not a valid booking id", id)),
            ),
            AppError::ConnectionError(msg) => {
                tracing::error!("Database connection failed: {}", msg);
                Envelope::failure(msg, Some("Database connection failed".to_string()))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                Envelope::failure(msg, Some("Server error".to_string()))
            }
            AppError::RouteNotFound => Envelope::failure("Route not found", None),
            AppError::MethodNotAllowed => Envelope::failure("Method not allowed", None),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_errors_map_to_status() {
        let cases = [
            (BookingError::validation("x"), StatusCode::BAD_REQUEST),
            (BookingError::NotFound("id".into()), StatusCode::NOT_FOUND),
            (BookingError::MalformedId("id".into()), StatusCode::BAD_REQUEST),
            (BookingError::persistence("down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_routing_errors_map_to_status() {
        assert_eq!(AppError::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_connection_error_is_distinct_500() {
        let response = AppError::ConnectionError("refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
