use crate::config::ConfigError;
use crate::errands::{ReferenceParseError, ServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Snapshot(serde_json::Error),
    Output(serde_json::Error),
    Errand(ServiceError),
    Reference(ReferenceParseError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Snapshot(err) => write!(f, "invalid backend snapshot: {}", err),
            AppError::Output(err) => write!(f, "could not render lookup output: {}", err),
            AppError::Errand(err) => write!(f, "errand lookup failed: {}", err),
            AppError::Reference(err) => write!(f, "invalid case reference: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::Errand(err) => Some(err),
            AppError::Reference(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Errand(err) = self {
            return err.into_response();
        }

        let status = match self {
            AppError::Reference(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Errand(value)
    }
}

impl From<ReferenceParseError> for AppError {
    fn from(value: ReferenceParseError) -> Self {
        Self::Reference(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").expect_err("truncated json")
    }

    #[test]
    fn output_errors_are_not_reported_as_snapshot_errors() {
        let message = AppError::Output(json_error()).to_string();

        assert!(message.starts_with("could not render lookup output"));
        assert!(!message.contains("snapshot"));
    }

    #[test]
    fn parse_failures_convert_to_snapshot_errors() {
        let error: AppError = json_error().into();

        assert!(matches!(error, AppError::Snapshot(_)));
    }

    #[test]
    fn reference_errors_render_as_bad_request() {
        let error = AppError::Reference(ReferenceParseError::InvalidEventId("x".to_string()));

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
