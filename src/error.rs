use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid directive value: {0}")]
    InvalidDirectiveValue(String),

    #[error("Invalid nonce value: {0}")]
    InvalidNonceValue(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("Report processing error: {0}")]
    ReportError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Missing request nonce; is NonceMiddleware installed?")]
    MissingNonce,
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDirectiveValue(_)
            | Self::InvalidNonceValue(_)
            | Self::ReportError(_)
            | Self::ConfigError(_) => StatusCode::BAD_REQUEST,

            Self::CryptoError(_)
            | Self::SerializationError(_)
            | Self::HeaderError(_)
            | Self::RenderError(_)
            | Self::TemplateError(_)
            | Self::MissingNonce => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An expected, routed failure such as a missing page. It carries the status
/// it should be answered with and optional structured data for the error
/// render.
#[derive(Debug, Clone)]
pub struct RouteError {
    status: StatusCode,
    status_text: String,
    data: Value,
}

impl RouteError {
    pub fn new(status: StatusCode, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            data: Value::Null,
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    #[inline]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    #[inline]
    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.status_text)
    }
}

impl std::error::Error for RouteError {}

impl ResponseError for RouteError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        if self.data.is_null() {
            HttpResponse::build(self.status).body(self.status_text.clone())
        } else {
            HttpResponse::build(self.status).json(&self.data)
        }
    }
}
