use crate::core::config::Environment;
use crate::error::{CspError, RouteError};
use actix_web::http::StatusCode;
use askama::Template;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::Write;

pub(crate) const GENERIC_MESSAGE: &str = "Oops!";
pub(crate) const GENERIC_DETAILS: &str = "An unexpected error occurred.";
pub(crate) const NOT_FOUND_DETAILS: &str = "The requested page could not be found.";

/// What the error page shows for a failed render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorView {
    pub status: u16,
    pub message: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorView {
    pub fn from_route_error(error: &RouteError) -> Self {
        let status = error.status();
        if status == StatusCode::NOT_FOUND {
            return Self {
                status: status.as_u16(),
                message: "404".to_owned(),
                details: NOT_FOUND_DETAILS.to_owned(),
                stack: None,
            };
        }

        let details = if error.status_text().is_empty() {
            GENERIC_DETAILS.to_owned()
        } else {
            error.status_text().to_owned()
        };

        Self {
            status: status.as_u16(),
            message: "Error".to_owned(),
            details,
            stack: None,
        }
    }

    /// Classifies any error. Routed errors are shown as such; anything else
    /// only reveals its message and source chain in development.
    pub fn from_error(error: &(dyn StdError + 'static), env: Environment) -> Self {
        if let Some(route_error) = error.downcast_ref::<RouteError>() {
            return Self::from_route_error(route_error);
        }

        if env.is_development() {
            Self::unexpected(error.to_string(), Some(source_chain(error)))
        } else {
            Self::unexpected(GENERIC_DETAILS.to_owned(), None)
        }
    }

    pub fn from_actix_error(error: &actix_web::Error, env: Environment) -> Self {
        if let Some(route_error) = error.as_error::<RouteError>() {
            return Self::from_route_error(route_error);
        }

        let mut view = if env.is_development() {
            Self::unexpected(error.to_string(), Some(format!("{:?}", error)))
        } else {
            Self::unexpected(GENERIC_DETAILS.to_owned(), None)
        };
        view.status = error.as_response_error().status_code().as_u16();
        view
    }

    fn unexpected(details: String, stack: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: GENERIC_MESSAGE.to_owned(),
            details,
            stack,
        }
    }

    #[inline]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn render_html(&self) -> Result<String, CspError> {
        let template = ErrorBoundaryTemplate {
            message: &self.message,
            details: &self.details,
            stack: self.stack.as_deref(),
        };
        Ok(template.render()?)
    }
}

#[derive(Template)]
#[template(path = "error_boundary.html")]
struct ErrorBoundaryTemplate<'a> {
    message: &'a str,
    details: &'a str,
    stack: Option<&'a str>,
}

fn source_chain(error: &(dyn StdError + 'static)) -> String {
    let mut out = format!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(out, "\n    caused by: {}", cause);
        source = cause.source();
    }
    out
}
