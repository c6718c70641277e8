use crate::constants::ROOT_ROUTE_ID;
use crate::error::CspError;
use crate::middleware::extensions::CspExtensions;
use crate::render::error_boundary::ErrorView;
use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Data the root route hands to the page: the request's nonce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootLoaderData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Root loader: publishes the nonce the middleware stored for this request.
pub fn root_loader(req: &HttpRequest) -> RootLoaderData {
    RootLoaderData {
        nonce: req.get_nonce(),
    }
}

/// Everything the server render passes to the client, keyed by route id.
/// Error renders carry the error view and no loader data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    #[serde(rename = "loaderData", default)]
    loader_data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorView>,
}

impl RenderPayload {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload for a successful render of the root route.
    pub fn for_request(req: &HttpRequest) -> Result<Self, CspError> {
        Self::new().with_loader_data(ROOT_ROUTE_ID, &root_loader(req))
    }

    /// Payload for an error render. Loader data is never exposed alongside
    /// an error.
    pub fn for_error(error: ErrorView) -> Self {
        Self {
            loader_data: Map::new(),
            error: Some(error),
        }
    }

    pub fn with_loader_data<T: Serialize>(
        mut self,
        route_id: &str,
        data: &T,
    ) -> Result<Self, CspError> {
        self.loader_data
            .insert(route_id.to_owned(), serde_json::to_value(data)?);
        Ok(self)
    }

    #[inline]
    pub fn loader_data(&self, route_id: &str) -> Option<&Value> {
        self.loader_data.get(route_id)
    }

    #[inline]
    pub fn error(&self) -> Option<&ErrorView> {
        self.error.as_ref()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_json(&self) -> Result<String, CspError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CspError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reads the nonce out of a render payload. Returns `None` rather than
/// failing when the payload is an error render, has no root data, or the
/// root data carries no string nonce.
pub fn use_nonce(payload: &RenderPayload) -> Option<String> {
    if payload.is_error() {
        return None;
    }

    payload
        .loader_data(ROOT_ROUTE_ID)?
        .as_object()?
        .get("nonce")?
        .as_str()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_string_nonce_from_root() {
        let payload = RenderPayload::new()
            .with_loader_data(ROOT_ROUTE_ID, &json!({ "nonce": "n0nce" }))
            .unwrap();
        assert_eq!(use_nonce(&payload).as_deref(), Some("n0nce"));
    }

    #[test]
    fn ignores_non_string_nonce() {
        let payload = RenderPayload::new()
            .with_loader_data(ROOT_ROUTE_ID, &json!({ "nonce": 42 }))
            .unwrap();
        assert_eq!(use_nonce(&payload), None);

        let payload = RenderPayload::new()
            .with_loader_data(ROOT_ROUTE_ID, &json!("nonce"))
            .unwrap();
        assert_eq!(use_nonce(&payload), None);
    }

    #[test]
    fn nonce_of_other_route_is_not_used() {
        let payload = RenderPayload::new()
            .with_loader_data("welcome", &json!({ "nonce": "elsewhere" }))
            .unwrap();
        assert_eq!(use_nonce(&payload), None);
    }

    #[test]
    fn absent_nonce_serializes_to_empty_object() {
        let payload = RenderPayload::new()
            .with_loader_data(ROOT_ROUTE_ID, &RootLoaderData::default())
            .unwrap();
        assert_eq!(payload.loader_data(ROOT_ROUTE_ID), Some(&json!({})));
        assert_eq!(use_nonce(&payload), None);
    }
}
