use crate::constants::{
    CONTENT_TYPE_OPTIONS_VALUE, FRAME_OPTIONS_VALUE, HEADER_CONTENT_TYPE_OPTIONS,
    HEADER_FRAME_OPTIONS, HEADER_HSTS, HSTS_VALUE,
};
use crate::core::policy::CspPolicy;
use crate::error::CspError;
use actix_http::header::{HeaderMap, HeaderName, HeaderValue};
use smallvec::SmallVec;

/// The headers attached to one response: the CSP header carrying the
/// request's nonce, plus transport, framing and sniffing protection.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: SmallVec<[(HeaderName, HeaderValue); 4]>,
}

impl SecurityHeaders {
    pub fn for_request(policy: &CspPolicy, nonce: &str) -> Result<Self, CspError> {
        let mut headers = SmallVec::new();
        headers.push((policy.header_name(), policy.header_value(nonce)?));
        headers.push((
            HeaderName::from_static(HEADER_HSTS),
            HeaderValue::from_static(HSTS_VALUE),
        ));
        headers.push((
            HeaderName::from_static(HEADER_FRAME_OPTIONS),
            HeaderValue::from_static(FRAME_OPTIONS_VALUE),
        ));
        headers.push((
            HeaderName::from_static(HEADER_CONTENT_TYPE_OPTIONS),
            HeaderValue::from_static(CONTENT_TYPE_OPTIONS_VALUE),
        ));
        Ok(Self { headers })
    }

    /// Writes every header, replacing values the handler may have set.
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }
}
