use crate::constants::DEFAULT_MAX_REPORT_SIZE;
use crate::core::config::CspConfig;
use crate::error::CspError;
use crate::monitoring::report::CspViolationReport;
use actix_web::{
    web::{self, Data},
    HttpRequest, HttpResponse,
};
use bytes::BytesMut;
use futures::StreamExt;

/// Accepts a browser violation report and logs it. Report-only policies point
/// their `report-uri` here, so in development this is where blocked inline
/// content shows up.
pub async fn csp_report_handler(
    req: HttpRequest,
    payload: web::Payload,
    config: Option<Data<CspConfig>>,
) -> Result<HttpResponse, CspError> {
    let max_size = config
        .as_ref()
        .map_or(DEFAULT_MAX_REPORT_SIZE, |c| c.max_report_size());
    let body = read_limited(payload, max_size).await?;

    match process_violation_report(&body)? {
        Some(report) => {
            log::warn!(
                "CSP violation ({}): {} blocked {} on {}",
                if report.is_report() { "report-only" } else { "enforced" },
                report.effective_directive_or_violated(),
                report.blocked_uri,
                report.document_uri
            );
        }
        None => {
            log::debug!(
                "CSP violation report from {:?} missing 'csp-report' field",
                req.peer_addr()
            );
        }
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Reads the request body, giving up as soon as it grows past `limit` so an
/// oversized report is answered with a 400 without being buffered whole.
async fn read_limited(mut payload: web::Payload, limit: usize) -> Result<BytesMut, CspError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| CspError::ReportError(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(CspError::ReportError(format!(
                "report exceeds limit of {} bytes",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

pub(crate) fn process_violation_report(
    bytes: &[u8],
) -> Result<Option<CspViolationReport>, CspError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CspError::ReportError(e.to_string()))?;

    match json.get("csp-report") {
        Some(csp_report) => serde_json::from_value::<CspViolationReport>(csp_report.clone())
            .map(Some)
            .map_err(|e| CspError::ReportError(e.to_string())),
        None => Ok(None),
    }
}

impl CspViolationReport {
    fn effective_directive_or_violated(&self) -> &str {
        if self.effective_directive.is_empty() {
            &self.violated_directive
        } else {
            &self.effective_directive
        }
    }
}

/// Registers the report endpoint at the config's report path. Browsers post
/// reports as `application/csp-report`, so the body is read as a raw stream.
pub fn configure_csp_reporting(config: &CspConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    let path = config.report_path().to_owned();
    move |cfg| {
        cfg.service(web::resource(path).route(web::post().to(csp_report_handler)));
    }
}
