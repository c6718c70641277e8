pub mod csp;
pub mod extensions;
#[cfg(feature = "reporting")]
pub mod reporting;

pub use csp::{configure_csp, NonceMiddleware, NonceMiddlewareService};
pub use extensions::{CspExtensions, RequestId};
#[cfg(feature = "reporting")]
pub use reporting::{configure_csp_reporting, csp_report_handler};
