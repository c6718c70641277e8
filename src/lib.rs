pub mod client;
pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
#[cfg(feature = "reporting")]
pub mod monitoring;
pub mod prelude;
pub mod render;
pub mod routes;
pub mod security;
pub mod utils;

// Re-export commonly used types for convenience
pub use client::{attach_inline_script, inline_style, ClientNonce, HydrationFlag, InlineNodeGuard};
pub use crate::core::{CspConfig, CspConfigBuilder, CspPolicy, CspPolicyBuilder, Environment, Source};
pub use error::{CspError, RouteError};
pub use middleware::{configure_csp, CspExtensions, NonceMiddleware};
#[cfg(feature = "reporting")]
pub use middleware::configure_csp_reporting;
#[cfg(feature = "reporting")]
pub use monitoring::CspViolationReport;
pub use render::{render_route, root_loader, use_nonce, ErrorView, Layout, RenderPayload};
pub use security::{NonceGenerator, RequestNonce, SecurityHeaders};
