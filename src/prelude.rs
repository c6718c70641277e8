pub use crate::client::{attach_inline_script, inline_style, ClientNonce, Document, MemoryDocument};
pub use crate::core::{CspConfig, CspConfigBuilder, CspPolicy, CspPolicyBuilder, Environment, Source};
pub use crate::error::{CspError, RouteError};
pub use crate::middleware::{configure_csp, CspExtensions, NonceMiddleware};
pub use crate::render::{render_route, use_nonce, ErrorView, RenderPayload};
pub use crate::security::{NonceGenerator, RequestNonce};
