pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";
pub(crate) const HEADER_HSTS: &str = "strict-transport-security";
pub(crate) const HEADER_FRAME_OPTIONS: &str = "x-frame-options";
pub(crate) const HEADER_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";

pub(crate) const HSTS_VALUE: &str = "max-age=3600";
pub(crate) const FRAME_OPTIONS_VALUE: &str = "SAMEORIGIN";
pub(crate) const CONTENT_TYPE_OPTIONS_VALUE: &str = "nosniff";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const FRAME_ANCESTORS: &str = "frame-ancestors";
pub(crate) const BASE_URI: &str = "base-uri";
pub(crate) const FORM_ACTION: &str = "form-action";

pub(crate) const REPORT_URI: &str = "report-uri";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";
pub(crate) const SEMICOLON_SPACE: &[u8] = b"; ";

pub(crate) const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com";
pub(crate) const GOOGLE_FONTS_FILES: &str = "https://fonts.gstatic.com";

pub(crate) const DEFAULT_NONCE_LENGTH: usize = 16;
pub(crate) const MIN_NONCE_LENGTH: usize = 8;
pub(crate) const MAX_NONCE_LENGTH: usize = 64;
pub(crate) const DEFAULT_MAX_REPORT_SIZE: usize = 16 * 1024;
pub(crate) const DEFAULT_REPORT_PATH: &str = "/csp-report";
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Route id under which the root loader publishes its data.
pub const ROOT_ROUTE_ID: &str = "root";
/// Global the serialized render payload is assigned to in the page.
pub const RENDER_CONTEXT_GLOBAL: &str = "__RENDER_CONTEXT__";
pub const ENV_VAR_APP_ENV: &str = "APP_ENV";
