pub mod headers;
pub mod nonce;

pub use headers::SecurityHeaders;
pub use nonce::{NonceGenerator, RequestNonce};
