use crate::constants::{DEFAULT_NONCE_LENGTH, MAX_NONCE_LENGTH, MIN_NONCE_LENGTH};
use crate::error::CspError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use getrandom::getrandom;
use smallvec::{smallvec, SmallVec};
use std::{fmt, ops::Deref};

/// Produces fresh, unpredictable nonces from the operating system's random
/// source. The generator holds no state besides the token width, so a single
/// instance can be shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceGenerator {
    length: usize,
}

impl NonceGenerator {
    /// A generator drawing `length` random bytes per nonce. Widths outside
    /// 8..=64 bytes are clamped into that range; an empty or short nonce
    /// would be guessable.
    pub fn new(length: usize) -> Self {
        let clamped = length.clamp(MIN_NONCE_LENGTH, MAX_NONCE_LENGTH);
        if clamped != length {
            log::warn!(
                "nonce length {} out of range, using {} bytes",
                length,
                clamped
            );
        }
        Self { length: clamped }
    }

    /// Whether `length` is accepted by [`new`](Self::new) without clamping.
    #[inline]
    pub fn is_valid_length(length: usize) -> bool {
        (MIN_NONCE_LENGTH..=MAX_NONCE_LENGTH).contains(&length)
    }

    /// Draws `length` random bytes and encodes them as unpadded base64url.
    pub fn generate(&self) -> Result<RequestNonce, CspError> {
        let mut buffer: SmallVec<[u8; 32]> = smallvec![0u8; self.length];
        getrandom(&mut buffer).map_err(|e| CspError::CryptoError(e.to_string()))?;
        Ok(RequestNonce(BASE64.encode(&buffer)))
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}

/// The nonce assigned to the request currently being handled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestNonce(pub String);

impl RequestNonce {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for RequestNonce {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for RequestNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RequestNonce> for String {
    fn from(nonce: RequestNonce) -> Self {
        nonce.0
    }
}
