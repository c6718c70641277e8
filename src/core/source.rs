use crate::constants::{NONCE_PREFIX, NONE_SOURCE, SELF_SOURCE, STRICT_DYNAMIC_SOURCE, SUFFIX_QUOTE};
use crate::utils::BufferWriter;
use bytes::BytesMut;
use std::borrow::Cow;

/// A single source expression in a directive.
///
/// `RequestNonce` is a placeholder: it is rendered as `'nonce-<value>'` with
/// the nonce of the request the header is being built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    None,
    Self_,
    StrictDynamic,
    RequestNonce,
    Host(Cow<'static, str>),
    Scheme(Cow<'static, str>),
}

impl Source {
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, Source::None)
    }

    #[inline]
    pub const fn is_request_nonce(&self) -> bool {
        matches!(self, Source::RequestNonce)
    }

    pub fn estimated_size(&self, nonce_len: usize) -> usize {
        match self {
            Source::None => NONE_SOURCE.len(),
            Source::Self_ => SELF_SOURCE.len(),
            Source::StrictDynamic => STRICT_DYNAMIC_SOURCE.len(),
            Source::RequestNonce => NONCE_PREFIX.len() + nonce_len + SUFFIX_QUOTE.len(),
            Source::Host(host) => host.len(),
            Source::Scheme(scheme) => scheme.len() + 1,
        }
    }
}

impl BufferWriter for Source {
    fn write_to_buffer(&self, buffer: &mut BytesMut, nonce: &str) {
        match self {
            Source::None => buffer.extend_from_slice(NONE_SOURCE.as_bytes()),
            Source::Self_ => buffer.extend_from_slice(SELF_SOURCE.as_bytes()),
            Source::StrictDynamic => buffer.extend_from_slice(STRICT_DYNAMIC_SOURCE.as_bytes()),
            Source::RequestNonce => {
                buffer.reserve(NONCE_PREFIX.len() + nonce.len() + SUFFIX_QUOTE.len());
                buffer.extend_from_slice(NONCE_PREFIX.as_bytes());
                buffer.extend_from_slice(nonce.as_bytes());
                buffer.extend_from_slice(SUFFIX_QUOTE.as_bytes());
            }
            Source::Host(host) => buffer.extend_from_slice(host.as_bytes()),
            Source::Scheme(scheme) => {
                buffer.extend_from_slice(scheme.as_bytes());
                buffer.extend_from_slice(b":");
            }
        }
    }
}
