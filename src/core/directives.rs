use crate::core::source::Source;
use crate::error::CspError;
use crate::utils::BufferWriter;
use bytes::BytesMut;
use smallvec::SmallVec;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directive {
    name: Cow<'static, str>,
    sources: SmallVec<[Source; 4]>,
}

impl Directive {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sources: SmallVec::new(),
        }
    }

    /// Adds a source. `'none'` replaces every other source, and any other
    /// source replaces a lone `'none'`. Duplicates are ignored.
    pub fn add_source(&mut self, source: Source) -> &mut Self {
        if source.is_none() || self.sources.first().is_some_and(Source::is_none) {
            self.sources.clear();
            self.sources.push(source);
        } else if !self.sources.contains(&source) {
            self.sources.push(source);
        }
        self
    }

    pub fn add_sources<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        for source in sources {
            self.add_source(source);
        }
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        self.sources.iter().any(Source::is_request_nonce)
    }

    pub fn estimated_size(&self, nonce_len: usize) -> usize {
        self.name.len()
            + self
                .sources
                .iter()
                .map(|s| s.estimated_size(nonce_len) + 1)
                .sum::<usize>()
    }

    pub fn validate(&self) -> Result<(), CspError> {
        if self.name.is_empty()
            || !self
                .name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b == b'-')
        {
            return Err(CspError::InvalidDirectiveValue(format!(
                "invalid directive name {:?}",
                self.name
            )));
        }

        for source in &self.sources {
            let text = match source {
                Source::Host(value) | Source::Scheme(value) => value,
                _ => continue,
            };
            if text.is_empty() || text.bytes().any(|b| b == b';' || b == b',' || b.is_ascii_whitespace()) {
                return Err(CspError::InvalidDirectiveValue(format!(
                    "invalid source {:?} in {}",
                    text, self.name
                )));
            }
        }

        Ok(())
    }
}

impl BufferWriter for Directive {
    fn write_to_buffer(&self, buffer: &mut BytesMut, nonce: &str) {
        buffer.extend_from_slice(self.name.as_bytes());
        for source in &self.sources {
            buffer.extend_from_slice(b" ");
            source.write_to_buffer(buffer, nonce);
        }
    }
}
