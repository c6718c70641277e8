use crate::constants::{
    BASE_URI, CONNECT_SRC, DEFAULT_BUFFER_CAPACITY, DEFAULT_SRC, FONT_SRC, FORM_ACTION,
    FRAME_ANCESTORS, GOOGLE_FONTS_CSS, GOOGLE_FONTS_FILES, HEADER_CSP, HEADER_CSP_REPORT_ONLY,
    IMG_SRC, OBJECT_SRC, REPORT_URI, SCRIPT_SRC, SEMICOLON_SPACE, STYLE_SRC,
};
use crate::core::config::Environment;
use crate::core::directives::Directive;
use crate::core::source::Source;
use crate::error::CspError;
use crate::utils::BufferWriter;
use actix_web::http::header::{HeaderName, HeaderValue};
use bytes::BytesMut;
use indexmap::IndexMap;
use std::borrow::Cow;

/// A fixed policy template. Directives keep their insertion order, and any
/// [`Source::RequestNonce`] is filled in when the header value is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspPolicy {
    directives: IndexMap<Cow<'static, str>, Directive>,
    report_only: bool,
    report_uri: Option<Cow<'static, str>>,
}

impl CspPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's policy: nonce-gated scripts and styles, Google Fonts,
    /// and no plugins. Development adds websocket connections for the asset
    /// server and reports violations instead of enforcing them, to the report
    /// endpoint when the `reporting` feature is on.
    pub fn for_environment(env: Environment, report_path: &str) -> Self {
        let mut connect = vec![Source::Self_];
        if env.is_development() {
            connect.push(Source::Scheme(Cow::Borrowed("ws")));
        }

        let mut builder = CspPolicyBuilder::new()
            .default_src([Source::Self_])
            .script_src([Source::Self_, Source::RequestNonce, Source::StrictDynamic])
            .style_src([
                Source::Self_,
                Source::RequestNonce,
                Source::Host(Cow::Borrowed(GOOGLE_FONTS_CSS)),
            ])
            .font_src([Source::Self_, Source::Host(Cow::Borrowed(GOOGLE_FONTS_FILES))])
            .img_src([Source::Self_, Source::Scheme(Cow::Borrowed("data"))])
            .connect_src(connect)
            .object_src([Source::None])
            .base_uri([Source::Self_])
            .frame_ancestors([Source::Self_])
            .form_action([Source::Self_])
            .report_only(!env.is_production());

        if !env.is_production() && cfg!(feature = "reporting") {
            builder = builder.report_uri(report_path.to_owned());
        }

        builder.build_unchecked()
    }

    pub fn add_directive(&mut self, directive: Directive) -> &mut Self {
        let name = directive.name().to_owned();
        self.directives.insert(Cow::Owned(name), directive);
        self
    }

    #[inline]
    pub fn set_report_only(&mut self, report_only: bool) -> &mut Self {
        self.report_only = report_only;
        self
    }

    pub fn set_report_uri(&mut self, uri: impl Into<Cow<'static, str>>) -> &mut Self {
        self.report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            HeaderName::from_static(HEADER_CSP_REPORT_ONLY)
        } else {
            HeaderName::from_static(HEADER_CSP)
        }
    }

    /// Serializes the policy for one request, substituting `nonce` for every
    /// nonce placeholder.
    pub fn header_value(&self, nonce: &str) -> Result<HeaderValue, CspError> {
        if !nonce
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_'))
        {
            return Err(CspError::InvalidNonceValue(nonce.to_owned()));
        }

        let capacity = self.estimated_size(nonce.len()).max(DEFAULT_BUFFER_CAPACITY);
        let mut buffer = BytesMut::with_capacity(capacity);

        let mut first = true;
        for directive in self.directives.values() {
            if !first {
                buffer.extend_from_slice(SEMICOLON_SPACE);
            }
            directive.write_to_buffer(&mut buffer, nonce);
            first = false;
        }

        if let Some(uri) = &self.report_uri {
            if !first {
                buffer.extend_from_slice(SEMICOLON_SPACE);
            }
            buffer.extend_from_slice(REPORT_URI.as_bytes());
            buffer.extend_from_slice(b" ");
            buffer.extend_from_slice(uri.as_bytes());
        }

        HeaderValue::from_maybe_shared(buffer.freeze())
            .map_err(|e| CspError::HeaderError(e.to_string()))
    }

    fn estimated_size(&self, nonce_len: usize) -> usize {
        self.directives
            .values()
            .map(|d| d.estimated_size(nonce_len) + SEMICOLON_SPACE.len())
            .sum::<usize>()
            + self
                .report_uri
                .as_ref()
                .map_or(0, |u| REPORT_URI.len() + 1 + u.len())
    }

    pub fn validate(&self) -> Result<(), CspError> {
        for directive in self.directives.values() {
            directive.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.report_only
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        self.directives.values().any(Directive::contains_nonce)
    }
}

#[derive(Debug, Default)]
pub struct CspPolicyBuilder {
    policy: CspPolicy,
}

impl CspPolicyBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.policy.add_directive(directive);
        self
    }

    fn directive(self, name: &'static str, sources: impl IntoIterator<Item = Source>) -> Self {
        let mut directive = Directive::new(name);
        directive.add_sources(sources);
        self.with_directive(directive)
    }

    pub fn default_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(DEFAULT_SRC, sources)
    }

    pub fn script_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(SCRIPT_SRC, sources)
    }

    pub fn style_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(STYLE_SRC, sources)
    }

    pub fn img_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(IMG_SRC, sources)
    }

    pub fn connect_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(CONNECT_SRC, sources)
    }

    pub fn font_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(FONT_SRC, sources)
    }

    pub fn object_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(OBJECT_SRC, sources)
    }

    pub fn frame_ancestors(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(FRAME_ANCESTORS, sources)
    }

    pub fn base_uri(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(BASE_URI, sources)
    }

    pub fn form_action(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(FORM_ACTION, sources)
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.policy.set_report_uri(uri);
        self
    }

    #[inline]
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.policy.set_report_only(enabled);
        self
    }

    pub fn build(self) -> Result<CspPolicy, CspError> {
        self.policy.validate()?;
        Ok(self.policy)
    }

    #[inline]
    pub fn build_unchecked(self) -> CspPolicy {
        self.policy
    }
}
