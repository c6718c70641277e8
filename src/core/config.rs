use crate::constants::{DEFAULT_MAX_REPORT_SIZE, DEFAULT_NONCE_LENGTH, DEFAULT_REPORT_PATH, ENV_VAR_APP_ENV};
use crate::core::policy::CspPolicy;
use crate::error::CspError;
use crate::security::nonce::NonceGenerator;
use actix_web::http::header::HeaderName;
use std::borrow::Cow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Reads `APP_ENV`, falling back to the build profile when it is unset.
    pub fn from_env() -> Self {
        match std::env::var(ENV_VAR_APP_ENV) {
            Ok(value) => value.parse().unwrap_or(Environment::Development),
            Err(_) => Self::from_build(),
        }
    }

    #[inline]
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    #[inline]
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    #[inline]
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => Err(CspError::ConfigError(format!("unknown environment {:?}", other))),
        }
    }
}

/// Read-only settings shared by every request the middleware handles.
#[derive(Debug, Clone)]
pub struct CspConfig {
    environment: Environment,
    policy: CspPolicy,
    nonce_generator: NonceGenerator,
    report_path: Cow<'static, str>,
    max_report_size: usize,
}

impl CspConfig {
    pub fn new(environment: Environment) -> Self {
        CspConfigBuilder::new().environment(environment).build()
    }

    #[inline]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[inline]
    pub fn policy(&self) -> &CspPolicy {
        &self.policy
    }

    #[inline]
    pub fn nonce_generator(&self) -> &NonceGenerator {
        &self.nonce_generator
    }

    /// `Content-Security-Policy` in production, the report-only header
    /// everywhere else.
    #[inline]
    pub fn header_name(&self) -> HeaderName {
        self.policy.header_name()
    }

    #[inline]
    pub fn report_path(&self) -> &str {
        &self.report_path
    }

    #[inline]
    pub fn max_report_size(&self) -> usize {
        self.max_report_size
    }
}

impl Default for CspConfig {
    fn default() -> Self {
        CspConfigBuilder::new().build()
    }
}

#[derive(Debug, Default)]
pub struct CspConfigBuilder {
    environment: Option<Environment>,
    policy: Option<CspPolicy>,
    nonce_length: Option<usize>,
    report_path: Option<Cow<'static, str>>,
    max_report_size: Option<usize>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Replaces the application policy. Whether it is enforced or only
    /// reported is still decided by the environment.
    #[inline]
    pub fn policy(mut self, policy: CspPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    #[inline]
    pub fn with_nonce_length(mut self, length: usize) -> Self {
        self.nonce_length = Some(length);
        self
    }

    #[inline]
    pub fn with_report_path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    #[inline]
    pub fn with_max_report_size(mut self, size: usize) -> Self {
        self.max_report_size = Some(size);
        self
    }

    pub fn build(self) -> CspConfig {
        let environment = self.environment.unwrap_or_else(Environment::from_env);
        let report_path = self
            .report_path
            .unwrap_or(Cow::Borrowed(DEFAULT_REPORT_PATH));
        let mut policy = self
            .policy
            .unwrap_or_else(|| CspPolicy::for_environment(environment, &report_path));
        policy.set_report_only(!environment.is_production());

        CspConfig {
            environment,
            policy,
            nonce_generator: NonceGenerator::new(self.nonce_length.unwrap_or(DEFAULT_NONCE_LENGTH)),
            report_path,
            max_report_size: self.max_report_size.unwrap_or(DEFAULT_MAX_REPORT_SIZE),
        }
    }

    /// Like [`build`](Self::build) but rejects what `build` would silently
    /// correct: a nonce width outside 8..=64 bytes, an invalid policy, or a
    /// policy with no nonce source at all.
    pub fn try_build(self) -> Result<CspConfig, CspError> {
        if let Some(length) = self.nonce_length {
            if !NonceGenerator::is_valid_length(length) {
                return Err(CspError::ConfigError(format!(
                    "nonce length {} is outside 8..=64 bytes",
                    length
                )));
            }
        }
        let config = self.build();
        config.policy.validate()?;
        if !config.policy.contains_nonce() {
            return Err(CspError::ConfigError(
                "policy has no nonce source".to_owned(),
            ));
        }
        Ok(config)
    }
}
