pub mod config;
pub mod directives;
pub mod policy;
pub mod source;

pub use config::{CspConfig, CspConfigBuilder, Environment};
pub use directives::Directive;
pub use policy::{CspPolicy, CspPolicyBuilder};
pub use source::Source;
