#![allow(dead_code)]

use actix_web::dev::ServiceResponse;
use csp_nonce::{CspConfig, CspConfigBuilder, Environment};

pub fn config(env: Environment) -> CspConfig {
    CspConfigBuilder::new().environment(env).build()
}

pub fn csp_header(res: &ServiceResponse) -> Option<String> {
    res.headers()
        .get("content-security-policy")
        .or_else(|| res.headers().get("content-security-policy-report-only"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// The value of the first `'nonce-…'` source in a policy.
pub fn nonce_in_policy(policy: &str) -> Option<String> {
    let start = policy.find("'nonce-")? + "'nonce-".len();
    let end = policy[start..].find('\'')? + start;
    Some(policy[start..end].to_owned())
}
