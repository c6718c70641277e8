use serde::{Deserialize, Serialize};

/// A violation report as browsers post it to `report-uri` endpoints. Browsers
/// disagree on which fields they send, so everything but the directive is
/// optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CspViolationReport {
    #[serde(rename = "document-uri", default)]
    pub document_uri: String,

    #[serde(default)]
    pub referrer: String,

    #[serde(rename = "blocked-uri", default)]
    pub blocked_uri: String,

    #[serde(rename = "violated-directive")]
    pub violated_directive: String,

    #[serde(rename = "effective-directive", default)]
    pub effective_directive: String,

    #[serde(rename = "original-policy", default)]
    pub original_policy: String,

    #[serde(default)]
    pub disposition: String,

    #[serde(rename = "source-file", skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(rename = "line-number", skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    #[serde(rename = "script-sample", skip_serializing_if = "Option::is_none")]
    pub script_sample: Option<String>,
}

impl CspViolationReport {
    #[inline]
    pub fn is_report(&self) -> bool {
        self.disposition == "report"
    }
}
