pub mod report;

pub use report::CspViolationReport;
