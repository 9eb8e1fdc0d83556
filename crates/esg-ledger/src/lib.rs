//! ESG metrics capture and reporting.
//!
//! Users record annual Environmental/Social/Governance figures per fiscal year; the crate
//! persists them through a pluggable [`esg::ResponseStore`], derives the reporting ratios on read,
//! and exposes the whole flow through an axum router.

pub mod config;
pub mod error;
pub mod esg;
pub mod identity;
pub mod telemetry;
