//! Workflow engine for an internship (PKL) training platform.
//!
//! The crate is organized around one workflow family, `workflows::internship`,
//! which covers admission decisions, document review, assessment, and
//! certificate issuance. Supporting modules provide configuration, telemetry,
//! and the HTTP-facing error type used by the API service.

pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
