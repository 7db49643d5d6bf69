//! Admission fee wizard: look up an applicant, review the invoice, attach a
//! payment receipt and confirm submission.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
