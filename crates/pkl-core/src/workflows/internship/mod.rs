//! Internship (PKL) lifecycle workflow.
//!
//! Admission decisions, placement scheduling, document review, supervisor
//! assessment, and certificate issuance, behind a service facade and an HTTP
//! router. Storage and audit sinks are trait ports so the workflow can be
//! exercised against in-memory fakes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AdminId, Application, ApplicationId, ApplicationStatus, Assessment, Certificate,
    CertificateId, Document, DocumentId, DocumentKind, DocumentStatus, EngagementType,
    PlacementPhase, Position, PositionId, PositionStatus, UserId,
};
pub use repository::{
    AuditAction, AuditEntry, AuditError, AuditTrail, InternshipRepository, RepositoryError,
};
pub use router::internship_router;
pub use schedule::{placement_period, placement_phase, PlacementPeriod, ScheduleError};
pub use service::{
    AdmissionDecision, AdmissionRuling, AssessmentForm, CertificateRequest, DocumentReview,
    EntityKind, FieldError, FieldErrors, InternshipService, PreconditionFailure, ReviewVerdict,
    WorkflowConfig, WorkflowError,
};
pub use views::{
    ApplicationDetailView, AssessmentView, CertificateStatusView, CertificateView, DocumentView,
    PositionView,
};
