use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AdminId, Application, ApplicationId, Assessment, Certificate, Document, DocumentId, Position,
    PositionId,
};

/// Storage abstraction for the internship workflow.
///
/// Every transition is applied as one whole-record write, so an
/// implementation that makes each method atomic cannot observe a
/// half-applied decision. `insert_certificate` enforces the
/// at-most-one-per-application key and reports a duplicate as `Conflict`.
pub trait InternshipRepository: Send + Sync {
    fn insert_position(&self, position: Position) -> Result<Position, RepositoryError>;
    fn position(&self, id: &PositionId) -> Result<Option<Position>, RepositoryError>;
    /// Approved applications currently pointing at the position. Computed
    /// live; the count is never stored on the position record.
    fn count_approved_for(&self, id: &PositionId) -> Result<usize, RepositoryError>;

    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;

    fn insert_document(&self, document: Document) -> Result<Document, RepositoryError>;
    fn document(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;
    fn update_document(&self, document: Document) -> Result<(), RepositoryError>;
    fn documents_for(&self, id: &ApplicationId) -> Result<Vec<Document>, RepositoryError>;

    fn assessment_for(&self, id: &ApplicationId) -> Result<Option<Assessment>, RepositoryError>;
    fn upsert_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError>;

    fn certificate_for(&self, id: &ApplicationId)
        -> Result<Option<Certificate>, RepositoryError>;
    fn insert_certificate(&self, certificate: Certificate)
        -> Result<Certificate, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound audit hook. Entries are informational; the workflow does not
/// read them back.
pub trait AuditTrail: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AdmissionDecided,
    DocumentReviewed,
    AssessmentRecorded,
    CertificateIssued,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AdmissionDecided => "admission_decided",
            Self::DocumentReviewed => "document_reviewed",
            Self::AssessmentRecorded => "assessment_recorded",
            Self::CertificateIssued => "certificate_issued",
        }
    }
}

/// One recorded workflow transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub application_id: ApplicationId,
    pub actor: AdminId,
    pub details: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Sink(String),
}
