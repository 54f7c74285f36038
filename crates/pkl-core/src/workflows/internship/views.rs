use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{
    AdminId, Application, ApplicationId, ApplicationStatus, Assessment, Certificate,
    CertificateId, Document, DocumentId, DocumentKind, DocumentStatus, EngagementType,
    PlacementPhase, Position, PositionId, PositionStatus, UserId,
};
use super::schedule::PlacementPeriod;

/// Admin-facing view of one application, including the derived phase.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetailView {
    pub application_id: ApplicationId,
    pub user_id: UserId,
    pub position_id: PositionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_name: Option<String>,
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub admin_note: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub period: Option<PlacementPeriod>,
    pub phase: PlacementPhase,
    pub phase_label: &'static str,
}

impl ApplicationDetailView {
    pub(crate) fn assemble(
        application: &Application,
        position_name: Option<String>,
        phase: PlacementPhase,
    ) -> Self {
        Self {
            application_id: application.id,
            user_id: application.user_id,
            position_id: application.position_id,
            position_name,
            status: application.status,
            status_label: application.status.label(),
            admin_note: application.admin_note.clone(),
            applied_at: application.applied_at,
            processed_at: application.processed_at,
            period: application.period,
            phase,
            phase_label: phase.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub document_id: DocumentId,
    pub application_id: ApplicationId,
    pub kind: DocumentKind,
    pub kind_label: &'static str,
    pub link_url: String,
    pub status: DocumentStatus,
    pub status_label: &'static str,
    pub verified: bool,
    pub feedback: Option<String>,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl From<&Document> for DocumentView {
    fn from(document: &Document) -> Self {
        Self {
            document_id: document.id,
            application_id: document.application_id,
            kind: document.kind,
            kind_label: document.kind.label(),
            link_url: document.link_url.clone(),
            status: document.status,
            status_label: document.status.label(),
            verified: document.verified,
            feedback: document.feedback.clone(),
            reviewer: document.reviewer_name.clone(),
            reviewed_at: document.reviewed_at,
            submitted_at: document.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub application_id: ApplicationId,
    pub score: u8,
    pub notes: Option<String>,
    pub scored_by: AdminId,
    pub recorded_at: DateTime<Utc>,
}

impl From<&Assessment> for AssessmentView {
    fn from(assessment: &Assessment) -> Self {
        Self {
            application_id: assessment.application_id,
            score: assessment.score,
            notes: assessment.notes.clone(),
            scored_by: assessment.scored_by,
            recorded_at: assessment.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateView {
    pub certificate_id: CertificateId,
    pub application_id: ApplicationId,
    pub user_id: UserId,
    pub program_name: String,
    pub link: String,
    pub completed_on: NaiveDate,
    pub admin_note: Option<String>,
    pub issued_by: AdminId,
    pub issued_at: DateTime<Utc>,
}

impl From<&Certificate> for CertificateView {
    fn from(certificate: &Certificate) -> Self {
        Self {
            certificate_id: certificate.id,
            application_id: certificate.application_id,
            user_id: certificate.user_id,
            program_name: certificate.program_name.clone(),
            link: certificate.link.clone(),
            completed_on: certificate.completed_on,
            admin_note: certificate.admin_note.clone(),
            issued_by: certificate.issued_by,
            issued_at: certificate.issued_at,
        }
    }
}

/// Answer for the pre-issuance certificate check.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateStatusView {
    pub exists: bool,
    pub certificate: Option<CertificateView>,
}

/// Position view with the approved-applicant count computed at read time.
#[derive(Debug, Clone, Serialize)]
pub struct PositionView {
    pub position_id: PositionId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub engagement: EngagementType,
    pub engagement_label: &'static str,
    pub duration_months: u8,
    pub status: PositionStatus,
    pub status_label: &'static str,
    pub approved_count: usize,
}

impl PositionView {
    pub(crate) fn assemble(position: &Position, approved_count: usize) -> Self {
        Self {
            position_id: position.id,
            name: position.name.clone(),
            category: position.category.clone(),
            description: position.description.clone(),
            requirements: position.requirements.clone(),
            benefits: position.benefits.clone(),
            engagement: position.engagement,
            engagement_label: position.engagement.label(),
            duration_months: position.duration_months,
            status: position.status,
            status_label: position.status.label(),
            approved_count,
        }
    }
}
