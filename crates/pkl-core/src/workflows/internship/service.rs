use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;

use super::domain::{
    AdminId, Application, ApplicationId, ApplicationStatus, Assessment, Certificate,
    CertificateId, DocumentId, DocumentKind, DocumentStatus, PositionId,
};
use super::repository::{
    AuditAction, AuditEntry, AuditError, AuditTrail, InternshipRepository, RepositoryError,
};
use super::schedule::{self, ScheduleError};
use super::views::{
    ApplicationDetailView, AssessmentView, CertificateStatusView, CertificateView, DocumentView,
    PositionView,
};

/// Tunable dials for the admission workflow.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Days between an approval and the week the placement starts in.
    pub decision_lead_days: i64,
    /// Upper bound for admin notes and reviewer feedback.
    pub max_note_chars: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            decision_lead_days: 7,
            max_note_chars: 1000,
        }
    }
}

/// Service composing the repository, audit trail, and clock behind the
/// workflow operations.
pub struct InternshipService<R, A, C> {
    repository: Arc<R>,
    audit: Arc<A>,
    clock: C,
    config: WorkflowConfig,
}

static CERTIFICATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_certificate_id() -> CertificateId {
    CertificateId(CERTIFICATE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Outcome chosen by the admin for one application, as sent by the
/// dashboard ("Disetujui" or "Ditolak").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Approve,
    Reject,
}

impl AdmissionDecision {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Disetujui" => Some(Self::Approve),
            "Ditolak" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Verdict for a document review. The submission screens send
/// "diterima"/"ditolak"; the older review screens sent the English pair, so
/// both vocabularies parse to the same verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Accepted,
    Rejected,
}

impl ReviewVerdict {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "diterima" | "approved" => Some(Self::Accepted),
            "ditolak" | "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    const fn status(self) -> DocumentStatus {
        match self {
            Self::Accepted => DocumentStatus::Accepted,
            Self::Rejected => DocumentStatus::Rejected,
        }
    }
}

/// Admin input for an admission decision.
#[derive(Debug, Clone)]
pub struct AdmissionRuling {
    pub status: String,
    pub note: Option<String>,
}

/// Admin input for a document review.
#[derive(Debug, Clone)]
pub struct DocumentReview {
    pub verdict: String,
    pub feedback: Option<String>,
    pub reviewer_name: String,
}

/// Supervisor input for scoring a placement.
#[derive(Debug, Clone)]
pub struct AssessmentForm {
    pub score: i64,
    pub notes: Option<String>,
}

/// Admin input for issuing a completion certificate.
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub link: String,
    pub completed_on: NaiveDate,
    pub note: Option<String>,
}

/// One field-level validation failure, keyed by the request field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collected validation failures for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), WorkflowError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::Validation(self))
        }
    }

    fn into_error(self) -> WorkflowError {
        WorkflowError::Validation(self)
    }

    /// Field to messages map, the shape the admin forms render inline.
    pub fn as_map(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            map.entry(error.field).or_default().push(error.message.clone());
        }
        map
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Entities referenced by id in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Application,
    Position,
    Document,
}

impl EntityKind {
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Position => "position",
            Self::Document => "document",
        }
    }
}

/// Error raised by the workflow service.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("{} not found", .0.noun())]
    NotFound(EntityKind),
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Business preconditions that must hold before a transition is applied.
#[derive(Debug, thiserror::Error)]
pub enum PreconditionFailure {
    #[error("application is not linked to an existing position")]
    PositionMissing,
    #[error("application has not been approved")]
    ApplicationNotApproved,
    #[error("no accepted laporan-akhir document exists for this application")]
    FinalReportNotAccepted,
    #[error("a certificate has already been issued for this application")]
    CertificateAlreadyIssued,
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl<R, A, C> InternshipService<R, A, C>
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, clock: C, config: WorkflowConfig) -> Self {
        Self {
            repository,
            audit,
            clock,
            config,
        }
    }

    /// Apply an admin's admission decision to one application.
    ///
    /// An approval resolves the linked position and computes the placement
    /// period from the decision date; a rejection records the outcome and
    /// leaves any existing period untouched. The full record is persisted in
    /// one write.
    pub fn decide_admission(
        &self,
        id: &ApplicationId,
        ruling: AdmissionRuling,
        actor: AdminId,
    ) -> Result<ApplicationDetailView, WorkflowError> {
        let mut errors = FieldErrors::default();
        self.check_note(&mut errors, "catatan_admin", &ruling.note);
        let decision = match AdmissionDecision::parse(&ruling.status) {
            Some(decision) => decision,
            None => {
                errors.push("status", "must be either Disetujui or Ditolak");
                return Err(errors.into_error());
            }
        };
        errors.into_result()?;

        let mut application = self
            .repository
            .application(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Application))?;

        let now = self.clock.now();
        match decision {
            AdmissionDecision::Approve => {
                let position = self
                    .repository
                    .position(&application.position_id)?
                    .ok_or(PreconditionFailure::PositionMissing)?;
                let period = schedule::placement_period(
                    now.date_naive(),
                    self.config.decision_lead_days,
                    position.duration_months,
                )?;
                application.status = ApplicationStatus::Approved;
                application.period = Some(period);
            }
            AdmissionDecision::Reject => {
                application.status = ApplicationStatus::Rejected;
            }
        }
        application.admin_note = normalize_note(ruling.note);
        application.processed_at = Some(now);

        self.repository.update_application(application.clone())?;

        let mut details = BTreeMap::new();
        details.insert(
            "decision".to_string(),
            application.status.label().to_string(),
        );
        if decision == AdmissionDecision::Approve {
            if let Some(period) = application.period {
                details.insert("period_start".to_string(), period.start.to_string());
                details.insert("period_end".to_string(), period.end.to_string());
            }
        }
        self.audit.record(AuditEntry {
            action: AuditAction::AdmissionDecided,
            application_id: application.id,
            actor,
            details,
            recorded_at: now,
        })?;

        self.detail_view(&application)
    }

    /// Record a reviewer's verdict on one submitted document.
    ///
    /// Re-review simply overwrites the previous verdict; documents have no
    /// terminal state.
    pub fn review_document(
        &self,
        id: &DocumentId,
        review: DocumentReview,
        actor: AdminId,
    ) -> Result<DocumentView, WorkflowError> {
        let mut errors = FieldErrors::default();
        self.check_note(&mut errors, "feedback_pembimbing", &review.feedback);
        if review.reviewer_name.trim().is_empty() {
            errors.push("assessor", "must not be empty");
        }
        let verdict = match ReviewVerdict::parse(&review.verdict) {
            Some(verdict) => verdict,
            None => {
                errors.push("status_penilaian", "must be either diterima or ditolak");
                return Err(errors.into_error());
            }
        };
        errors.into_result()?;

        let mut document = self
            .repository
            .document(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Document))?;

        let now = self.clock.now();
        document.status = verdict.status();
        document.verified = document.status.is_accepted();
        document.feedback = normalize_note(review.feedback);
        document.reviewer_name = Some(review.reviewer_name.trim().to_string());
        document.reviewed_by = Some(actor);
        document.reviewed_at = Some(now);

        self.repository.update_document(document.clone())?;

        let mut details = BTreeMap::new();
        details.insert("document".to_string(), document.kind.slug().to_string());
        details.insert("verdict".to_string(), document.status.label().to_string());
        self.audit.record(AuditEntry {
            action: AuditAction::DocumentReviewed,
            application_id: document.application_id,
            actor,
            details,
            recorded_at: now,
        })?;

        Ok(DocumentView::from(&document))
    }

    /// Record (or overwrite) the supervisor assessment of an approved
    /// placement.
    pub fn record_assessment(
        &self,
        id: &ApplicationId,
        form: AssessmentForm,
        actor: AdminId,
    ) -> Result<AssessmentView, WorkflowError> {
        let mut errors = FieldErrors::default();
        if !(0..=100).contains(&form.score) {
            errors.push("nilai_akhir", "must be between 0 and 100");
        }
        self.check_note(&mut errors, "catatan", &form.notes);
        errors.into_result()?;

        let application = self
            .repository
            .application(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Application))?;
        if application.status != ApplicationStatus::Approved {
            return Err(PreconditionFailure::ApplicationNotApproved.into());
        }

        let now = self.clock.now();
        let assessment = Assessment {
            application_id: application.id,
            score: form.score as u8,
            notes: normalize_note(form.notes),
            scored_by: actor,
            recorded_at: now,
        };
        self.repository.upsert_assessment(assessment.clone())?;

        let mut details = BTreeMap::new();
        details.insert("score".to_string(), assessment.score.to_string());
        self.audit.record(AuditEntry {
            action: AuditAction::AssessmentRecorded,
            application_id: application.id,
            actor,
            details,
            recorded_at: now,
        })?;

        Ok(AssessmentView::from(&assessment))
    }

    /// Issue the completion certificate for one application.
    ///
    /// Requires an accepted laporan-akhir document and no prior certificate.
    /// The repository uniqueness key backs the existence check, so a racing
    /// duplicate insert still fails.
    pub fn issue_certificate(
        &self,
        id: &ApplicationId,
        request: CertificateRequest,
        actor: AdminId,
    ) -> Result<CertificateView, WorkflowError> {
        let mut errors = FieldErrors::default();
        let link = request.link.trim().to_string();
        if link.is_empty() {
            errors.push("link_sertifikat", "must not be empty");
        } else if !(link.starts_with("https://") || link.starts_with("http://")) {
            errors.push("link_sertifikat", "must be an http(s) URL");
        }
        self.check_note(&mut errors, "catatan_admin", &request.note);
        errors.into_result()?;

        let application = self
            .repository
            .application(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Application))?;

        let documents = self.repository.documents_for(&application.id)?;
        let final_report_accepted = documents.iter().any(|document| {
            document.kind == DocumentKind::FinalReport && document.status.is_accepted()
        });
        if !final_report_accepted {
            return Err(PreconditionFailure::FinalReportNotAccepted.into());
        }
        if self.repository.certificate_for(&application.id)?.is_some() {
            return Err(PreconditionFailure::CertificateAlreadyIssued.into());
        }

        let position = self
            .repository
            .position(&application.position_id)?
            .ok_or(PreconditionFailure::PositionMissing)?;

        let now = self.clock.now();
        let certificate = Certificate {
            id: next_certificate_id(),
            user_id: application.user_id,
            application_id: application.id,
            program_name: position.name,
            link,
            completed_on: request.completed_on,
            admin_note: normalize_note(request.note),
            issued_by: actor,
            issued_at: now,
        };

        let certificate = match self.repository.insert_certificate(certificate) {
            Ok(certificate) => certificate,
            Err(RepositoryError::Conflict) => {
                return Err(PreconditionFailure::CertificateAlreadyIssued.into())
            }
            Err(other) => return Err(other.into()),
        };

        let mut details = BTreeMap::new();
        details.insert("link".to_string(), certificate.link.clone());
        details.insert("program".to_string(), certificate.program_name.clone());
        self.audit.record(AuditEntry {
            action: AuditAction::CertificateIssued,
            application_id: certificate.application_id,
            actor,
            details,
            recorded_at: now,
        })?;

        Ok(CertificateView::from(&certificate))
    }

    /// Whether a certificate exists for the application, and which.
    pub fn certificate_status(
        &self,
        id: &ApplicationId,
    ) -> Result<CertificateStatusView, WorkflowError> {
        let certificate = self.repository.certificate_for(id)?;
        Ok(CertificateStatusView {
            exists: certificate.is_some(),
            certificate: certificate.as_ref().map(CertificateView::from),
        })
    }

    /// Application detail with the phase derived against the current clock.
    pub fn application_detail(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationDetailView, WorkflowError> {
        let application = self
            .repository
            .application(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Application))?;
        self.detail_view(&application)
    }

    /// Documents submitted for one application, newest first.
    pub fn documents_for(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<DocumentView>, WorkflowError> {
        if self.repository.application(id)?.is_none() {
            return Err(WorkflowError::NotFound(EntityKind::Application));
        }
        let mut documents = self.repository.documents_for(id)?;
        documents.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(documents.iter().map(DocumentView::from).collect())
    }

    /// Position summary with the live approved-applicant count.
    pub fn position_summary(&self, id: &PositionId) -> Result<PositionView, WorkflowError> {
        let position = self
            .repository
            .position(id)?
            .ok_or(WorkflowError::NotFound(EntityKind::Position))?;
        let approved_count = self.repository.count_approved_for(id)?;
        Ok(PositionView::assemble(&position, approved_count))
    }

    fn check_note(&self, errors: &mut FieldErrors, field: &'static str, note: &Option<String>) {
        if let Some(note) = note {
            if note.chars().count() > self.config.max_note_chars {
                errors.push(
                    field,
                    format!("must not exceed {} characters", self.config.max_note_chars),
                );
            }
        }
    }

    fn detail_view(&self, application: &Application) -> Result<ApplicationDetailView, WorkflowError> {
        let position_name = self
            .repository
            .position(&application.position_id)?
            .map(|position| position.name);
        let has_assessment = self.repository.assessment_for(&application.id)?.is_some();
        let today = self.clock.now().date_naive();
        let phase = schedule::placement_phase(
            application.status,
            application.period,
            has_assessment,
            today,
        );
        Ok(ApplicationDetailView::assemble(
            application,
            position_name,
            phase,
        ))
    }
}
