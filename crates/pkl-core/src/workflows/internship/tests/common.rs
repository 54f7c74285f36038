use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::clock::Clock;
use crate::workflows::internship::domain::{
    AdminId, Application, ApplicationId, ApplicationStatus, Assessment, Certificate, Document,
    DocumentId, DocumentKind, DocumentStatus, EngagementType, Position, PositionId,
    PositionStatus, UserId,
};
use crate::workflows::internship::repository::{
    AuditEntry, AuditError, AuditTrail, InternshipRepository, RepositoryError,
};
use crate::workflows::internship::router::internship_router;
use crate::workflows::internship::service::{InternshipService, WorkflowConfig};

/// Frozen clock so placement math is deterministic in tests.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Friday before the 2026-08-10 placement week; most scenarios decide here.
pub(super) fn decision_day() -> DateTime<Utc> {
    at(2026, 8, 7)
}

pub(super) fn sample_position(duration_months: u8) -> Position {
    Position {
        id: PositionId(11),
        name: "Frontend Developer Intern".to_string(),
        category: "Pengembangan Web".to_string(),
        description: "Membangun antarmuka dashboard internal.".to_string(),
        requirements: vec!["Mahasiswa aktif".to_string(), "Dasar React".to_string()],
        benefits: vec!["Uang saku".to_string(), "Sertifikat kelulusan".to_string()],
        engagement: EngagementType::Hybrid,
        duration_months,
        status: PositionStatus::Open,
        created_by: AdminId(1),
    }
}

pub(super) fn pending_application() -> Application {
    Application {
        id: ApplicationId(42),
        user_id: UserId(7),
        position_id: PositionId(11),
        status: ApplicationStatus::Pending,
        applied_at: at(2026, 7, 20),
        processed_at: None,
        admin_note: None,
        period: None,
    }
}

pub(super) fn final_report(status: DocumentStatus) -> Document {
    let mut document = Document::submitted(
        DocumentId(5),
        ApplicationId(42),
        UserId(7),
        DocumentKind::FinalReport,
        "https://drive.example.com/laporan-akhir.pdf".to_string(),
        at(2026, 11, 2),
    );
    document.status = status;
    document.verified = status.is_accepted();
    document
}

pub(super) type TestService = InternshipService<MemoryRepository, MemoryAudit, FixedClock>;

pub(super) fn build_service(
    now: DateTime<Utc>,
) -> (TestService, Arc<MemoryRepository>, Arc<MemoryAudit>) {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = InternshipService::new(
        repository.clone(),
        audit.clone(),
        FixedClock(now),
        WorkflowConfig::default(),
    );
    (service, repository, audit)
}

/// Service over a repository pre-loaded with one position, one pending
/// application, and one pending final report.
pub(super) fn seeded_service(
    now: DateTime<Utc>,
) -> (TestService, Arc<MemoryRepository>, Arc<MemoryAudit>) {
    let (service, repository, audit) = build_service(now);
    repository
        .insert_position(sample_position(3))
        .expect("position seeds");
    repository
        .insert_application(pending_application())
        .expect("application seeds");
    repository
        .insert_document(final_report(DocumentStatus::Pending))
        .expect("document seeds");
    (service, repository, audit)
}

pub(super) fn internship_router_with(service: TestService) -> axum::Router {
    internship_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
struct Store {
    positions: HashMap<PositionId, Position>,
    applications: HashMap<ApplicationId, Application>,
    documents: HashMap<DocumentId, Document>,
    assessments: HashMap<ApplicationId, Assessment>,
    certificates: HashMap<ApplicationId, Certificate>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl InternshipRepository for MemoryRepository {
    fn insert_position(&self, position: Position) -> Result<Position, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.positions.contains_key(&position.id) {
            return Err(RepositoryError::Conflict);
        }
        store.positions.insert(position.id, position.clone());
        Ok(position)
    }

    fn position(&self, id: &PositionId) -> Result<Option<Position>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.positions.get(id).cloned())
    }

    fn count_approved_for(&self, id: &PositionId) -> Result<usize, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .applications
            .values()
            .filter(|application| {
                application.position_id == *id
                    && application.status == ApplicationStatus::Approved
            })
            .count())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.applications.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        store.applications.insert(application.id, application.clone());
        Ok(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.applications.get(id).cloned())
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if !store.applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        store.applications.insert(application.id, application);
        Ok(())
    }

    fn insert_document(&self, document: Document) -> Result<Document, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.documents.contains_key(&document.id) {
            return Err(RepositoryError::Conflict);
        }
        store.documents.insert(document.id, document.clone());
        Ok(document)
    }

    fn document(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.documents.get(id).cloned())
    }

    fn update_document(&self, document: Document) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if !store.documents.contains_key(&document.id) {
            return Err(RepositoryError::NotFound);
        }
        store.documents.insert(document.id, document);
        Ok(())
    }

    fn documents_for(&self, id: &ApplicationId) -> Result<Vec<Document>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .documents
            .values()
            .filter(|document| document.application_id == *id)
            .cloned()
            .collect())
    }

    fn assessment_for(&self, id: &ApplicationId) -> Result<Option<Assessment>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.assessments.get(id).cloned())
    }

    fn upsert_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
            .assessments
            .insert(assessment.application_id, assessment);
        Ok(())
    }

    fn certificate_for(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Certificate>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.certificates.get(id).cloned())
    }

    fn insert_certificate(
        &self,
        certificate: Certificate,
    ) -> Result<Certificate, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.certificates.contains_key(&certificate.application_id) {
            return Err(RepositoryError::Conflict);
        }
        store
            .certificates
            .insert(certificate.application_id, certificate.clone());
        Ok(certificate)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditTrail for MemoryAudit {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

/// Repository that fails every call, for surfacing storage outages.
pub(super) struct UnavailableRepository;

impl InternshipRepository for UnavailableRepository {
    fn insert_position(&self, _position: Position) -> Result<Position, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn position(&self, _id: &PositionId) -> Result<Option<Position>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_approved_for(&self, _id: &PositionId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _application: Application,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_application(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_document(&self, _document: Document) -> Result<Document, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn document(&self, _id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_document(&self, _document: Document) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn documents_for(&self, _id: &ApplicationId) -> Result<Vec<Document>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn assessment_for(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_assessment(&self, _assessment: Assessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn certificate_for(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<Certificate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_certificate(
        &self,
        _certificate: Certificate,
    ) -> Result<Certificate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
