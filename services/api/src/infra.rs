use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use pkl_core::config::WorkflowSettings;
use pkl_core::workflows::internship::{
    AdminId, Application, ApplicationId, ApplicationStatus, Assessment, AuditEntry, AuditError,
    AuditTrail, Certificate, Document, DocumentId, DocumentKind, EngagementType,
    InternshipRepository, Position, PositionId, PositionStatus, RepositoryError, UserId,
    WorkflowConfig,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Store {
    positions: HashMap<PositionId, Position>,
    applications: HashMap<ApplicationId, Application>,
    documents: HashMap<DocumentId, Document>,
    assessments: HashMap<ApplicationId, Assessment>,
    certificates: HashMap<ApplicationId, Certificate>,
}

/// Mutex-guarded store backing the service until a database lands. Each
/// repository call holds the lock for its whole write, so a transition is
/// never observable half-applied.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInternshipRepository {
    store: Arc<Mutex<Store>>,
}

impl InternshipRepository for InMemoryInternshipRepository {
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
        store
            .applications
            .insert(application.id, application.clone());
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
pub(crate) struct InMemoryAuditTrail {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl InMemoryAuditTrail {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditTrail for InMemoryAuditTrail {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

pub(crate) fn workflow_config(settings: &WorkflowSettings) -> WorkflowConfig {
    WorkflowConfig {
        decision_lead_days: settings.decision_lead_days,
        ..WorkflowConfig::default()
    }
}

/// One position, one pending application, and its submitted documents, so a
/// freshly started service has something to decide on.
pub(crate) fn seed_demo_data(
    repository: &InMemoryInternshipRepository,
) -> Result<(), RepositoryError> {
    let now = Utc::now();

    repository.insert_position(Position {
        id: PositionId(11),
        name: "Frontend Developer Intern".to_string(),
        category: "Pengembangan Web".to_string(),
        description: "Membangun antarmuka dashboard internal.".to_string(),
        requirements: vec!["Mahasiswa aktif".to_string(), "Dasar React".to_string()],
        benefits: vec!["Uang saku".to_string(), "Sertifikat kelulusan".to_string()],
        engagement: EngagementType::Hybrid,
        duration_months: 3,
        status: PositionStatus::Open,
        created_by: AdminId(1),
    })?;

    repository.insert_application(Application {
        id: ApplicationId(42),
        user_id: UserId(7),
        position_id: PositionId(11),
        status: ApplicationStatus::Pending,
        applied_at: now,
        processed_at: None,
        admin_note: None,
        period: None,
    })?;

    repository.insert_document(Document::submitted(
        DocumentId(4),
        ApplicationId(42),
        UserId(7),
        DocumentKind::ActivityLog,
        "https://drive.example.com/log-aktivitas.pdf".to_string(),
        now,
    ))?;
    repository.insert_document(Document::submitted(
        DocumentId(5),
        ApplicationId(42),
        UserId(7),
        DocumentKind::FinalReport,
        "https://drive.example.com/laporan-akhir.pdf".to_string(),
        now,
    ))?;

    Ok(())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(" 2026-08-10 ").expect("date parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 10).expect("valid"));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("10/08/2026").is_err());
    }

    #[test]
    fn seeding_twice_conflicts_on_the_same_store() {
        let repository = InMemoryInternshipRepository::default();
        seed_demo_data(&repository).expect("first seed succeeds");
        assert!(seed_demo_data(&repository).is_err());
    }
}
