use std::sync::Arc;

use super::common::*;
use crate::workflows::internship::domain::{AdminId, ApplicationId, PlacementPhase};
use crate::workflows::internship::repository::{AuditAction, InternshipRepository};
use crate::workflows::internship::service::{
    AdmissionRuling, AssessmentForm, InternshipService, PreconditionFailure, WorkflowConfig,
    WorkflowError,
};

fn approve(service: &TestService) {
    service
        .decide_admission(
            &ApplicationId(42),
            AdmissionRuling {
                status: "Disetujui".to_string(),
                note: None,
            },
            AdminId(1),
        )
        .expect("approval succeeds");
}

#[test]
fn scoring_an_approved_placement_creates_the_assessment() {
    let (service, repository, audit) = seeded_service(decision_day());
    approve(&service);

    let view = service
        .record_assessment(
            &ApplicationId(42),
            AssessmentForm {
                score: 87,
                notes: Some("Inisiatif tinggi".to_string()),
            },
            AdminId(2),
        )
        .expect("assessment succeeds");

    assert_eq!(view.score, 87);
    assert_eq!(view.scored_by, AdminId(2));

    let stored = repository
        .assessment_for(&ApplicationId(42))
        .expect("fetch succeeds")
        .expect("assessment present");
    assert_eq!(stored.score, 87);
    assert_eq!(stored.notes.as_deref(), Some("Inisiatif tinggi"));

    assert!(audit
        .entries()
        .iter()
        .any(|entry| entry.action == AuditAction::AssessmentRecorded));
}

#[test]
fn re_scoring_overwrites_the_previous_assessment() {
    let (service, repository, _) = seeded_service(decision_day());
    approve(&service);

    service
        .record_assessment(
            &ApplicationId(42),
            AssessmentForm {
                score: 70,
                notes: None,
            },
            AdminId(2),
        )
        .expect("first assessment succeeds");
    service
        .record_assessment(
            &ApplicationId(42),
            AssessmentForm {
                score: 91,
                notes: Some("Revisi laporan diterima".to_string()),
            },
            AdminId(3),
        )
        .expect("second assessment succeeds");

    let stored = repository
        .assessment_for(&ApplicationId(42))
        .expect("fetch succeeds")
        .expect("assessment present");
    assert_eq!(stored.score, 91);
    assert_eq!(stored.scored_by, AdminId(3));
}

#[test]
fn pending_applications_cannot_be_scored() {
    let (service, _, _) = seeded_service(decision_day());

    match service.record_assessment(
        &ApplicationId(42),
        AssessmentForm {
            score: 80,
            notes: None,
        },
        AdminId(2),
    ) {
        Err(WorkflowError::Precondition(PreconditionFailure::ApplicationNotApproved)) => {}
        other => panic!("expected precondition failure, got {other:?}"),
    }
}

#[test]
fn scores_outside_the_grading_scale_fail_validation() {
    let (service, _, _) = seeded_service(decision_day());
    approve(&service);

    for score in [-1i64, 101] {
        match service.record_assessment(
            &ApplicationId(42),
            AssessmentForm { score, notes: None },
            AdminId(2),
        ) {
            Err(WorkflowError::Validation(errors)) => {
                assert!(errors.as_map().contains_key("nilai_akhir"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn an_assessment_completes_the_derived_phase_after_the_period_ends() {
    let (service, repository, _) = seeded_service(decision_day());
    approve(&service);
    service
        .record_assessment(
            &ApplicationId(42),
            AssessmentForm {
                score: 87,
                notes: None,
            },
            AdminId(2),
        )
        .expect("assessment succeeds");

    // Same stored records, observed after the placement ended.
    let late_service = InternshipService::new(
        repository,
        Arc::new(MemoryAudit::default()),
        FixedClock(at(2026, 11, 20)),
        WorkflowConfig::default(),
    );
    let view = late_service
        .application_detail(&ApplicationId(42))
        .expect("detail builds");
    assert_eq!(view.phase, PlacementPhase::Completed);
}
