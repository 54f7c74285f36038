use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use pkl_core::clock::SystemClock;
use pkl_core::error::AppError;
use pkl_core::workflows::internship::{
    placement_period, placement_phase, AdminId, AdmissionRuling, ApplicationId,
    ApplicationStatus, AssessmentForm, CertificateRequest, DocumentId, DocumentReview,
    InternshipService, WorkflowConfig, WorkflowError,
};

use crate::infra::{seed_demo_data, InMemoryAuditTrail, InMemoryInternshipRepository};

#[derive(Args, Debug)]
pub(crate) struct ScheduleArgs {
    /// Decision date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) decided_on: Option<NaiveDate>,
    /// Placement duration in months (1 through 12)
    #[arg(long, default_value_t = 3)]
    pub(crate) duration_months: u8,
    /// Days of notice between the decision and the placement week
    #[arg(long, default_value_t = 7)]
    pub(crate) lead_days: i64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the certificate issuance portion of the demo
    #[arg(long)]
    pub(crate) skip_certificate: bool,
}

pub(crate) fn run_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let decided_on = args
        .decided_on
        .unwrap_or_else(|| Local::now().date_naive());
    let period = placement_period(decided_on, args.lead_days, args.duration_months)
        .map_err(WorkflowError::from)?;

    println!("Placement schedule preview");
    println!("- decision date : {decided_on}");
    println!("- first day     : {} (Monday of the target week)", period.start);
    println!("- last day      : {}", period.end);

    println!("Derived status along the timeline:");
    let milestones = [
        (period.start - Duration::days(1), false),
        (period.start, false),
        (period.end, false),
        (period.end + Duration::days(1), false),
        (period.end + Duration::days(1), true),
    ];
    for (day, has_assessment) in milestones {
        let phase =
            placement_phase(ApplicationStatus::Approved, Some(period), has_assessment, day);
        let suffix = if has_assessment {
            " (after assessment)"
        } else {
            ""
        };
        println!("  - {day}: {}{suffix}", phase.label());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryInternshipRepository::default());
    let audit = Arc::new(InMemoryAuditTrail::default());
    let service = InternshipService::new(
        repository.clone(),
        audit.clone(),
        SystemClock,
        WorkflowConfig::default(),
    );
    seed_demo_data(&repository).map_err(WorkflowError::from)?;

    println!("Internship workflow demo");

    let view = service.decide_admission(
        &ApplicationId(42),
        AdmissionRuling {
            status: "Disetujui".to_string(),
            note: Some("Onboarding minggu depan".to_string()),
        },
        AdminId(1),
    )?;
    println!(
        "- Application {} -> {} ({})",
        view.application_id,
        view.status_label,
        view.phase_label
    );
    let Some(period) = view.period else {
        println!("  No placement period was computed; stopping the demo");
        return Ok(());
    };
    println!("  Placement runs {} through {}", period.start, period.end);

    for document_id in [4u64, 5] {
        let document = service.review_document(
            &DocumentId(document_id),
            DocumentReview {
                verdict: "diterima".to_string(),
                feedback: None,
                reviewer_name: "Bu Ratna".to_string(),
            },
            AdminId(2),
        )?;
        println!(
            "- Document {} ({}) -> {}",
            document.document_id, document.kind_label, document.status_label
        );
    }

    let assessment = service.record_assessment(
        &ApplicationId(42),
        AssessmentForm {
            score: 88,
            notes: Some("Konsisten dan komunikatif".to_string()),
        },
        AdminId(2),
    )?;
    println!("- Assessment recorded with score {}", assessment.score);

    if args.skip_certificate {
        println!("- Certificate issuance skipped");
    } else {
        let certificate = service.issue_certificate(
            &ApplicationId(42),
            CertificateRequest {
                link: "https://sertifikat.example.com/pkl/42".to_string(),
                completed_on: period.end,
                note: Some("Lulus dengan baik".to_string()),
            },
            AdminId(1),
        )?;
        match serde_json::to_string_pretty(&certificate) {
            Ok(json) => println!("- Certificate issued:\n{json}"),
            Err(err) => println!("- Certificate issued (payload unavailable: {err})"),
        }
    }

    let entries = audit.entries();
    println!("Audit trail ({} entries):", entries.len());
    for entry in entries {
        println!(
            "  - {} on application {} by admin {}",
            entry.action.label(),
            entry.application_id,
            entry.actor
        );
    }

    Ok(())
}
