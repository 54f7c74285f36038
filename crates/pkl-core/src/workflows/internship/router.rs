use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::clock::Clock;

use super::domain::{AdminId, ApplicationId, ApplicationStatus, DocumentId, PositionId};
use super::repository::{AuditTrail, InternshipRepository};
use super::service::{
    AdmissionRuling, AssessmentForm, CertificateRequest, DocumentReview, InternshipService,
    PreconditionFailure, WorkflowError,
};

/// Router builder exposing the admin workflow endpoints.
pub fn internship_router<R, A, C>(service: Arc<InternshipService<R, A, C>>) -> Router
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/internship/applications/:application_id",
            get(application_detail_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/applications/:application_id/decision",
            post(decision_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/applications/:application_id/documents",
            get(documents_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/documents/:document_id/review",
            post(review_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/applications/:application_id/assessment",
            post(assessment_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/applications/:application_id/certificate",
            post(issue_certificate_handler::<R, A, C>)
                .get(certificate_status_handler::<R, A, C>),
        )
        .route(
            "/api/v1/internship/positions/:position_id",
            get(position_handler::<R, A, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    status: String,
    #[serde(default)]
    catatan_admin: Option<String>,
    admin_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    status_penilaian: String,
    #[serde(default)]
    feedback_pembimbing: Option<String>,
    assessor: String,
    admin_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    nilai_akhir: i64,
    #[serde(default)]
    catatan: Option<String>,
    admin_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CertificateIssueRequest {
    link_sertifikat: String,
    tanggal_selesai: NaiveDate,
    #[serde(default)]
    catatan_admin: Option<String>,
    admin_id: u64,
}

fn error_response(error: WorkflowError) -> Response {
    match error {
        WorkflowError::Validation(errors) => {
            let payload = json!({
                "success": false,
                "errors": errors.as_map(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WorkflowError::NotFound(_) => {
            let payload = json!({
                "success": false,
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        WorkflowError::Precondition(PreconditionFailure::CertificateAlreadyIssued) => {
            let payload = json!({
                "success": false,
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        WorkflowError::Precondition(_) | WorkflowError::Schedule(_) => {
            let payload = json!({
                "success": false,
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WorkflowError::Repository(_) | WorkflowError::Audit(_) => {
            let payload = json!({
                "success": false,
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn decision_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    let ruling = AdmissionRuling {
        status: request.status,
        note: request.catatan_admin,
    };
    match service.decide_admission(
        &ApplicationId(application_id),
        ruling,
        AdminId(request.admin_id),
    ) {
        Ok(view) => {
            let message = match view.status {
                ApplicationStatus::Approved => "Pendaftaran disetujui",
                _ => "Pendaftaran ditolak",
            };
            let payload = json!({
                "success": true,
                "message": message,
                "application": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn application_detail_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    match service.application_detail(&ApplicationId(application_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn documents_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    match service.documents_for(&ApplicationId(application_id)) {
        Ok(documents) => {
            let payload = json!({ "documents": documents });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(document_id): Path<u64>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    let review = DocumentReview {
        verdict: request.status_penilaian,
        feedback: request.feedback_pembimbing,
        reviewer_name: request.assessor,
    };
    match service.review_document(
        &DocumentId(document_id),
        review,
        AdminId(request.admin_id),
    ) {
        Ok(view) => {
            let payload = json!({
                "success": true,
                "message": "Penilaian dokumen disimpan",
                "document": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    let form = AssessmentForm {
        score: request.nilai_akhir,
        notes: request.catatan,
    };
    match service.record_assessment(
        &ApplicationId(application_id),
        form,
        AdminId(request.admin_id),
    ) {
        Ok(view) => {
            let payload = json!({
                "success": true,
                "message": "Penilaian tersimpan",
                "assessment": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn issue_certificate_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
    axum::Json(request): axum::Json<CertificateIssueRequest>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    let certificate_request = CertificateRequest {
        link: request.link_sertifikat,
        completed_on: request.tanggal_selesai,
        note: request.catatan_admin,
    };
    match service.issue_certificate(
        &ApplicationId(application_id),
        certificate_request,
        AdminId(request.admin_id),
    ) {
        Ok(view) => {
            let payload = json!({
                "success": true,
                "message": "Sertifikat berhasil diterbitkan",
                "certificate": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn certificate_status_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    match service.certificate_status(&ApplicationId(application_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn position_handler<R, A, C>(
    State(service): State<Arc<InternshipService<R, A, C>>>,
    Path(position_id): Path<u64>,
) -> Response
where
    R: InternshipRepository + 'static,
    A: AuditTrail + 'static,
    C: Clock + 'static,
{
    match service.position_summary(&PositionId(position_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}
