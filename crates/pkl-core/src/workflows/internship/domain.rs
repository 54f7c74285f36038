use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::PlacementPeriod;

/// Identifier for an advertised internship position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub u64);

/// Identifier for a submitted internship application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

/// Identifier for a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

/// Identifier for an issued completion certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(pub u64);

/// Identifier for an applicant account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier for an admin account (separate guard from applicants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Advertised internship position an application points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub engagement: EngagementType,
    /// Placement length in months; valid range is 1 through 12.
    pub duration_months: u8,
    pub status: PositionStatus,
    pub created_by: AdminId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    Onsite,
    Remote,
    Hybrid,
}

impl EngagementType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Onsite => "Onsite",
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Open,
    Closed,
    Full,
}

impl PositionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Aktif",
            Self::Closed => "Non-Aktif",
            Self::Full => "Penuh",
        }
    }
}

/// Admission status of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Menunggu",
            Self::Approved => "Disetujui",
            Self::Rejected => "Ditolak",
        }
    }
}

/// One internship application.
///
/// `period` is set only by an approval; a rejection never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub position_id: PositionId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub admin_note: Option<String>,
    pub period: Option<PlacementPeriod>,
}

/// Kinds of documents an intern submits during the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "proposal")]
    Proposal,
    #[serde(rename = "log-aktivitas")]
    ActivityLog,
    #[serde(rename = "laporan-akhir")]
    FinalReport,
}

impl DocumentKind {
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::ActivityLog => "log-aktivitas",
            Self::FinalReport => "laporan-akhir",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Proposal => "Proposal",
            Self::ActivityLog => "Log Aktivitas",
            Self::FinalReport => "Laporan Akhir",
        }
    }
}

/// Review state of a submitted document. New submissions start `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Menunggu",
            Self::Accepted => "Diterima",
            Self::Rejected => "Ditolak",
        }
    }

    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A submitted artifact (report, activity log, ...) tied to an application.
///
/// `verified` mirrors the status for consumers of the legacy verification
/// flag; it is true exactly when the document was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub application_id: ApplicationId,
    pub user_id: UserId,
    pub kind: DocumentKind,
    pub link_url: String,
    pub status: DocumentStatus,
    pub feedback: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewed_by: Option<AdminId>,
    pub verified: bool,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl Document {
    /// A fresh, unreviewed submission.
    pub fn submitted(
        id: DocumentId,
        application_id: ApplicationId,
        user_id: UserId,
        kind: DocumentKind,
        link_url: String,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            application_id,
            user_id,
            kind,
            link_url,
            status: DocumentStatus::Pending,
            feedback: None,
            reviewer_name: None,
            reviewed_by: None,
            verified: false,
            reviewed_at: None,
            submitted_at,
        }
    }
}

/// Supervisor assessment of a placement; one per application, overwritten on
/// re-scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub application_id: ApplicationId,
    /// Final score, 0 through 100.
    pub score: u8,
    pub notes: Option<String>,
    pub scored_by: AdminId,
    pub recorded_at: DateTime<Utc>,
}

/// Completion certificate. At most one exists per application and it is
/// immutable once issued; there is no revoke operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    /// Position name captured at issuance; later renames do not propagate.
    pub program_name: String,
    pub link: String,
    pub completed_on: NaiveDate,
    pub admin_note: Option<String>,
    pub issued_by: AdminId,
    pub issued_at: DateTime<Utc>,
}

/// Display status of an application, derived at read time and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPhase {
    AwaitingDecision,
    Rejected,
    PeriodUnset,
    NotStarted,
    InProgress,
    AwaitingAssessment,
    Completed,
}

impl PlacementPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingDecision => "Menunggu",
            Self::Rejected => "Ditolak",
            Self::PeriodUnset => "Periode Belum Ditentukan",
            Self::NotStarted => "Belum Dimulai",
            Self::InProgress => "Sedang Berjalan",
            Self::AwaitingAssessment => "Belum Dinilai",
            Self::Completed => "Selesai",
        }
    }
}
