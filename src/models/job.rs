use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ephemeral record of an in-flight two-team aggregation.
///
/// Purged from the job table after a fixed TTL regardless of whether the
/// caller consumed the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareJob {
    /// Job identifier handed back to the caller
    pub id: String,

    /// The two team ids this job aggregates
    pub team_ids: [String; 2],

    /// Lifecycle status
    pub status: JobStatus,

    /// Completion percentage (0, 50 or 100)
    pub progress: u8,

    /// Cache keys the finished profiles live under, once done
    pub result_keys: Vec<String>,

    /// Error description when the job failed
    pub error: Option<String>,

    /// When the job was created
    pub created_at: DateTime<Utc>,

    /// When the record becomes eligible for purging
    pub expires_at: DateTime<Utc>,
}

impl PrepareJob {
    /// Whether this record is past its expiry time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Done | JobStatus::Failed)
    }
}

/// Job lifecycle: pending -> running -> done | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}
