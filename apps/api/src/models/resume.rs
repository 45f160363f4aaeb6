use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::claims::ClaimSet;
use crate::pipeline::verification::{Flag, VerificationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One persisted resume record. The upload handler owns the status
/// transitions pending → processing → (completed | error); the pipeline
/// outputs are written once and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: ResumeStatus,
    pub claims: Option<ClaimSet>,
    pub verification: Option<VerificationResult>,
    pub trust_score: f64,
    pub flags: Vec<Flag>,
}

impl ResumeRecord {
    /// Ids are millisecond upload timestamps: opaque to clients, unique
    /// enough in practice, and sortable for "most recent" ordering.
    pub fn new(filename: String, file_path: String) -> Self {
        let uploaded_at = Utc::now();
        Self {
            id: uploaded_at.timestamp_millis().to_string(),
            filename,
            file_path,
            uploaded_at,
            status: ResumeStatus::Pending,
            claims: None,
            verification: None,
            trust_score: 0.0,
            flags: Vec::new(),
        }
    }
}
