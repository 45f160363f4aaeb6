//! JSON-file resume store — all records live in one on-disk JSON document
//! keyed by id, loaded at startup and rewritten after every mutation.
//!
//! The pipeline never touches this; only handlers do, through the methods
//! here. Concurrent requests share nothing else.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::resume::{ResumeRecord, ResumeStatus};

pub struct ResumeStore {
    path: PathBuf,
    records: RwLock<HashMap<String, ResumeRecord>>,
}

/// Aggregate figures for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_resumes: usize,
    pub completed: usize,
    pub pending: usize,
    pub avg_trust_score: f64,
    pub verification_rate: f64,
    pub fraud_alerts: usize,
}

impl ResumeStore {
    /// Opens the store, loading any existing data file. A corrupt file is
    /// logged and treated as empty rather than blocking startup.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, ResumeRecord>>(&raw) {
                Ok(records) => {
                    info!("Loaded {} resume records from {}", records.len(), path.display());
                    records
                }
                Err(e) => {
                    warn!("Ignoring corrupt resume store {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub async fn insert(&self, record: ResumeRecord) -> Result<String> {
        let id = record.id.clone();
        let mut records = self.records.write().await;
        records.insert(id.clone(), record);
        persist(&self.path, &records).await?;
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Option<ResumeRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// All records, newest upload first.
    pub async fn all(&self) -> Vec<ResumeRecord> {
        let mut records: Vec<ResumeRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        records
    }

    /// Applies `mutate` to the record and rewrites the file. Returns false
    /// when the id is unknown.
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut ResumeRecord),
    {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            return Ok(false);
        };
        mutate(record);
        persist(&self.path, &records).await?;
        Ok(true)
    }

    pub async fn stats(&self) -> StoreStats {
        let records = self.records.read().await;
        let total = records.len();
        if total == 0 {
            return StoreStats {
                total_resumes: 0,
                completed: 0,
                pending: 0,
                avg_trust_score: 0.0,
                verification_rate: 0.0,
                fraud_alerts: 0,
            };
        }

        let completed = records
            .values()
            .filter(|r| r.status == ResumeStatus::Completed)
            .count();
        let pending = records
            .values()
            .filter(|r| matches!(r.status, ResumeStatus::Pending | ResumeStatus::Processing))
            .count();
        let trust_sum: f64 = records
            .values()
            .filter(|r| r.status == ResumeStatus::Completed)
            .map(|r| r.trust_score)
            .sum();
        let avg_trust = trust_sum / completed.max(1) as f64;
        let verification_rate = completed as f64 / total as f64 * 100.0;
        let fraud_alerts = records.values().map(|r| r.flags.len()).sum();

        StoreStats {
            total_resumes: total,
            completed,
            pending,
            avg_trust_score: round1(avg_trust),
            verification_rate: round1(verification_rate),
            fraud_alerts,
        }
    }
}

async fn persist(path: &Path, records: &HashMap<String, ResumeRecord>) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing resume store {}", path.display()))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str) -> ResumeRecord {
        ResumeRecord::new(filename.to_string(), format!("data/uploads/{filename}"))
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::open(dir.path().join("resumes.json")).await.unwrap();

        let id = store.insert(record("cv.pdf")).await.unwrap();
        let loaded = store.get(&id).await.unwrap();
        assert_eq!(loaded.filename, "cv.pdf");
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumes.json");

        let store = ResumeStore::open(&path).await.unwrap();
        let id = store.insert(record("cv.pdf")).await.unwrap();
        store
            .update(&id, |r| {
                r.status = ResumeStatus::Completed;
                r.trust_score = 70.0;
            })
            .await
            .unwrap();
        drop(store);

        let reopened = ResumeStore::open(&path).await.unwrap();
        let loaded = reopened.get(&id).await.unwrap();
        assert_eq!(loaded.status, ResumeStatus::Completed);
        assert_eq!(loaded.trust_score, 70.0);
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumes.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = ResumeStore::open(&path).await.unwrap();
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::open(dir.path().join("resumes.json")).await.unwrap();
        let touched = store.update("missing", |_| {}).await.unwrap();
        assert!(!touched);
    }

    #[tokio::test]
    async fn test_stats_for_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::open(dir.path().join("resumes.json")).await.unwrap();
        let stats = store.stats().await;
        assert_eq!(stats.total_resumes, 0);
        assert_eq!(stats.avg_trust_score, 0.0);
        assert_eq!(stats.verification_rate, 0.0);
    }

    #[tokio::test]
    async fn test_stats_counts_and_rates() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::open(dir.path().join("resumes.json")).await.unwrap();

        let mut completed = record("a.pdf");
        completed.id = "1".to_string();
        completed.status = ResumeStatus::Completed;
        completed.trust_score = 80.0;
        store.insert(completed).await.unwrap();

        let mut pending = record("b.pdf");
        pending.id = "2".to_string();
        store.insert(pending).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.total_resumes, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.avg_trust_score, 80.0);
        assert_eq!(stats.verification_rate, 50.0);
    }
}
