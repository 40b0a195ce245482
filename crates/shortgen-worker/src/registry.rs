//! Process-wide in-memory job registry.
//!
//! The map lock is held only to find or insert an entry; each record has its
//! own lock so polling one job never waits on another job's updates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use shortgen_models::{JobId, JobRecord};

/// Shared handle to one job record.
pub type JobHandle = Arc<Mutex<JobRecord>>;

#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobHandle>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new record and return its handle. An existing record with
    /// the same id is replaced.
    pub async fn insert(&self, record: JobRecord) -> JobHandle {
        let id = record.id.clone();
        let handle = Arc::new(Mutex::new(record));
        self.jobs.write().await.insert(id, Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, id: &JobId) -> Option<JobHandle> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Copy of the current record.
    pub async fn snapshot(&self, id: &JobId) -> Option<JobRecord> {
        let handle = self.get(id).await?;
        let record = handle.lock().await;
        Some(record.clone())
    }

    /// Drop a job from the registry, returning its handle if it was known.
    pub async fn remove(&self, id: &JobId) -> Option<JobHandle> {
        self.jobs.write().await.remove(id)
    }

    /// Snapshots of every job created before `cutoff`, oldest first.
    pub async fn older_than(&self, cutoff: DateTime<Utc>) -> Vec<JobRecord> {
        let handles: Vec<JobHandle> = self.jobs.read().await.values().cloned().collect();

        let mut old = Vec::new();
        for handle in handles {
            let record = handle.lock().await;
            if record.created_at < cutoff {
                old.push(record.clone());
            }
        }
        old.sort_by_key(|record| record.created_at);
        old
    }

    pub async fn contains(&self, id: &JobId) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortgen_models::{HighlightRequest, JobStatus};

    fn record(id: &str) -> JobRecord {
        JobRecord::new(
            JobId::from_string(id),
            "talk.mp4",
            format!("uploads/{}_talk.mp4", id),
            &HighlightRequest::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let registry = JobRegistry::new();
        assert!(registry.is_empty().await);

        let handle = registry.insert(record("a")).await;
        handle.lock().await.set_progress(40);

        let snap = registry.snapshot(&JobId::from_string("a")).await.unwrap();
        assert_eq!(snap.progress, 40);
        assert_eq!(snap.status, JobStatus::Queued);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let registry = JobRegistry::new();
        let id = JobId::from_string("missing");
        assert!(registry.get(&id).await.is_none());
        assert!(registry.snapshot(&id).await.is_none());
        assert!(!registry.contains(&id).await);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = JobRegistry::new();
        registry.insert(record("a")).await;
        let id = JobId::from_string("a");

        assert!(registry.remove(&id).await.is_some());
        assert!(registry.remove(&id).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_older_than() {
        let registry = JobRegistry::new();

        let mut stale = record("stale");
        stale.created_at = Utc::now() - chrono::Duration::hours(48);
        registry.insert(stale).await;
        registry.insert(record("fresh")).await;

        let cutoff = Utc::now() - chrono::Duration::hours(24);
        let old = registry.older_than(cutoff).await;
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].id.as_str(), "stale");

        let everything = registry.older_than(Utc::now() + chrono::Duration::seconds(1)).await;
        assert_eq!(everything.len(), 2);
        assert_eq!(everything[0].id.as_str(), "stale");
    }

    #[tokio::test]
    async fn test_held_record_does_not_block_other_jobs() {
        let registry = JobRegistry::new();
        let a = registry.insert(record("a")).await;
        registry.insert(record("b")).await;

        let _guard = a.lock().await;
        let b = registry.snapshot(&JobId::from_string("b")).await;
        assert!(b.is_some());
    }
}
