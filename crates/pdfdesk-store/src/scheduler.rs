//! Deferred artifact deletion.
//!
//! A single scheduler task owns a deadline heap fed over a channel. Handlers
//! call [`DeletionScheduler::schedule`] and move on; the loop sleeps until
//! the earliest deadline, fires the delete, and keeps going. Deleting an
//! artifact that is already gone (explicit delete, sweep, or a duplicate
//! schedule) is a recorded no-op.

use crate::store::LocalArtifactStore;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Eq, PartialEq)]
struct Job {
    fire_at: Instant,
    name: String,
}

// BinaryHeap is a max-heap; invert so the earliest deadline surfaces first.
impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.name.cmp(&self.name))
    }
}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone)]
pub struct DeletionScheduler {
    tx: mpsc::UnboundedSender<Job>,
}

impl DeletionScheduler {
    /// Spawn the scheduler loop against a store.
    pub fn spawn(store: Arc<LocalArtifactStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, rx));
        Self { tx }
    }

    /// Register a deletion to fire after `after`. Fire-and-forget: never
    /// blocks, and the caller's response does not wait on it.
    pub fn schedule(&self, name: impl Into<String>, after: Duration) {
        let job = Job {
            fire_at: Instant::now() + after,
            name: name.into(),
        };
        // Send only fails at shutdown, when pending deletions are moot.
        let _ = self.tx.send(job);
    }
}

async fn run(store: Arc<LocalArtifactStore>, mut rx: mpsc::UnboundedReceiver<Job>) {
    let mut queue: BinaryHeap<Job> = BinaryHeap::new();

    loop {
        let next_deadline = queue.peek().map(|job| job.fire_at);

        tokio::select! {
            incoming = rx.recv() => {
                match incoming {
                    Some(job) => queue.push(job),
                    None => break,
                }
            }
            _ = sleep_until_next(next_deadline) => {
                let Some(job) = queue.pop() else { continue };
                fire(&store, &job.name).await;
                // Fire everything else already due before sleeping again.
                while queue
                    .peek()
                    .is_some_and(|job| job.fire_at <= Instant::now())
                {
                    let job = queue.pop().expect("peeked job");
                    fire(&store, &job.name).await;
                }
            }
        }
    }
}

async fn sleep_until_next(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn fire(store: &LocalArtifactStore, name: &str) {
    match store.delete(name).await {
        Ok(true) => tracing::debug!("scheduled deletion removed {}", name),
        Ok(false) => tracing::debug!("scheduled deletion found {} already gone", name),
        Err(e) => tracing::warn!("scheduled deletion of {} failed: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn store() -> (tempfile::TempDir, Arc<LocalArtifactStore>) {
        let dir = tempdir().unwrap();
        let store = LocalArtifactStore::new(dir.path(), Duration::from_secs(3600))
            .await
            .unwrap();
        (dir, Arc::new(store))
    }

    #[tokio::test]
    async fn scheduled_deletion_fires() {
        let (_dir, store) = store().await;
        let scheduler = DeletionScheduler::spawn(Arc::clone(&store));

        let name = store.store(b"ephemeral", "pdf").await.unwrap();
        scheduler.schedule(&name, Duration::from_millis(30));

        // Readable until the deadline passes.
        assert!(store.retrieve(&name).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.retrieve(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn firing_after_manual_delete_is_harmless() {
        let (_dir, store) = store().await;
        let scheduler = DeletionScheduler::spawn(Arc::clone(&store));

        let name = store.store(b"gone early", "pdf").await.unwrap();
        scheduler.schedule(&name, Duration::from_millis(30));
        assert!(store.delete(&name).await.unwrap());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.retrieve(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn jobs_fire_in_deadline_order_not_submission_order() {
        let (_dir, store) = store().await;
        let scheduler = DeletionScheduler::spawn(Arc::clone(&store));

        let slow = store.store(b"slow", "pdf").await.unwrap();
        let fast = store.store(b"fast", "pdf").await.unwrap();

        scheduler.schedule(&slow, Duration::from_secs(3600));
        scheduler.schedule(&fast, Duration::from_millis(30));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.retrieve(&fast).await.unwrap().is_none());
        assert!(store.retrieve(&slow).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_schedules_for_one_artifact_are_safe() {
        let (_dir, store) = store().await;
        let scheduler = DeletionScheduler::spawn(Arc::clone(&store));

        let name = store.store(b"doubled", "pdf").await.unwrap();
        scheduler.schedule(&name, Duration::from_millis(20));
        scheduler.schedule(&name, Duration::from_millis(40));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.retrieve(&name).await.unwrap().is_none());
    }
}
