//! ProgressWriter - ordered, fire-and-forget persistence.
//!
//! Snapshots are handed to a background task over a channel. The task saves
//! them one at a time, so a later snapshot can never be overtaken by an
//! earlier one. When several snapshots of the same idea are queued only the
//! newest is written, and a snapshot whose revision is not newer than the
//! last one written for its idea is skipped. A failed save is logged and
//! retried with the next batch unless a newer snapshot replaced it or the
//! engine took it back with [`ProgressWriter::take_unsaved`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::domain::foundation::IdeaId;
use crate::domain::journey::ProgressState;
use crate::ports::ProgressStorage;

enum WriterCommand {
    Save(ProgressState),
    Flush(oneshot::Sender<()>),
    Take(IdeaId, oneshot::Sender<Option<ProgressState>>),
}

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Default)]
pub struct WriterStats {
    written: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl WriterStats {
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::SeqCst)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Handle to the background writer. Dropping every handle stops the task
/// once the queue is drained.
#[derive(Clone)]
pub struct ProgressWriter {
    sender: mpsc::UnboundedSender<WriterCommand>,
    stats: Arc<WriterStats>,
}

impl ProgressWriter {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(storage: Arc<dyn ProgressStorage>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stats = Arc::new(WriterStats::default());
        tokio::spawn(run(storage, receiver, Arc::clone(&stats)));
        Self { sender, stats }
    }

    /// Queues a snapshot for saving. Never blocks.
    pub fn enqueue(&self, state: ProgressState) {
        let idea_id = state.idea_id();
        let revision = state.revision();
        if self.sender.send(WriterCommand::Save(state)).is_err() {
            tracing::error!(%idea_id, revision, "Progress writer has stopped, snapshot dropped");
        }
    }

    /// Waits until every snapshot queued before this call has been handled.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(WriterCommand::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Removes and returns the newest snapshot of `idea_id` that has not
    /// been written yet, typically one whose save failed.
    pub async fn take_unsaved(&self, idea_id: IdeaId) -> Option<ProgressState> {
        let (reply, taken) = oneshot::channel();
        if self.sender.send(WriterCommand::Take(idea_id, reply)).is_err() {
            return None;
        }
        taken.await.ok().flatten()
    }

    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }
}

async fn run(
    storage: Arc<dyn ProgressStorage>,
    mut receiver: mpsc::UnboundedReceiver<WriterCommand>,
    stats: Arc<WriterStats>,
) {
    let mut last_written: HashMap<IdeaId, u64> = HashMap::new();
    let mut retry: HashMap<IdeaId, ProgressState> = HashMap::new();

    while let Some(first) = receiver.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = receiver.try_recv() {
            batch.push(next);
        }

        let mut acks = Vec::new();
        let mut pending = std::mem::take(&mut retry);
        for command in batch {
            match command {
                WriterCommand::Save(state) => {
                    let newer = pending
                        .get(&state.idea_id())
                        .map_or(true, |queued| state.revision() > queued.revision());
                    if newer {
                        if pending.insert(state.idea_id(), state).is_some() {
                            stats.skipped.fetch_add(1, Ordering::SeqCst);
                        }
                    } else {
                        stats.skipped.fetch_add(1, Ordering::SeqCst);
                    }
                }
                WriterCommand::Flush(ack) => acks.push(ack),
                WriterCommand::Take(idea_id, reply) => {
                    let taken = pending.remove(&idea_id);
                    if let Some(state) = &taken {
                        tracing::debug!(%idea_id, revision = state.revision(), "Unsaved snapshot handed back");
                    }
                    let _ = reply.send(taken);
                }
            }
        }

        for (idea_id, state) in pending {
            let revision = state.revision();
            if last_written.get(&idea_id).is_some_and(|&last| revision <= last) {
                stats.skipped.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(%idea_id, revision, "Skipping stale progress snapshot");
                continue;
            }

            match storage.save(idea_id, &state).await {
                Ok(()) => {
                    last_written.insert(idea_id, revision);
                    stats.written.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(%idea_id, revision, "Progress saved");
                }
                Err(err) => {
                    stats.failed.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!(%idea_id, revision, error = %err, "Failed to save progress, will retry");
                    retry.insert(idea_id, state);
                }
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProgressStorage;
    use crate::domain::foundation::StageId;
    use crate::domain::journey::{Stage, StageKind};

    fn state() -> ProgressState {
        let stages = (0..5)
            .map(|i| Stage {
                id: StageId::new(format!("s{}", i)).unwrap(),
                title: format!("Stage {}", i),
                description: String::new(),
                kind: StageKind::Milestone,
                order: i,
            })
            .collect();
        ProgressState::start(IdeaId::new(), stages)
    }

    #[tokio::test]
    async fn flush_waits_for_queued_saves() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let mut state = state();
        state.advance().unwrap();

        writer.enqueue(state.clone());
        writer.flush().await;

        assert_eq!(storage.stored_revision(state.idea_id()).await, Some(1));
        assert_eq!(writer.stats().written(), 1);
    }

    #[tokio::test]
    async fn saves_land_in_revision_order() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let mut state = state();

        for _ in 0..4 {
            state.advance().unwrap();
            writer.enqueue(state.clone());
        }
        writer.flush().await;

        let revisions: Vec<u64> = storage.save_log().await.into_iter().map(|(_, r)| r).collect();
        assert!(revisions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(revisions.last(), Some(&4));
    }

    #[tokio::test]
    async fn stale_snapshot_is_never_written_after_newer_one() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let mut state = state();
        state.advance().unwrap();
        let old = state.clone();
        state.advance().unwrap();

        writer.enqueue(state.clone());
        writer.flush().await;
        writer.enqueue(old);
        writer.flush().await;

        assert_eq!(storage.stored_revision(state.idea_id()).await, Some(2));
        assert_eq!(writer.stats().skipped(), 1);
    }

    #[tokio::test]
    async fn failed_save_is_retried_on_next_batch() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let mut state = state();
        state.advance().unwrap();

        storage.set_fail_saves(true);
        writer.enqueue(state.clone());
        writer.flush().await;
        assert_eq!(writer.stats().failed(), 1);
        assert_eq!(storage.stored_revision(state.idea_id()).await, None);

        storage.set_fail_saves(false);
        writer.flush().await;
        assert_eq!(storage.stored_revision(state.idea_id()).await, Some(1));
    }

    #[tokio::test]
    async fn taken_snapshot_is_no_longer_retried() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let mut state = state();
        state.advance().unwrap();
        state.advance().unwrap();

        storage.set_fail_saves(true);
        writer.enqueue(state.clone());
        writer.flush().await;
        storage.set_fail_saves(false);

        let taken = writer.take_unsaved(state.idea_id()).await;
        assert_eq!(taken.map(|s| s.revision()), Some(2));
        assert!(writer.take_unsaved(state.idea_id()).await.is_none());

        writer.flush().await;
        assert_eq!(storage.stored_revision(state.idea_id()).await, None);
        assert_eq!(writer.stats().written(), 0);
    }

    #[tokio::test]
    async fn different_ideas_are_tracked_separately() {
        let storage = Arc::new(InMemoryProgressStorage::new());
        let writer = ProgressWriter::spawn(storage.clone());
        let a = state();
        let b = state();

        writer.enqueue(a.clone());
        writer.enqueue(b.clone());
        writer.flush().await;

        assert_eq!(storage.state_count().await, 2);
    }
}
