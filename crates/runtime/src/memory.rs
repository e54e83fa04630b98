//! In-memory collaborators for headless runs and tests.
//!
//! [`InMemoryProducer`] hands out sequential content handles and records what
//! it built. [`RecordingRelocator`] remembers every entry anchor it was asked
//! to move occupants to.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use level_core::RoomArchetype;

use crate::api::{
    ContentError, ContentHandle, ContentProducer, EntryAnchor, OccupantRelocator, WorldPlacement,
};

/// Bookkeeping for one piece of live content.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRecord {
    pub archetype: String,
    pub placement: WorldPlacement,
    pub active: bool,
}

#[derive(Default)]
pub struct InMemoryProducer {
    next_handle: AtomicU64,
    created: AtomicUsize,
    destroyed: AtomicUsize,
    live: Mutex<HashMap<ContentHandle, ContentRecord>>,
    failing: Mutex<HashSet<String>>,
    stuck: Mutex<HashSet<String>>,
    delay: Option<Duration>,
}

impl InMemoryProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends every `instantiate` call for `delay` before completing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes instantiation of the named archetype fail until [`recover`](Self::recover).
    pub fn fail_on(&self, archetype: impl Into<String>) {
        lock(&self.failing).insert(archetype.into());
    }

    pub fn recover(&self, archetype: &str) {
        lock(&self.failing).remove(archetype);
    }

    /// Makes activation of rooms built from the named archetype fail.
    pub fn refuse_activation(&self, archetype: impl Into<String>) {
        lock(&self.stuck).insert(archetype.into());
    }

    pub fn allow_activation(&self, archetype: &str) {
        lock(&self.stuck).remove(archetype);
    }

    pub fn live_count(&self) -> usize {
        lock(&self.live).len()
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn record(&self, handle: ContentHandle) -> Option<ContentRecord> {
        lock(&self.live).get(&handle).cloned()
    }

    pub fn is_active(&self, handle: ContentHandle) -> bool {
        lock(&self.live).get(&handle).is_some_and(|record| record.active)
    }

    /// Number of live rooms built from the named archetype.
    pub fn live_of(&self, archetype: &str) -> usize {
        lock(&self.live)
            .values()
            .filter(|record| record.archetype == archetype)
            .count()
    }
}

#[async_trait]
impl ContentProducer for InMemoryProducer {
    async fn instantiate(
        &self,
        archetype: &RoomArchetype,
        placement: WorldPlacement,
    ) -> Result<ContentHandle, ContentError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if lock(&self.failing).contains(&archetype.name) {
            return Err(ContentError::Instantiate {
                archetype: archetype.name.clone(),
                reason: "instantiation disabled".into(),
            });
        }

        let handle = ContentHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        lock(&self.live).insert(
            handle,
            ContentRecord {
                archetype: archetype.name.clone(),
                placement,
                active: true,
            },
        );
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    async fn destroy(&self, handle: ContentHandle) -> Result<(), ContentError> {
        lock(&self.live)
            .remove(&handle)
            .ok_or(ContentError::UnknownHandle(handle))?;
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_active(&self, handle: ContentHandle, active: bool) -> Result<(), ContentError> {
        let mut live = lock(&self.live);
        let record = live
            .get_mut(&handle)
            .ok_or(ContentError::UnknownHandle(handle))?;
        if active && lock(&self.stuck).contains(&record.archetype) {
            return Err(ContentError::Activate {
                handle,
                reason: "activation disabled".into(),
            });
        }
        record.active = active;
        Ok(())
    }
}

/// Relocator that keeps every anchor it receives.
#[derive(Default)]
pub struct RecordingRelocator {
    anchors: Mutex<Vec<EntryAnchor>>,
}

impl RecordingRelocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchors(&self) -> Vec<EntryAnchor> {
        lock(&self.anchors).clone()
    }

    pub fn last(&self) -> Option<EntryAnchor> {
        lock(&self.anchors).last().copied()
    }
}

impl OccupantRelocator for RecordingRelocator {
    fn relocate(&self, anchor: EntryAnchor) {
        tracing::debug!(
            node = %anchor.node,
            x = anchor.position.x,
            y = anchor.position.y,
            "occupants relocated"
        );
        lock(&self.anchors).push(anchor);
    }
}

// State here stays consistent across a panic, so a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
