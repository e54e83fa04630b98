//! Collaborators that narrate what the runtime asks of them.
use std::sync::Arc;

use async_trait::async_trait;
use level_core::RoomArchetype;
use level_runtime::{
    ContentError, ContentHandle, ContentProducer, EntryAnchor, InMemoryProducer,
    OccupantRelocator, WorldPlacement,
};
use tracing::info;

/// Wraps an [`InMemoryProducer`] and logs every content operation.
#[derive(Clone, Default)]
pub struct LoggingProducer {
    inner: Arc<InMemoryProducer>,
}

impl LoggingProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.inner.live_count()
    }

    pub fn created_count(&self) -> usize {
        self.inner.created_count()
    }
}

#[async_trait]
impl ContentProducer for LoggingProducer {
    async fn instantiate(
        &self,
        archetype: &RoomArchetype,
        placement: WorldPlacement,
    ) -> Result<ContentHandle, ContentError> {
        let handle = self.inner.instantiate(archetype, placement).await?;
        info!(
            %handle,
            archetype = %archetype.name,
            x = placement.x,
            y = placement.y,
            "content instantiated"
        );
        Ok(handle)
    }

    async fn destroy(&self, handle: ContentHandle) -> Result<(), ContentError> {
        self.inner.destroy(handle).await?;
        info!(%handle, "content destroyed");
        Ok(())
    }

    fn set_active(&self, handle: ContentHandle, active: bool) -> Result<(), ContentError> {
        self.inner.set_active(handle, active)
    }
}

/// Single-player party that only logs where it is moved.
pub struct LoggingParty;

impl OccupantRelocator for LoggingParty {
    fn relocate(&self, anchor: EntryAnchor) {
        info!(
            node = %anchor.node,
            x = anchor.position.x,
            y = anchor.position.y,
            "party relocated"
        );
    }
}
