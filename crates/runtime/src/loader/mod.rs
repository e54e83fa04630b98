//! Room content streaming.
//!
//! [`RoomContentLoader`] keeps the set of materialized rooms. Each node is in
//! one of three states: absent, loading, or loaded. The slot map is the single
//! source of truth for that state, so a second load of the same node joins the
//! first instead of producing a duplicate.
//!
//! Preloads run as background tasks tracked in a `JoinSet`. They can be
//! awaited with [`RoomContentLoader::wait_idle`] or aborted on teardown with
//! [`RoomContentLoader::shutdown`].

mod in_flight;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use level_core::{GridPos, LevelGraph, NodeId, RoomArchetype};
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::api::{
    ContentError, ContentHandle, ContentProducer, Result, RuntimeError, WorldPlacement,
};

use in_flight::InFlight;

/// Everything the loader needs to materialize one room.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub node: NodeId,
    pub archetype: Arc<RoomArchetype>,
    pub grid: GridPos,
}

impl LoadRequest {
    pub fn from_graph(graph: &LevelGraph, node: NodeId) -> Result<Self> {
        let room = graph.node(node).ok_or(RuntimeError::UnknownNode(node))?;
        Ok(Self {
            node,
            archetype: Arc::clone(room.archetype()),
            grid: room.grid(),
        })
    }
}

/// A materialized room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadedRoom {
    pub node: NodeId,
    pub handle: ContentHandle,
    pub grid: GridPos,
    pub placement: WorldPlacement,
    pub active: bool,
}

enum Slot {
    Loading(Arc<Notify>),
    Loaded(LoadedRoom),
}

enum Claim {
    Ready(LoadedRoom),
    Wait(Arc<Notify>),
    Owner,
}

struct LoaderInner {
    producer: Arc<dyn ContentProducer>,
    room_spacing: f32,
    slots: Mutex<HashMap<NodeId, Slot>>,
    background: Mutex<JoinSet<()>>,
}

impl LoaderInner {
    fn slots(&self) -> Result<MutexGuard<'_, HashMap<NodeId, Slot>>> {
        self.slots.lock().map_err(|_| RuntimeError::LockPoisoned)
    }

    fn background(&self) -> Result<MutexGuard<'_, JoinSet<()>>> {
        self.background.lock().map_err(|_| RuntimeError::LockPoisoned)
    }
}

/// Loads, tracks, and destroys room content. Clones share the same state.
#[derive(Clone)]
pub struct RoomContentLoader {
    inner: Arc<LoaderInner>,
}

impl RoomContentLoader {
    pub fn new(producer: Arc<dyn ContentProducer>, room_spacing: f32) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                producer,
                room_spacing,
                slots: Mutex::new(HashMap::new()),
                background: Mutex::new(JoinSet::new()),
            }),
        }
    }

    /// Materializes a room's content, inactive, unless it is already loaded.
    ///
    /// Joins an in-flight load of the same node instead of starting another.
    /// If the load being joined fails, this call retries it once as owner.
    pub async fn load(&self, request: LoadRequest) -> Result<LoadedRoom> {
        let node = request.node;
        loop {
            let notify = match self.claim(node)? {
                Claim::Ready(room) => return Ok(room),
                Claim::Owner => return self.materialize(request).await,
                Claim::Wait(notify) => notify,
            };

            // Registered before the re-check so a completion in between is not missed.
            let notified = notify.notified();
            if self.is_loading(node) {
                debug!(%node, "joining in-flight load");
                notified.await;
            }
        }
    }

    fn claim(&self, node: NodeId) -> Result<Claim> {
        let mut slots = self.inner.slots()?;
        Ok(match slots.get(&node) {
            Some(Slot::Loaded(room)) => Claim::Ready(*room),
            Some(Slot::Loading(notify)) => Claim::Wait(Arc::clone(notify)),
            None => {
                slots.insert(node, Slot::Loading(Arc::new(Notify::new())));
                Claim::Owner
            }
        })
    }

    async fn materialize(&self, request: LoadRequest) -> Result<LoadedRoom> {
        let guard = InFlight::new(&self.inner, request.node);
        let placement = WorldPlacement::from_grid(request.grid, self.inner.room_spacing);

        let outcome = self
            .instantiate_inactive(&request.archetype, placement)
            .await
            .map(|handle| LoadedRoom {
                node: request.node,
                handle,
                grid: request.grid,
                placement,
                active: false,
            });

        let room = guard.settle(outcome)?;
        debug!(
            node = %room.node,
            handle = %room.handle,
            archetype = %request.archetype.name,
            "room loaded"
        );
        Ok(room)
    }

    async fn instantiate_inactive(
        &self,
        archetype: &RoomArchetype,
        placement: WorldPlacement,
    ) -> std::result::Result<ContentHandle, ContentError> {
        let producer = &self.inner.producer;
        let handle = producer.instantiate(archetype, placement).await?;

        if let Err(err) = producer.set_active(handle, false) {
            if let Err(destroy_err) = producer.destroy(handle).await {
                warn!(%handle, %destroy_err, "failed to destroy half-loaded content");
            }
            return Err(err);
        }
        Ok(handle)
    }

    /// Destroys a room's content. Returns whether anything was unloaded.
    ///
    /// Unloading a room whose load is still in flight is ignored.
    pub async fn unload(&self, node: NodeId) -> Result<bool> {
        let room = {
            let mut slots = self.inner.slots()?;
            match slots.get(&node) {
                Some(Slot::Loaded(_)) => {}
                Some(Slot::Loading(_)) => {
                    warn!(%node, "unload requested while load is in flight, ignoring");
                    return Ok(false);
                }
                None => return Ok(false),
            }
            let Some(Slot::Loaded(room)) = slots.remove(&node) else {
                return Ok(false);
            };
            room
        };

        self.inner.producer.destroy(room.handle).await?;
        debug!(%node, handle = %room.handle, "room unloaded");
        Ok(true)
    }

    /// Queues background loads for every room within `max_steps` doors of
    /// `node`. Rooms already loaded or loading are skipped.
    ///
    /// Returns the number of loads queued. Failures are logged, not returned.
    pub fn preload_adjacent(
        &self,
        graph: &LevelGraph,
        node: NodeId,
        max_steps: u32,
    ) -> Result<usize> {
        let requests: Vec<LoadRequest> = {
            let slots = self.inner.slots()?;
            graph
                .nodes_within(node, max_steps)
                .into_iter()
                .filter(|(id, _)| !slots.contains_key(id))
                .filter_map(|(id, _)| LoadRequest::from_graph(graph, id).ok())
                .collect()
        };

        let mut tasks = self.inner.background()?;
        while tasks.try_join_next().is_some() {}

        let queued = requests.len();
        for request in requests {
            let loader = self.clone();
            tasks.spawn(async move {
                let node = request.node;
                if let Err(err) = loader.load(request).await {
                    warn!(%node, %err, "preload failed");
                }
            });
        }

        if queued > 0 {
            debug!(%node, queued, "preloading neighbours");
        }
        Ok(queued)
    }

    /// Unloads every loaded room farther than `max_distance` grid steps from
    /// `anchor`. The anchor itself is never evicted.
    pub async fn evict_distant(
        &self,
        graph: &LevelGraph,
        anchor: NodeId,
        max_distance: u32,
    ) -> Result<Vec<NodeId>> {
        self.evict_beyond(graph, anchor, max_distance, &[]).await
    }

    /// Like [`evict_distant`](Self::evict_distant), also sparing `keep`.
    pub async fn evict_beyond(
        &self,
        graph: &LevelGraph,
        anchor: NodeId,
        max_distance: u32,
        keep: &[NodeId],
    ) -> Result<Vec<NodeId>> {
        let origin = graph
            .node(anchor)
            .ok_or(RuntimeError::UnknownNode(anchor))?
            .grid();

        let mut distant: Vec<NodeId> = {
            let slots = self.inner.slots()?;
            slots
                .values()
                .filter_map(|slot| match slot {
                    Slot::Loaded(room) => Some(room),
                    Slot::Loading(_) => None,
                })
                .filter(|room| room.node != anchor && !keep.contains(&room.node))
                .filter(|room| room.grid.manhattan(origin) > max_distance)
                .map(|room| room.node)
                .collect()
        };
        distant.sort();

        for node in &distant {
            self.unload(*node).await?;
        }
        if !distant.is_empty() {
            debug!(%anchor, evicted = distant.len(), "evicted distant rooms");
        }
        Ok(distant)
    }

    pub fn activate(&self, node: NodeId) -> Result<()> {
        self.set_active(node, true)
    }

    pub fn deactivate(&self, node: NodeId) -> Result<()> {
        self.set_active(node, false)
    }

    fn set_active(&self, node: NodeId, active: bool) -> Result<()> {
        let mut slots = self.inner.slots()?;
        let Some(Slot::Loaded(room)) = slots.get_mut(&node) else {
            return Err(RuntimeError::RoomNotLoaded(node));
        };
        self.inner.producer.set_active(room.handle, active)?;
        room.active = active;
        Ok(())
    }

    pub fn get_loaded(&self, node: NodeId) -> Option<LoadedRoom> {
        let slots = self.inner.slots().ok()?;
        match slots.get(&node) {
            Some(Slot::Loaded(room)) => Some(*room),
            _ => None,
        }
    }

    pub fn is_loaded(&self, node: NodeId) -> bool {
        self.get_loaded(node).is_some()
    }

    fn is_loading(&self, node: NodeId) -> bool {
        self.inner
            .slots()
            .is_ok_and(|slots| matches!(slots.get(&node), Some(Slot::Loading(_))))
    }

    /// Loaded rooms in id order.
    pub fn loaded_nodes(&self) -> Vec<NodeId> {
        let Ok(slots) = self.inner.slots() else {
            return Vec::new();
        };
        let mut nodes: Vec<NodeId> = slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Loaded(_)))
            .map(|(node, _)| *node)
            .collect();
        nodes.sort();
        nodes
    }

    /// Waits until every queued background load has finished.
    pub async fn wait_idle(&self) -> Result<()> {
        loop {
            let mut tasks = std::mem::take(&mut *self.inner.background()?);
            if tasks.is_empty() {
                return Ok(());
            }
            while let Some(joined) = tasks.join_next().await {
                if let Err(err) = joined
                    && err.is_panic()
                {
                    warn!(%err, "preload task panicked");
                }
            }
        }
    }

    /// Aborts background loads and destroys every loaded room.
    ///
    /// Every room is attempted; the first destroy failure is returned.
    pub async fn shutdown(&self) -> Result<()> {
        let mut tasks = std::mem::take(&mut *self.inner.background()?);
        tasks.shutdown().await;

        let mut first_error = None;
        for node in self.loaded_nodes() {
            if let Err(err) = self.unload(node).await {
                warn!(%node, %err, "failed to unload room during shutdown");
                first_error.get_or_insert(err);
            }
        }
        debug!("room content loader shut down");
        first_error.map_or(Ok(()), Err)
    }
}
