//! Room state machine: entry, completion, and door transitions.
//!
//! [`RoomRuntime`] owns the mutable level graph and tracks which room is
//! current. All graph mutation happens here, on a single logical owner, while
//! content loads run concurrently in the [`RoomContentLoader`].
//!
//! A transition is all-or-nothing. If anything fails after the current room's
//! doors were locked, the doors get their previous lock states back, the
//! previous room is reactivated, and the current room does not change.
use std::collections::BTreeSet;
use std::sync::Arc;

use level_core::{EdgeId, LevelGraph, NodeId, RoomEdge, RoomState};
use tracing::{debug, info, warn};

use crate::api::{EntryAnchor, OccupantRelocator, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, LevelEvent, RoomEvent};
use crate::loader::{LoadRequest, RoomContentLoader};

/// Coarse runtime phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomPhase {
    NoActiveRoom,
    RoomActive(NodeId),
}

pub struct RoomRuntime {
    graph: LevelGraph,
    loader: RoomContentLoader,
    relocator: Arc<dyn OccupantRelocator>,
    events: EventBus,
    config: RuntimeConfig,
    current: Option<NodeId>,
    visited: BTreeSet<NodeId>,
    cleared: BTreeSet<NodeId>,
}

impl RoomRuntime {
    pub fn new(
        graph: LevelGraph,
        loader: RoomContentLoader,
        relocator: Arc<dyn OccupantRelocator>,
        events: EventBus,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            graph,
            loader,
            relocator,
            events,
            config,
            current: None,
            visited: BTreeSet::new(),
            cleared: BTreeSet::new(),
        }
    }

    pub fn graph(&self) -> &LevelGraph {
        &self.graph
    }

    pub fn loader(&self) -> &RoomContentLoader {
        &self.loader
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn phase(&self) -> RoomPhase {
        match self.current {
            Some(node) => RoomPhase::RoomActive(node),
            None => RoomPhase::NoActiveRoom,
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Rooms entered at least once, in id order.
    pub fn visited(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.visited.iter().copied()
    }

    pub fn is_cleared(&self, node: NodeId) -> bool {
        self.cleared.contains(&node)
    }

    /// Unlocked doors out of the current room.
    pub fn available_exits(&self) -> Vec<&RoomEdge> {
        match self.current {
            Some(node) => self.graph.available_exits(node),
            None => Vec::new(),
        }
    }

    /// Loads and activates `node`, makes it current, and queues preloads of
    /// its neighbourhood.
    ///
    /// Doors out of rooms without an encounter, and out of rooms already
    /// cleared, open immediately. Publishes [`RoomEvent::Entered`].
    pub async fn enter_room(&mut self, node: NodeId) -> Result<()> {
        let request = LoadRequest::from_graph(&self.graph, node)?;
        self.loader.load(request).await?;
        self.loader.activate(node)?;
        self.settle_in(node)
    }

    /// Bookkeeping once `node` is loaded and active.
    fn settle_in(&mut self, node: NodeId) -> Result<()> {
        let queued = self
            .loader
            .preload_adjacent(&self.graph, node, self.config.preload_distance)?;

        let (category, depth) = {
            let room = self.graph.node(node).ok_or(RuntimeError::UnknownNode(node))?;
            (room.category(), room.depth())
        };
        self.graph.set_state(node, RoomState::Visited)?;
        self.visited.insert(node);
        self.current = Some(node);

        let unlocked = if !category.has_encounter() || self.cleared.contains(&node) {
            self.unlock_exits(node)?
        } else {
            0
        };

        info!(%node, %category, depth, unlocked, queued, "entered room");
        self.events.publish(RoomEvent::Entered {
            node,
            category,
            depth,
        });
        Ok(())
    }

    /// Marks the current room finished and opens its doors.
    ///
    /// Returns the number of doors unlocked. Without a current room this does
    /// nothing.
    pub fn complete_current_room(&mut self) -> Result<usize> {
        let Some(node) = self.current else {
            debug!("no active room to complete");
            return Ok(0);
        };

        self.cleared.insert(node);
        self.graph.set_state(node, RoomState::Available)?;
        let unlocked = self.unlock_exits(node)?;

        info!(%node, unlocked, "room completed");
        self.events
            .publish(RoomEvent::Completed { node, unlocked });
        Ok(unlocked)
    }

    /// Reports that the current room's encounter is over.
    ///
    /// Only the first report per room has an effect. Clearing the boss room
    /// publishes [`LevelEvent::Won`]; any other room is completed.
    pub fn notify_encounter_cleared(&mut self) -> Result<()> {
        let node = self.current.ok_or(RuntimeError::NoActiveRoom)?;
        if self.cleared.contains(&node) {
            debug!(%node, "encounter already cleared");
            return Ok(());
        }

        if self.graph.boss() == Some(node) {
            self.cleared.insert(node);
            info!(boss = %node, "level won");
            self.events.publish(LevelEvent::Won { boss: node });
            return Ok(());
        }

        self.complete_current_room().map(|_| ())
    }

    /// Moves from the current room to `target` through door `via`.
    ///
    /// The door must lead from the current room to `target` and be unlocked.
    /// On success the target is current and [`RoomEvent::TransitionCompleted`]
    /// is published. On failure nothing observable changes.
    pub async fn request_transition(&mut self, target: NodeId, via: EdgeId) -> Result<()> {
        let previous = self.current.ok_or(RuntimeError::NoActiveRoom)?;
        let edge = self.graph.edge(via).ok_or(RuntimeError::UnknownEdge(via))?;
        if !self.graph.contains(target) {
            return Err(RuntimeError::UnknownNode(target));
        }
        if edge.from() != previous || edge.to() != target {
            return Err(RuntimeError::EdgeMismatch {
                edge: via,
                from: edge.from(),
                to: edge.to(),
                current: previous,
                target,
            });
        }
        if edge.is_locked() {
            return Err(RuntimeError::EdgeLocked(via));
        }
        let request = LoadRequest::from_graph(&self.graph, target)?;

        debug!(%previous, %target, %via, "transition started");
        let saved_locks = self.graph.lock_outgoing(previous);

        if let Err(err) = self.move_into(previous, request).await {
            warn!(%previous, %target, %via, %err, "transition failed, restoring previous room");
            self.rollback(previous, target, &saved_locks);
            return Err(err);
        }

        self.events.publish(RoomEvent::TransitionCompleted {
            previous,
            current: target,
            via,
        });
        Ok(())
    }

    async fn move_into(&mut self, previous: NodeId, request: LoadRequest) -> Result<()> {
        let target = request.node;

        self.loader
            .evict_beyond(&self.graph, target, self.config.evict_distance, &[previous])
            .await?;

        let room = self.loader.load(request).await?;
        if self.loader.is_loaded(previous) {
            self.loader.deactivate(previous)?;
        }
        self.loader.activate(target)?;

        self.relocator.relocate(EntryAnchor {
            node: target,
            position: room.placement,
        });
        if let Err(err) = self.settle_in(target) {
            if let Some(origin) = self.loader.get_loaded(previous) {
                self.relocator.relocate(EntryAnchor {
                    node: previous,
                    position: origin.placement,
                });
            }
            return Err(err);
        }
        Ok(())
    }

    fn rollback(&mut self, previous: NodeId, target: NodeId, saved_locks: &[(EdgeId, bool)]) {
        for &(edge, locked) in saved_locks {
            if let Err(err) = self.graph.set_locked(edge, locked) {
                warn!(%edge, %err, "failed to restore door lock");
            }
        }
        if self.loader.get_loaded(target).is_some_and(|room| room.active)
            && let Err(err) = self.loader.deactivate(target)
        {
            warn!(%target, %err, "failed to deactivate abandoned room");
        }
        if self.loader.is_loaded(previous)
            && let Err(err) = self.loader.activate(previous)
        {
            warn!(%previous, %err, "failed to reactivate previous room");
        }
        self.current = Some(previous);
    }

    fn unlock_exits(&mut self, node: NodeId) -> Result<usize> {
        let exits: Vec<EdgeId> = self.graph.outgoing(node).map(|edge| edge.id()).collect();
        let mut unlocked = 0;
        for edge in exits {
            if self.graph.set_locked(edge, false)? {
                unlocked += 1;
            }
        }
        Ok(unlocked)
    }
}
