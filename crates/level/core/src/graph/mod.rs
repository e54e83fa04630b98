//! Level graph: rooms as nodes, doors as directed edges.
//!
//! The graph owns every [`RoomNode`] and [`RoomEdge`] of one generated level.
//! Identifiers are handed out by the graph itself, so two graphs alive at the
//! same time never interfere and nothing has to be reset between levels.
//!
//! Door compatibility is enforced when an edge is added: the `from` room must
//! declare a free door on `direction` and the `to` room a free door on the
//! opposite side. An edge that would violate this is never created.

mod edge;
mod node;
mod query;

pub use edge::{EdgeId, RoomEdge};
pub use node::{GridPos, NodeId, RoomNode, RoomRole, RoomSpec, RoomState};
pub use query::Reachability;

use crate::direction::CardinalDirection;
use crate::error::GraphError;

/// All rooms and doors of one level.
#[derive(Clone, Debug, Default)]
pub struct LevelGraph {
    nodes: Vec<RoomNode>,
    edges: Vec<RoomEdge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    start: Option<NodeId>,
    boss: Option<NodeId>,
}

impl LevelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room and returns its id.
    ///
    /// Fails if the spec asks for a second start or boss room.
    pub fn add_node(&mut self, spec: RoomSpec) -> Result<NodeId, GraphError> {
        let id = NodeId(self.nodes.len() as u32);

        match spec.role {
            RoomRole::Start => {
                if let Some(existing) = self.start {
                    return Err(GraphError::DuplicateStart(existing));
                }
                self.start = Some(id);
            }
            RoomRole::Boss => {
                if let Some(existing) = self.boss {
                    return Err(GraphError::DuplicateBoss(existing));
                }
                self.boss = Some(id);
            }
            RoomRole::Standard => {}
        }

        self.nodes.push(RoomNode {
            id,
            grid: spec.grid,
            archetype: spec.archetype,
            depth: spec.depth,
            role: spec.role,
            state: Default::default(),
            connected: Default::default(),
        });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());

        Ok(id)
    }

    /// Adds a locked door from `from` to `to` through `direction`.
    ///
    /// Both endpoints must already exist and both door slots must be declared
    /// by their archetypes and still free.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        direction: CardinalDirection,
    ) -> Result<EdgeId, GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        let from_node = self.node(from).ok_or(GraphError::UnknownNode(from))?;
        let to_node = self.node(to).ok_or(GraphError::UnknownNode(to))?;

        check_door(from_node, direction)?;
        check_door(to_node, direction.opposite())?;
        let boss_door = to_node.is_boss();

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(RoomEdge {
            id,
            from,
            to,
            direction,
            reward: None,
            locked: true,
            boss_door,
        });
        self.outgoing[from.0 as usize].push(id);
        self.incoming[to.0 as usize].push(id);
        self.nodes[from.0 as usize].connected |= direction.as_door();
        self.nodes[to.0 as usize].connected |= direction.opposite().as_door();

        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RoomNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&RoomEdge> {
        self.edges.get(id.0 as usize)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoomNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RoomEdge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn boss(&self) -> Option<NodeId> {
        self.boss
    }

    /// Mutable access to the doors leaving `node`, for reward assignment.
    pub fn outgoing_mut(&mut self, node: NodeId) -> Vec<&mut RoomEdge> {
        let Some(ids) = self.outgoing.get(node.0 as usize) else {
            return Vec::new();
        };

        // Ids are appended in creation order, so each one lies past the last.
        let mut doors = Vec::with_capacity(ids.len());
        let mut rest = self.edges.as_mut_slice();
        let mut consumed = 0;
        for id in ids {
            let index = id.0 as usize;
            let remaining = std::mem::take(&mut rest);
            let Some((door, tail)) = remaining
                .get_mut(index - consumed..)
                .and_then(<[RoomEdge]>::split_first_mut)
            else {
                break;
            };
            doors.push(door);
            rest = tail;
            consumed = index + 1;
        }
        doors
    }

    pub fn set_state(&mut self, node: NodeId, state: RoomState) -> Result<(), GraphError> {
        let room = self
            .nodes
            .get_mut(node.0 as usize)
            .ok_or(GraphError::UnknownNode(node))?;
        room.state = state;
        Ok(())
    }

    /// Sets the lock flag of one door, returning its previous value.
    pub fn set_locked(&mut self, edge: EdgeId, locked: bool) -> Result<bool, GraphError> {
        let door = self
            .edges
            .get_mut(edge.0 as usize)
            .ok_or(GraphError::UnknownEdge(edge))?;
        Ok(std::mem::replace(&mut door.locked, locked))
    }

    /// Locks every door leaving `node` and returns the previous lock states.
    pub fn lock_outgoing(&mut self, node: NodeId) -> Vec<(EdgeId, bool)> {
        let ids = self
            .outgoing
            .get(node.0 as usize)
            .cloned()
            .unwrap_or_default();

        ids.into_iter()
            .filter_map(|id| {
                let door = self.edges.get_mut(id.0 as usize)?;
                Some((id, std::mem::replace(&mut door.locked, true)))
            })
            .collect()
    }
}

fn check_door(node: &RoomNode, direction: CardinalDirection) -> Result<(), GraphError> {
    if !node.archetype.has_door(direction) {
        return Err(GraphError::MissingDoor {
            node: node.id,
            direction,
        });
    }
    if node.connected.has(direction) {
        return Err(GraphError::DoorOccupied {
            node: node.id,
            direction,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::{RoomArchetype, RoomCategory};
    use crate::direction::DoorLayout;

    fn archetype(doors: DoorLayout) -> Arc<RoomArchetype> {
        Arc::new(RoomArchetype::new("room", RoomCategory::Combat, doors))
    }

    #[test]
    fn ids_are_scoped_to_each_graph() {
        let mut first = LevelGraph::new();
        let mut second = LevelGraph::new();
        let a = first.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        let b = second.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(0));
    }

    #[test]
    fn add_edge_rejects_unknown_endpoints() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();

        let err = graph
            .add_edge(start, NodeId(9), CardinalDirection::North)
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId(9)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn add_edge_requires_doors_on_both_sides() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::NORTH))).unwrap();
        let room = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::NORTH), GridPos::new(0, 1), 1))
            .unwrap();

        let err = graph
            .add_edge(start, room, CardinalDirection::North)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingDoor {
                node: room,
                direction: CardinalDirection::South,
            }
        );
        assert!(graph.node(start).unwrap().connected().is_empty());
    }

    #[test]
    fn door_slots_carry_one_edge() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        let a = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(0, 1), 1))
            .unwrap();
        let b = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(0, 2), 1))
            .unwrap();

        graph.add_edge(start, a, CardinalDirection::North).unwrap();
        let err = graph.add_edge(start, b, CardinalDirection::North).unwrap_err();
        assert!(matches!(err, GraphError::DoorOccupied { node, .. } if node == start));
    }

    #[test]
    fn new_edges_are_locked_and_mark_both_doors() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        let room = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::WEST), GridPos::new(1, 0), 1))
            .unwrap();
        let edge = graph.add_edge(start, room, CardinalDirection::East).unwrap();

        assert!(graph.edge(edge).unwrap().is_locked());
        assert!(graph.node(start).unwrap().connected().has(CardinalDirection::East));
        assert!(graph.node(room).unwrap().connected().has(CardinalDirection::West));
        assert!(graph.node(room).unwrap().free_doors().is_empty());
    }

    #[test]
    fn second_boss_is_rejected() {
        let mut graph = LevelGraph::new();
        let boss_archetype = Arc::new(RoomArchetype::new(
            "arena",
            RoomCategory::Boss,
            DoorLayout::all(),
        ));
        let boss = graph
            .add_node(RoomSpec::boss(Arc::clone(&boss_archetype), GridPos::new(5, 5), 3))
            .unwrap();
        let err = graph
            .add_node(RoomSpec::boss(boss_archetype, GridPos::new(6, 5), 3))
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateBoss(boss));
    }

    #[test]
    fn outgoing_mut_yields_only_doors_of_that_room() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        let north = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(0, 1), 1))
            .unwrap();
        let east = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(1, 0), 1))
            .unwrap();
        let first = graph.add_edge(start, north, CardinalDirection::North).unwrap();
        graph.add_edge(north, east, CardinalDirection::West).unwrap();
        let last = graph.add_edge(start, east, CardinalDirection::East).unwrap();

        let ids: Vec<EdgeId> = graph.outgoing_mut(start).iter().map(|edge| edge.id()).collect();
        assert_eq!(ids, vec![first, last]);
        assert!(graph.outgoing_mut(NodeId(7)).is_empty());
    }

    #[test]
    fn lock_outgoing_reports_previous_states() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(archetype(DoorLayout::all()))).unwrap();
        let north = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(0, 1), 1))
            .unwrap();
        let east = graph
            .add_node(RoomSpec::new(archetype(DoorLayout::all()), GridPos::new(1, 0), 1))
            .unwrap();
        let to_north = graph.add_edge(start, north, CardinalDirection::North).unwrap();
        let to_east = graph.add_edge(start, east, CardinalDirection::East).unwrap();
        graph.set_locked(to_north, false).unwrap();

        let previous = graph.lock_outgoing(start);
        assert_eq!(previous, vec![(to_north, false), (to_east, true)]);
        assert!(graph.edges().all(RoomEdge::is_locked));
    }
}
