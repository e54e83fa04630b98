//! Read-only traversal queries over a [`LevelGraph`].
//!
//! Every query tolerates rooms without doors (empty result, no error) and
//! unknown ids (treated as unreachable).

use std::collections::{HashMap, VecDeque};

use super::{EdgeId, LevelGraph, NodeId, RoomEdge};

/// Which doors a traversal may pass through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reachability {
    /// Every door counts, regardless of lock state. Used for validation.
    Structural,
    /// Only unlocked doors count. Reflects what the player can walk right now.
    Traversal,
}

impl Reachability {
    fn admits(self, edge: &RoomEdge) -> bool {
        match self {
            Reachability::Structural => true,
            Reachability::Traversal => !edge.locked,
        }
    }
}

impl LevelGraph {
    /// Doors leaving `node`, locked or not.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &RoomEdge> {
        self.edge_list(&self.outgoing, node)
    }

    /// Doors arriving at `node`, locked or not.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &RoomEdge> {
        self.edge_list(&self.incoming, node)
    }

    /// Unlocked doors leaving `node`.
    pub fn available_exits(&self, node: NodeId) -> Vec<&RoomEdge> {
        self.outgoing(node).filter(|edge| !edge.locked).collect()
    }

    pub fn is_reachable(&self, from: NodeId, to: NodeId, mode: Reachability) -> bool {
        self.contains(to) && self.distances_from(from, mode, None).contains_key(&to)
    }

    /// BFS distance of `node` from the start room, `None` when unreachable.
    pub fn depth_of(&self, node: NodeId) -> Option<u32> {
        let start = self.start?;
        self.distances_from(start, Reachability::Structural, None)
            .get(&node)
            .copied()
    }

    /// Fewest-doors path from `from` to `to`, both ends included.
    ///
    /// Returns an empty vector when `to` cannot be reached.
    pub fn shortest_path(&self, from: NodeId, to: NodeId, mode: Reachability) -> Vec<NodeId> {
        if !self.contains(from) || !self.contains(to) {
            return Vec::new();
        }

        let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        let mut seen = vec![false; self.node_count()];
        seen[from.0 as usize] = true;

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(&parent) = parents.get(&cursor) {
                    path.push(parent);
                    cursor = parent;
                }
                path.reverse();
                return path;
            }
            for edge in self.outgoing(current).filter(|edge| mode.admits(edge)) {
                let next = edge.to.0 as usize;
                if !seen[next] {
                    seen[next] = true;
                    parents.insert(edge.to, current);
                    queue.push_back(edge.to);
                }
            }
        }

        Vec::new()
    }

    /// Structural shortest path from `from` to the boss room.
    pub fn shortest_path_to_boss(&self, from: NodeId) -> Vec<NodeId> {
        match self.boss {
            Some(boss) => self.shortest_path(from, boss, Reachability::Structural),
            None => Vec::new(),
        }
    }

    /// Rooms reachable from `node` in at most `max_steps` doors, with their
    /// distance. The origin itself is not included.
    pub fn nodes_within(&self, node: NodeId, max_steps: u32) -> Vec<(NodeId, u32)> {
        let mut found: Vec<(NodeId, u32)> = self
            .distances_from(node, Reachability::Structural, Some(max_steps))
            .into_iter()
            .filter(|(id, _)| *id != node)
            .collect();
        found.sort_by_key(|(id, distance)| (*distance, *id));
        found
    }

    /// Manhattan distance between two rooms' grid cells.
    pub fn grid_distance(&self, a: NodeId, b: NodeId) -> Option<u32> {
        Some(self.node(a)?.grid.manhattan(self.node(b)?.grid))
    }

    fn edge_list<'a>(
        &'a self,
        index: &'a [Vec<EdgeId>],
        node: NodeId,
    ) -> impl Iterator<Item = &'a RoomEdge> + 'a {
        index
            .get(node.0 as usize)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edge(*id))
    }

    fn distances_from(
        &self,
        from: NodeId,
        mode: Reachability,
        limit: Option<u32>,
    ) -> HashMap<NodeId, u32> {
        let mut distances = HashMap::new();
        if !self.contains(from) {
            return distances;
        }

        distances.insert(from, 0);
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            let distance = distances[&current];
            if limit.is_some_and(|limit| distance >= limit) {
                continue;
            }
            for edge in self.outgoing(current).filter(|edge| mode.admits(edge)) {
                if !distances.contains_key(&edge.to) {
                    distances.insert(edge.to, distance + 1);
                    queue.push_back(edge.to);
                }
            }
        }
        distances
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::{RoomArchetype, RoomCategory};
    use crate::direction::{CardinalDirection, DoorLayout};
    use crate::graph::{GridPos, RoomSpec};

    /// start ─E→ a ─E→ b ─E→ boss, plus an isolated room `c`.
    fn corridor() -> (LevelGraph, [NodeId; 5]) {
        let open = Arc::new(RoomArchetype::new("open", RoomCategory::Combat, DoorLayout::all()));
        let arena = Arc::new(RoomArchetype::new("arena", RoomCategory::Boss, DoorLayout::all()));

        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(Arc::clone(&open))).unwrap();
        let a = graph
            .add_node(RoomSpec::new(Arc::clone(&open), GridPos::new(1, 0), 1))
            .unwrap();
        let b = graph
            .add_node(RoomSpec::new(Arc::clone(&open), GridPos::new(2, 0), 2))
            .unwrap();
        let boss = graph
            .add_node(RoomSpec::boss(arena, GridPos::new(3, 0), 3))
            .unwrap();
        let c = graph
            .add_node(RoomSpec::new(open, GridPos::new(0, 5), 1))
            .unwrap();

        graph.add_edge(start, a, CardinalDirection::East).unwrap();
        graph.add_edge(a, b, CardinalDirection::East).unwrap();
        graph.add_edge(b, boss, CardinalDirection::East).unwrap();
        (graph, [start, a, b, boss, c])
    }

    #[test]
    fn structural_reachability_ignores_locks() {
        let (graph, [start, _, _, boss, c]) = corridor();
        assert!(graph.is_reachable(start, boss, Reachability::Structural));
        assert!(!graph.is_reachable(start, boss, Reachability::Traversal));
        assert!(!graph.is_reachable(start, c, Reachability::Structural));
    }

    #[test]
    fn traversal_follows_unlocked_doors() {
        let (mut graph, [start, a, b, boss, _]) = corridor();
        for edge in [EdgeId(0), EdgeId(1)] {
            graph.set_locked(edge, false).unwrap();
        }
        assert!(graph.is_reachable(start, b, Reachability::Traversal));
        assert!(!graph.is_reachable(start, boss, Reachability::Traversal));
        assert_eq!(graph.available_exits(a).len(), 1);
        assert!(graph.available_exits(b).is_empty());
    }

    #[test]
    fn depth_and_paths() {
        let (graph, [start, a, b, boss, c]) = corridor();
        assert_eq!(graph.depth_of(start), Some(0));
        assert_eq!(graph.depth_of(boss), Some(3));
        assert_eq!(graph.depth_of(c), None);
        assert_eq!(graph.shortest_path_to_boss(a), vec![a, b, boss]);
        assert!(graph.shortest_path_to_boss(c).is_empty());
        assert_eq!(graph.shortest_path(start, start, Reachability::Structural), vec![start]);
    }

    #[test]
    fn rooms_without_doors_yield_empty_results() {
        let (graph, [_, _, _, _, c]) = corridor();
        assert_eq!(graph.outgoing(c).count(), 0);
        assert!(graph.available_exits(c).is_empty());
        assert!(graph.nodes_within(c, 2).is_empty());
        assert_eq!(graph.outgoing(NodeId(99)).count(), 0);
    }

    #[test]
    fn nodes_within_is_bounded() {
        let (graph, [start, a, b, _, _]) = corridor();
        assert_eq!(graph.nodes_within(start, 2), vec![(a, 1), (b, 2)]);
        assert_eq!(graph.grid_distance(start, b), Some(2));
    }
}
