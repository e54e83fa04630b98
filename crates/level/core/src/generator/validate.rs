use crate::error::ValidationError;
use crate::graph::{LevelGraph, Reachability};
use crate::reward::DoorType;

/// Checks every invariant a playable level must hold.
///
/// - start and boss rooms are set
/// - the boss is structurally reachable from the start
/// - every room other than start and boss has at least one connected door
/// - every room other than the boss has at least one exit
/// - every door pairs matching slots and carries a valid reward; doors into
///   the boss room carry the boss reward
pub fn validate(graph: &LevelGraph) -> Result<(), ValidationError> {
    let start = graph.start().ok_or(ValidationError::MissingStart)?;
    let boss = graph.boss().ok_or(ValidationError::MissingBoss)?;

    if !graph.is_reachable(start, boss, Reachability::Structural) {
        return Err(ValidationError::BossUnreachable { start, boss });
    }

    if let Some(orphan) = graph
        .nodes()
        .find(|node| !node.is_start() && !node.is_boss() && node.connected().is_empty())
    {
        return Err(ValidationError::OrphanRoom(orphan.id()));
    }

    if let Some(dead_end) = graph
        .nodes()
        .find(|node| !node.is_boss() && graph.outgoing(node.id()).next().is_none())
    {
        return Err(ValidationError::DeadEnd(dead_end.id()));
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(edge.from()), graph.node(edge.to())) else {
            return Err(ValidationError::DoorMismatch(edge.id()));
        };
        if !from.archetype().has_door(edge.direction())
            || !to.archetype().has_door(edge.direction().opposite())
        {
            return Err(ValidationError::DoorMismatch(edge.id()));
        }

        let boss_reward = edge
            .reward()
            .is_some_and(|reward| reward.door_type == DoorType::Boss);
        if !edge.has_valid_reward() || edge.is_boss_door() != boss_reward {
            return Err(ValidationError::MissingReward(edge.id()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::{RoomArchetype, RoomCategory};
    use crate::direction::{CardinalDirection, DoorLayout};
    use crate::graph::{GridPos, NodeId, RoomSpec};
    use crate::reward::Reward;

    fn open(category: RoomCategory) -> Arc<RoomArchetype> {
        Arc::new(RoomArchetype::new("open", category, DoorLayout::all()))
    }

    /// start ─E→ room ─E→ boss with rewards assigned.
    fn valid() -> LevelGraph {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(open(RoomCategory::Combat))).unwrap();
        let room = graph
            .add_node(RoomSpec::new(open(RoomCategory::Combat), GridPos::new(1, 0), 1))
            .unwrap();
        let boss = graph
            .add_node(RoomSpec::boss(open(RoomCategory::Boss), GridPos::new(2, 0), 2))
            .unwrap();
        graph.add_edge(start, room, CardinalDirection::East).unwrap();
        graph.add_edge(room, boss, CardinalDirection::East).unwrap();

        for node in [start, room] {
            for edge in graph.outgoing_mut(node) {
                let reward = if edge.is_boss_door() {
                    Reward::boss()
                } else {
                    Reward::new(DoorType::Weapon)
                };
                edge.set_reward(reward);
            }
        }
        graph
    }

    #[test]
    fn accepts_a_complete_level() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn rejects_missing_rewards() {
        let mut graph = valid();
        let room = NodeId(1);
        let mut doors = graph.outgoing_mut(room);
        doors[0].reward = None;

        assert!(matches!(
            validate(&graph),
            Err(ValidationError::MissingReward(_))
        ));
    }

    #[test]
    fn rejects_orphans_and_missing_boss() {
        let mut graph = valid();
        graph
            .add_node(RoomSpec::new(open(RoomCategory::Shop), GridPos::new(9, 9), 1))
            .unwrap();
        assert_eq!(validate(&graph), Err(ValidationError::OrphanRoom(NodeId(3))));

        let mut graph = LevelGraph::new();
        graph.add_node(RoomSpec::start(open(RoomCategory::Combat))).unwrap();
        assert_eq!(validate(&graph), Err(ValidationError::MissingBoss));
    }

    #[test]
    fn rejects_rooms_without_exits() {
        let mut graph = valid();
        let side = graph
            .add_node(RoomSpec::new(open(RoomCategory::Event), GridPos::new(0, 1), 1))
            .unwrap();
        let door = graph
            .add_edge(NodeId(0), side, CardinalDirection::North)
            .unwrap();
        graph
            .outgoing_mut(NodeId(0))
            .into_iter()
            .find(|edge| edge.id() == door)
            .unwrap()
            .set_reward(Reward::new(DoorType::Shop));

        assert_eq!(validate(&graph), Err(ValidationError::DeadEnd(side)));
    }

    #[test]
    fn boss_must_be_reachable() {
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(open(RoomCategory::Combat))).unwrap();
        let room = graph
            .add_node(RoomSpec::new(open(RoomCategory::Combat), GridPos::new(1, 0), 1))
            .unwrap();
        let boss = graph
            .add_node(RoomSpec::boss(open(RoomCategory::Boss), GridPos::new(-1, 0), 1))
            .unwrap();
        graph.add_edge(start, room, CardinalDirection::East).unwrap();
        graph.add_edge(boss, start, CardinalDirection::East).unwrap();

        assert_eq!(
            validate(&graph),
            Err(ValidationError::BossUnreachable { start, boss })
        );
    }
}
