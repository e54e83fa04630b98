//! Depth-aware weighted reward assignment.
//!
//! Base weights come from [`RewardConfig::weights`] and are scaled by level
//! progress `p = depth / total_depth`:
//!
//! | type       | multiplier                       |
//! |------------|----------------------------------|
//! | currency   | `1 - 0.3p`                        |
//! | upgrade    | `1 + 0.5p`                        |
//! | weapon     | `1 + 0.3p`                        |
//! | consumable | `1`                               |
//! | elite      | `0.2` below `p = 0.3`, else `1 + p` |
//! | shop       | `0.5 + p`                         |
//! | event      | `1`                               |
//!
//! A type already offered by a sibling door keeps only
//! [`RewardConfig::duplicate_penalty`] of its weight, so rooms with few usable
//! types still get rewards on every door.

use crate::config::RewardConfig;
use crate::graph::RoomEdge;
use crate::seed::SeedSource;
use crate::weighted::pick_weighted;

use super::{DoorType, Reward};

/// Door types eligible for the weighted draw, in table order.
const WEIGHTED_TYPES: [DoorType; 7] = [
    DoorType::Currency,
    DoorType::Upgrade,
    DoorType::Weapon,
    DoorType::Consumable,
    DoorType::Elite,
    DoorType::Shop,
    DoorType::Event,
];

const ELITE_UNLOCK_PROGRESS: f32 = 0.3;

#[derive(Clone, Debug, Default)]
pub struct RewardAssigner {
    config: RewardConfig,
}

impl RewardAssigner {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Assigns a reward to every edge in `edges`.
    ///
    /// `edges` are the sibling doors of one room at `depth`. Boss doors always
    /// receive [`Reward::boss`] and do not take part in the weighted draw.
    pub fn assign(
        &self,
        edges: &mut [&mut RoomEdge],
        depth: u32,
        total_depth: u32,
        rng: &mut SeedSource,
    ) {
        let mut used: Vec<DoorType> = Vec::with_capacity(edges.len());

        for edge in edges.iter_mut() {
            if edge.is_boss_door() {
                edge.set_reward(Reward::boss());
                continue;
            }

            let door_type = self.draw(depth, total_depth, &used, rng);
            used.push(door_type);
            edge.set_reward(self.build_reward(door_type, depth, rng));
        }
    }

    /// Depth-adjusted weight of each weighted door type.
    pub fn adjusted_weights(&self, depth: u32, total_depth: u32) -> [(DoorType, f32); 7] {
        let progress = if total_depth == 0 {
            0.0
        } else {
            (depth as f32 / total_depth as f32).clamp(0.0, 1.0)
        };
        let base = &self.config.weights;

        WEIGHTED_TYPES.map(|door_type| {
            let weight = match door_type {
                DoorType::Currency => base.currency * (1.0 - 0.3 * progress),
                DoorType::Upgrade => base.upgrade * (1.0 + 0.5 * progress),
                DoorType::Weapon => base.weapon * (1.0 + 0.3 * progress),
                DoorType::Consumable => base.consumable,
                DoorType::Elite if progress < ELITE_UNLOCK_PROGRESS => base.elite * 0.2,
                DoorType::Elite => base.elite * (1.0 + progress),
                DoorType::Shop => base.shop * (0.5 + progress),
                DoorType::Event => base.event,
                DoorType::Boss => 0.0,
            };
            (door_type, weight.max(0.0))
        })
    }

    fn draw(
        &self,
        depth: u32,
        total_depth: u32,
        used: &[DoorType],
        rng: &mut SeedSource,
    ) -> DoorType {
        let table = self.adjusted_weights(depth, total_depth);
        let weights: Vec<f32> = table
            .iter()
            .map(|(door_type, weight)| {
                if used.contains(door_type) {
                    weight * self.config.duplicate_penalty
                } else {
                    *weight
                }
            })
            .collect();

        pick_weighted(&weights, rng)
            .map(|index| table[index].0)
            .unwrap_or(DoorType::Currency)
    }

    fn build_reward(&self, door_type: DoorType, depth: u32, rng: &mut SeedSource) -> Reward {
        let reward = Reward::new(door_type);
        let (base, per_depth) = match door_type {
            DoorType::Currency => (self.config.currency_base, self.config.currency_per_depth),
            DoorType::Elite => (self.config.elite_base, self.config.elite_per_depth),
            _ => return reward,
        };

        let jitter = rng.next_int(self.config.amount_jitter.saturating_add(1));
        reward.with_amount(
            base.saturating_add(per_depth.saturating_mul(depth))
                .saturating_add(jitter),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::{RoomArchetype, RoomCategory};
    use crate::config::DoorWeights;
    use crate::direction::{CardinalDirection, DoorLayout};
    use crate::graph::{GridPos, LevelGraph, NodeId, RoomSpec};

    /// A start room with doors east and north into two plain rooms, plus a
    /// boss room to the west.
    fn fork() -> (LevelGraph, NodeId) {
        let open = Arc::new(RoomArchetype::new("open", RoomCategory::Combat, DoorLayout::all()));
        let arena = Arc::new(RoomArchetype::new("arena", RoomCategory::Boss, DoorLayout::all()));
        let mut graph = LevelGraph::new();
        let start = graph.add_node(RoomSpec::start(Arc::clone(&open))).unwrap();
        let east = graph
            .add_node(RoomSpec::new(Arc::clone(&open), GridPos::new(1, 0), 1))
            .unwrap();
        let north = graph
            .add_node(RoomSpec::new(open, GridPos::new(0, 1), 1))
            .unwrap();
        let boss = graph
            .add_node(RoomSpec::boss(arena, GridPos::new(-1, 0), 1))
            .unwrap();
        graph.add_edge(start, east, CardinalDirection::East).unwrap();
        graph.add_edge(start, north, CardinalDirection::North).unwrap();
        graph.add_edge(start, boss, CardinalDirection::West).unwrap();
        (graph, start)
    }

    fn sibling_types(graph: &LevelGraph, node: NodeId) -> Vec<DoorType> {
        graph
            .outgoing(node)
            .filter(|edge| !edge.is_boss_door())
            .map(|edge| edge.reward().unwrap().door_type)
            .collect()
    }

    #[test]
    fn every_edge_gets_a_valid_reward_and_boss_door_is_fixed() {
        let (mut graph, start) = fork();
        let assigner = RewardAssigner::default();
        let mut rng = SeedSource::new(42);

        assigner.assign(&mut graph.outgoing_mut(start), 0, 6, &mut rng);

        for edge in graph.outgoing(start) {
            assert!(edge.has_valid_reward());
            if edge.is_boss_door() {
                assert_eq!(edge.reward(), Some(&Reward::boss()));
            } else {
                assert_ne!(edge.reward().unwrap().door_type, DoorType::Boss);
            }
        }
    }

    #[test]
    fn siblings_rarely_share_a_type() {
        let assigner = RewardAssigner::default();
        let mut duplicates = 0;

        for seed in 0..200 {
            let (mut graph, start) = fork();
            let mut rng = SeedSource::new(seed);
            assigner.assign(&mut graph.outgoing_mut(start), 0, 6, &mut rng);

            let types = sibling_types(&graph, start);
            if types[0] == types[1] {
                duplicates += 1;
            }
        }

        // Without the sibling penalty roughly a quarter of pairs would collide.
        assert!(duplicates < 30, "{duplicates} duplicate pairs out of 200");
    }

    #[test]
    fn seed_42_offers_two_distinct_doors_at_depth_zero() {
        let (mut graph, start) = fork();
        let mut rng = SeedSource::new(42);
        RewardAssigner::default().assign(&mut graph.outgoing_mut(start), 0, 6, &mut rng);

        assert_eq!(
            sibling_types(&graph, start),
            vec![DoorType::Currency, DoorType::Upgrade]
        );
        let currency = graph.outgoing(start).next().unwrap().reward().unwrap();
        assert!(currency.amount.is_some_and(|amount| (50..=60).contains(&amount)));
    }

    #[test]
    fn single_usable_type_is_reused() {
        let weights = DoorWeights {
            currency: 1.0,
            upgrade: 0.0,
            weapon: 0.0,
            consumable: 0.0,
            elite: 0.0,
            shop: 0.0,
            event: 0.0,
        };
        let assigner = RewardAssigner::new(RewardConfig {
            weights,
            ..RewardConfig::default()
        });
        let (mut graph, start) = fork();
        let mut rng = SeedSource::new(8);

        assigner.assign(&mut graph.outgoing_mut(start), 0, 6, &mut rng);
        assert_eq!(
            sibling_types(&graph, start),
            vec![DoorType::Currency, DoorType::Currency]
        );
    }

    #[test]
    fn progress_shifts_weights() {
        let assigner = RewardAssigner::default();
        let early = assigner.adjusted_weights(0, 10);
        let late = assigner.adjusted_weights(10, 10);
        let weight = |table: &[(DoorType, f32); 7], door_type: DoorType| {
            table.iter().find(|(t, _)| *t == door_type).unwrap().1
        };

        assert!(weight(&late, DoorType::Currency) < weight(&early, DoorType::Currency));
        assert!((weight(&late, DoorType::Currency) - 0.35 * 0.7).abs() < 1e-6);
        assert!(weight(&late, DoorType::Upgrade) > weight(&early, DoorType::Upgrade));
        assert!(weight(&late, DoorType::Weapon) > weight(&early, DoorType::Weapon));
        assert!(weight(&late, DoorType::Elite) > weight(&early, DoorType::Elite) * 5.0);
        assert!(weight(&late, DoorType::Shop) > weight(&early, DoorType::Shop));
        assert_eq!(weight(&late, DoorType::Event), weight(&early, DoorType::Event));
        assert_eq!(
            weight(&late, DoorType::Consumable),
            weight(&early, DoorType::Consumable)
        );
    }

    #[test]
    fn currency_amount_scales_with_depth() {
        let assigner = RewardAssigner::default();
        let mut rng = SeedSource::new(1);
        let config = RewardConfig::default();

        for depth in [0, 3, 7] {
            let reward = assigner.build_reward(DoorType::Currency, depth, &mut rng);
            let amount = reward.amount.unwrap();
            let floor = config.currency_base + config.currency_per_depth * depth;
            assert!((floor..=floor + config.amount_jitter).contains(&amount));
        }

        let upgrade = assigner.build_reward(DoorType::Upgrade, 5, &mut rng);
        assert_eq!(upgrade.amount, None);
    }
}
