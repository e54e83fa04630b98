//! A single generation attempt.
//!
//! The attempt owns a fresh [`LevelGraph`] and its own random stream. It never
//! touches state outside itself, so a failed attempt is discarded simply by
//! dropping it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::catalogue::{ArchetypeCatalogue, RoomArchetype, RoomCategory};
use crate::config::GenerationConfig;
use crate::direction::CardinalDirection;
use crate::error::ValidationError;
use crate::graph::{GridPos, LevelGraph, NodeId, RoomSpec};
use crate::reward::RewardAssigner;
use crate::seed::SeedSource;

use super::category::choose_category;
use super::validate::validate;

pub(crate) struct Attempt<'a> {
    config: &'a GenerationConfig,
    catalogue: &'a ArchetypeCatalogue,
    assigner: &'a RewardAssigner,
    rng: SeedSource,
    graph: LevelGraph,
    occupied: HashMap<GridPos, NodeId>,
    /// Rooms still waiting for their extra exits.
    pending: VecDeque<NodeId>,
    target_rooms: u32,
    total_depth: u32,
}

impl<'a> Attempt<'a> {
    pub(crate) fn new(
        config: &'a GenerationConfig,
        catalogue: &'a ArchetypeCatalogue,
        assigner: &'a RewardAssigner,
        rng: SeedSource,
    ) -> Self {
        Self {
            config,
            catalogue,
            assigner,
            rng,
            graph: LevelGraph::new(),
            occupied: HashMap::new(),
            pending: VecDeque::new(),
            target_rooms: 0,
            total_depth: 0,
        }
    }

    /// Runs every construction step and validates the result.
    pub(crate) fn run(mut self) -> Result<LevelGraph, ValidationError> {
        self.place_start()?;

        self.target_rooms = self
            .rng
            .next_int_range(self.config.min_rooms as i32, self.config.max_rooms as i32 + 1)
            as u32;
        self.total_depth = self.target_rooms + 1;
        debug!(
            target_rooms = self.target_rooms,
            total_depth = self.total_depth,
            "growing level"
        );

        self.grow()?;
        self.place_boss()?;
        self.repair();
        self.connect_dead_ends();
        self.assign_rewards();

        validate(&self.graph)?;
        Ok(self.graph)
    }

    fn room_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    fn has_budget(&self) -> bool {
        self.room_count() < self.target_rooms
    }

    fn place_start(&mut self) -> Result<(), ValidationError> {
        let archetype = self
            .catalogue
            .pick(RoomCategory::Combat, Some(0), None, &mut self.rng)
            .or_else(|| {
                self.catalogue
                    .pick(RoomCategory::Combat, None, None, &mut self.rng)
            })
            .ok_or(ValidationError::MissingStart)?;

        let start = self
            .graph
            .add_node(RoomSpec::start(archetype))
            .map_err(|_| ValidationError::MissingStart)?;
        self.occupied.insert(GridPos::ORIGIN, start);
        self.pending.push_back(start);
        Ok(())
    }

    /// Path growth: attach rooms to random parents until the room budget is
    /// met or the iteration budget runs out.
    fn grow(&mut self) -> Result<(), ValidationError> {
        let iterations = self
            .target_rooms
            .saturating_mul(self.config.growth_tries_per_room.max(1));

        self.drain_pending();
        for _ in 0..iterations {
            if !self.has_budget() {
                break;
            }

            let frontier = self.frontier();
            if frontier.is_empty() {
                break;
            }
            let parent = frontier[self.rng.next_index(frontier.len())];

            match self.grow_from(parent) {
                Some(child) => {
                    self.pending.push_back(child);
                    self.drain_pending();
                }
                None => debug!(%parent, "growth iteration skipped"),
            }
        }

        if self.has_budget() {
            return Err(ValidationError::TooFewRooms {
                placed: self.room_count(),
                requested: self.target_rooms,
            });
        }
        Ok(())
    }

    /// Rooms with at least one free door that opens onto an empty cell.
    fn frontier(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|node| {
                node.free_doors()
                    .directions()
                    .into_iter()
                    .any(|direction| !self.occupied.contains_key(&node.grid().step(direction, 1)))
            })
            .map(|node| node.id())
            .collect()
    }

    fn grow_from(&mut self, parent: NodeId) -> Option<NodeId> {
        let mut directions = self.graph.node(parent)?.free_doors().directions();
        self.rng.shuffle(&mut directions);

        directions
            .into_iter()
            .find_map(|direction| self.spawn_room(parent, direction))
    }

    /// Places a new room next to `parent` through `direction` and connects
    /// parent to child.
    fn spawn_room(&mut self, parent: NodeId, direction: CardinalDirection) -> Option<NodeId> {
        let (cell, depth) = {
            let node = self.graph.node(parent)?;
            (node.grid().step(direction, 1), node.depth() + 1)
        };
        if self.occupied.contains_key(&cell) {
            return None;
        }

        let category = choose_category(depth, self.total_depth, self.config, &mut self.rng);
        let archetype = self.pick_archetype(category, depth, direction.opposite())?;

        let child = self
            .graph
            .add_node(RoomSpec::new(Arc::clone(&archetype), cell, depth))
            .ok()?;
        self.graph.add_edge(parent, child, direction).ok()?;
        self.occupied.insert(cell, child);

        debug!(
            %parent,
            %child,
            %direction,
            %cell,
            depth,
            archetype = %archetype.name,
            "room placed"
        );
        Some(child)
    }

    /// Archetype of `category` valid at `depth` with a door on `entry`,
    /// falling back to combat.
    fn pick_archetype(
        &mut self,
        category: RoomCategory,
        depth: u32,
        entry: CardinalDirection,
    ) -> Option<Arc<RoomArchetype>> {
        let picked = self
            .catalogue
            .pick(category, Some(depth), Some(entry), &mut self.rng);
        if picked.is_some() || category == RoomCategory::Combat {
            return picked;
        }
        self.catalogue
            .pick(RoomCategory::Combat, Some(depth), Some(entry), &mut self.rng)
    }

    fn drain_pending(&mut self) {
        while let Some(room) = self.pending.pop_front() {
            self.add_extra_exits(room);
        }
    }

    /// Gives `room` between `min_extra_exits` and `max_extra_exits` additional
    /// doors, forcing one when none could be made.
    fn add_extra_exits(&mut self, room: NodeId) {
        let Some(node) = self.graph.node(room) else {
            return;
        };
        let mut directions = node.free_doors().directions();
        self.rng.shuffle(&mut directions);

        let wanted = self.rng.next_int_range(
            self.config.min_extra_exits as i32,
            self.config.max_extra_exits as i32 + 1,
        ) as usize;

        let mut made = 0;
        for &direction in &directions {
            if made >= wanted {
                break;
            }
            if self.try_exit(room, direction, false) {
                made += 1;
            }
        }

        if made == 0 && wanted > 0 {
            let forced = directions
                .iter()
                .filter(|&&direction| {
                    self.graph
                        .node(room)
                        .is_some_and(|node| node.has_free_door(direction))
                })
                .copied()
                .collect::<Vec<_>>();
            let created = forced
                .into_iter()
                .any(|direction| self.try_exit(room, direction, true));
            if !created {
                debug!(%room, "room left without extra exits");
            }
        }
    }

    /// Tries to open one exit from `room` through `direction`, either into the
    /// existing neighbour on that side or into a freshly spawned room.
    fn try_exit(&mut self, room: NodeId, direction: CardinalDirection, forced: bool) -> bool {
        let Some(cell) = self.graph.node(room).map(|node| node.grid().step(direction, 1)) else {
            return false;
        };

        match self.occupied.get(&cell).copied() {
            Some(neighbour) => {
                let joinable = self.graph.node(neighbour).is_some_and(|node| {
                    !node.is_start() && !node.is_boss() && node.has_free_door(direction.opposite())
                });
                let roll = forced || self.rng.chance(self.config.connect_existing_chance);
                if !(joinable && roll) {
                    return false;
                }
                let linked = self.graph.add_edge(room, neighbour, direction).is_ok();
                if linked {
                    debug!(%room, %neighbour, %direction, "linked existing room");
                }
                linked
            }
            None if self.has_budget() => match self.spawn_room(room, direction) {
                Some(child) => {
                    self.pending.push_back(child);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Places the boss beyond the deepest room that can host its door.
    fn place_boss(&mut self) -> Result<(), ValidationError> {
        let mut hosts: Vec<(u32, NodeId)> = self
            .graph
            .nodes()
            .filter(|node| !node.free_doors().is_empty())
            .map(|node| (node.depth(), node.id()))
            .collect();
        hosts.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let reach = self.graph.node_count() as i32 + 1;
        for (depth, host) in hosts {
            let Some(node) = self.graph.node(host) else {
                continue;
            };
            let origin = node.grid();
            let mut directions = node.free_doors().directions();
            self.rng.shuffle(&mut directions);

            for direction in directions {
                let Some(archetype) = self.catalogue.pick(
                    RoomCategory::Boss,
                    None,
                    Some(direction.opposite()),
                    &mut self.rng,
                ) else {
                    continue;
                };
                let Some(cell) = (1..=reach)
                    .map(|steps| origin.step(direction, steps))
                    .find(|cell| !self.occupied.contains_key(cell))
                else {
                    continue;
                };

                let boss = self
                    .graph
                    .add_node(RoomSpec::boss(archetype, cell, depth + 1))
                    .map_err(|_| ValidationError::BossPlacement)?;
                self.graph
                    .add_edge(host, boss, direction)
                    .map_err(|_| ValidationError::BossPlacement)?;
                self.occupied.insert(cell, boss);

                debug!(%host, %boss, %direction, %cell, "boss placed");
                return Ok(());
            }
        }

        Err(ValidationError::BossPlacement)
    }

    /// Connects every room without doors to its nearest compatible room.
    fn repair(&mut self) {
        let isolated: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|node| node.connected().is_empty())
            .map(|node| node.id())
            .collect();

        for orphan in isolated {
            let Some(target) = self.graph.node(orphan) else {
                continue;
            };
            let target_grid = target.grid();
            let target_doors = target.free_doors();

            let mut candidates: Vec<(u32, NodeId, CardinalDirection)> = self
                .graph
                .nodes()
                .filter(|node| node.id() != orphan && !node.is_boss())
                .filter_map(|node| {
                    let direction = node.free_doors().directions().into_iter().find(|direction| {
                        target_doors.has(direction.opposite())
                    })?;
                    Some((node.grid().manhattan(target_grid), node.id(), direction))
                })
                .collect();
            candidates.sort_by_key(|(distance, id, _)| (*distance, *id));

            match candidates.first() {
                Some(&(_, source, direction)) => {
                    if self.graph.add_edge(source, orphan, direction).is_ok() {
                        debug!(%orphan, %source, %direction, "isolated room repaired");
                    }
                }
                None => debug!(%orphan, "isolated room has no compatible neighbour"),
            }
        }
    }

    /// Gives every room that cannot reach the boss a door into the nearest
    /// room that can. Rooms without any exit are served first.
    fn connect_dead_ends(&mut self) {
        let Some(boss) = self.graph.boss() else {
            return;
        };

        loop {
            let reaching = self.rooms_reaching(boss);
            let mut stranded: Vec<(bool, NodeId)> = self
                .graph
                .nodes()
                .filter(|node| !reaching.contains(&node.id()))
                .map(|node| (self.graph.outgoing(node.id()).next().is_some(), node.id()))
                .collect();
            if stranded.is_empty() {
                return;
            }
            stranded.sort();

            let linked = stranded
                .into_iter()
                .any(|(_, room)| self.link_towards(room, &reaching));
            if !linked {
                debug!("stranded rooms have no compatible door left");
                return;
            }
        }
    }

    /// Rooms with a directed path to `boss`, the boss included.
    fn rooms_reaching(&self, boss: NodeId) -> HashSet<NodeId> {
        let mut reaching = HashSet::from([boss]);
        let mut queue = VecDeque::from([boss]);
        while let Some(room) = queue.pop_front() {
            for edge in self.graph.incoming(room) {
                if reaching.insert(edge.from()) {
                    queue.push_back(edge.from());
                }
            }
        }
        reaching
    }

    /// Adds one door from `room` to the nearest room in `reaching` with a
    /// matching free slot.
    fn link_towards(&mut self, room: NodeId, reaching: &HashSet<NodeId>) -> bool {
        let Some(node) = self.graph.node(room) else {
            return false;
        };
        let origin = node.grid();
        let exits = node.free_doors().directions();

        let mut candidates: Vec<(u32, NodeId, CardinalDirection)> = self
            .graph
            .nodes()
            .filter(|target| target.id() != room && reaching.contains(&target.id()))
            .flat_map(|target| {
                exits
                    .iter()
                    .filter(move |direction| target.has_free_door(direction.opposite()))
                    .map(move |&direction| {
                        (target.grid().manhattan(origin), target.id(), direction)
                    })
            })
            .collect();
        candidates.sort();

        candidates.into_iter().any(|(_, target, direction)| {
            let linked = self.graph.add_edge(room, target, direction).is_ok();
            if linked {
                debug!(%room, %target, %direction, "dead end connected");
            }
            linked
        })
    }

    fn assign_rewards(&mut self) {
        let rooms: Vec<(NodeId, u32)> = self
            .graph
            .nodes()
            .filter(|node| !node.is_boss())
            .map(|node| (node.id(), node.depth()))
            .collect();

        for (room, depth) in rooms {
            let mut doors = self.graph.outgoing_mut(room);
            self.assigner
                .assign(&mut doors, depth, self.total_depth, &mut self.rng);
        }
    }
}
