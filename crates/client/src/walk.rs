//! Scripted walkthrough: clear every room on the shortest route to the boss.
use std::fmt;

use anyhow::{Context, Result, bail};
use level_core::{EdgeId, NodeId, Reward, RoomCategory};
use level_runtime::{Event, Level, LevelEvent, Topic};
use tracing::info;

/// One door taken during the walk.
#[derive(Clone, Debug)]
pub struct WalkStep {
    pub via: EdgeId,
    pub reward: Option<Reward>,
    pub node: NodeId,
    pub archetype: String,
    pub category: RoomCategory,
    pub depth: u32,
}

#[derive(Clone, Debug)]
pub struct WalkReport {
    pub seed: u64,
    pub attempts: u32,
    pub rooms: usize,
    pub doors: usize,
    pub steps: Vec<WalkStep>,
    pub won: bool,
}

/// Enters the start room, then clears and leaves each room along the
/// shortest path until the boss falls.
pub async fn walk_to_boss(level: &mut Level) -> Result<WalkReport> {
    let mut outcomes = level.subscribe(Topic::Level);
    level.start().await?;

    let graph = level.graph();
    let start = graph.start().context("level has no start room")?;
    let path = graph.shortest_path_to_boss(start);
    if path.len() < 2 {
        bail!("boss room is not reachable from the start room");
    }

    let mut report = WalkReport {
        seed: level.seed(),
        attempts: level.attempts(),
        rooms: graph.node_count(),
        doors: graph.edge_count(),
        steps: Vec::with_capacity(path.len() - 1),
        won: false,
    };

    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let step = describe_step(level, from, to)?;

        let runtime = level.runtime_mut();
        runtime.notify_encounter_cleared()?;
        runtime.request_transition(to, step.via).await?;
        info!(room = %to, depth = step.depth, "walked through door {}", step.via);
        report.steps.push(step);
    }

    level.runtime_mut().notify_encounter_cleared()?;
    while let Ok(event) = outcomes.try_recv() {
        if let Event::Level(LevelEvent::Won { .. }) = event {
            report.won = true;
        }
    }
    Ok(report)
}

fn describe_step(level: &Level, from: NodeId, to: NodeId) -> Result<WalkStep> {
    let graph = level.graph();
    let door = graph
        .outgoing(from)
        .find(|edge| edge.to() == to)
        .with_context(|| format!("no door leads from {from} to {to}"))?;
    let room = graph
        .node(to)
        .with_context(|| format!("room {to} is missing"))?;

    Ok(WalkStep {
        via: door.id(),
        reward: door.reward().cloned(),
        node: to,
        archetype: room.archetype().name.clone(),
        category: room.category(),
        depth: room.depth(),
    })
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} (attempt {}): {} rooms, {} doors",
            self.seed, self.attempts, self.rooms, self.doors
        )?;
        for step in &self.steps {
            let reward = match &step.reward {
                Some(Reward {
                    name,
                    amount: Some(amount),
                    ..
                }) => format!("{name} x{amount}"),
                Some(reward) => reward.name.clone(),
                None => "no reward".to_owned(),
            };
            writeln!(
                f,
                "  door {:>3} [{}] -> room {:>3} {} ({}, depth {})",
                step.via, reward, step.node, step.archetype, step.category, step.depth
            )?;
        }
        write!(f, "{}", if self.won { "boss defeated" } else { "boss still standing" })
    }
}

#[cfg(test)]
mod tests {
    use level_content::builtin_catalogue;
    use level_core::GenerationConfig;

    use super::*;
    use crate::producer::{LoggingParty, LoggingProducer};

    #[tokio::test]
    async fn walk_reaches_and_defeats_the_boss() {
        let producer = LoggingProducer::new();
        let mut level = Level::builder()
            .generation(GenerationConfig::default().with_room_range(4, 6))
            .catalogue(builtin_catalogue())
            .seed(42)
            .producer(producer.clone())
            .relocator(LoggingParty)
            .build()
            .unwrap();

        let report = walk_to_boss(&mut level).await.unwrap();

        assert!(report.won);
        assert_eq!(report.seed, 42);
        let last = report.steps.last().unwrap();
        assert_eq!(last.category, RoomCategory::Boss);
        assert_eq!(Some(last.node), level.graph().boss());
        assert!(report.to_string().ends_with("boss defeated"));

        level.teardown().await.unwrap();
        assert_eq!(producer.live_count(), 0);
        assert!(producer.created_count() >= report.steps.len() + 1);
    }
}
