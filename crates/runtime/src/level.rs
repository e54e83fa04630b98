//! High-level level orchestrator.
//!
//! [`Level`] generates a room graph, wires the content loader, relocator, and
//! event bus into a [`RoomRuntime`], and exposes a builder-based API for
//! clients to start, drive, and tear down a level.

use std::sync::Arc;

use level_core::{
    ArchetypeCatalogue, GenerationConfig, GraphGenerator, LevelGraph, SeedSource,
};
use tokio::sync::broadcast;
use tracing::info;

use crate::api::{ContentProducer, OccupantRelocator, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, LevelEvent, Topic};
use crate::loader::RoomContentLoader;
use crate::room::RoomRuntime;

/// A generated level ready to be played.
pub struct Level {
    runtime: RoomRuntime,
    seed: u64,
    attempts: u32,
}

impl Level {
    /// Create a new level builder
    pub fn builder() -> LevelBuilder {
        LevelBuilder::new()
    }

    /// Enters the start room.
    pub async fn start(&mut self) -> Result<()> {
        let start = self
            .runtime
            .graph()
            .start()
            .ok_or(RuntimeError::MissingStart)?;
        self.runtime.enter_room(start).await
    }

    pub fn runtime(&self) -> &RoomRuntime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut RoomRuntime {
        &mut self.runtime
    }

    pub fn graph(&self) -> &LevelGraph {
        self.runtime.graph()
    }

    pub fn events(&self) -> &EventBus {
        self.runtime.events()
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.runtime.events().subscribe(topic)
    }

    /// Seed the level graph was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generation attempt that produced the graph (1-based).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Aborts pending preloads and destroys all loaded content.
    pub async fn teardown(self) -> Result<()> {
        self.runtime.loader().shutdown().await?;
        info!(seed = self.seed, "level torn down");
        Ok(())
    }
}

/// Builder for [`Level`].
pub struct LevelBuilder {
    generation: GenerationConfig,
    config: RuntimeConfig,
    catalogue: Option<ArchetypeCatalogue>,
    seed: Option<u64>,
    producer: Option<Arc<dyn ContentProducer>>,
    relocator: Option<Arc<dyn OccupantRelocator>>,
    events: Option<EventBus>,
}

impl LevelBuilder {
    fn new() -> Self {
        Self {
            generation: GenerationConfig::default(),
            config: RuntimeConfig::default(),
            catalogue: None,
            seed: None,
            producer: None,
            relocator: None,
            events: None,
        }
    }

    /// Override generation parameters
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required archetype catalogue
    pub fn catalogue(mut self, catalogue: ArchetypeCatalogue) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    /// Fix the generation seed. A random seed is drawn when unset.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set required content producer
    pub fn producer(self, producer: impl ContentProducer + 'static) -> Self {
        self.shared_producer(Arc::new(producer))
    }

    /// Set required content producer, keeping a handle to it
    pub fn shared_producer(mut self, producer: Arc<dyn ContentProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Set required occupant relocator
    pub fn relocator(self, relocator: impl OccupantRelocator + 'static) -> Self {
        self.shared_relocator(Arc::new(relocator))
    }

    /// Set required occupant relocator, keeping a handle to it
    pub fn shared_relocator(mut self, relocator: Arc<dyn OccupantRelocator>) -> Self {
        self.relocator = Some(relocator);
        self
    }

    /// Publish to an existing event bus instead of creating one
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Generate the level graph and assemble the runtime.
    ///
    /// Publishes [`LevelEvent::Generated`] on success.
    pub fn build(self) -> Result<Level> {
        let catalogue = self
            .catalogue
            .ok_or(RuntimeError::MissingCollaborator("archetype catalogue"))?;
        let producer = self
            .producer
            .ok_or(RuntimeError::MissingCollaborator("content producer"))?;
        let relocator = self
            .relocator
            .ok_or(RuntimeError::MissingCollaborator("occupant relocator"))?;

        let seed = self.seed.map_or_else(SeedSource::random, SeedSource::new);
        let generated = GraphGenerator::new(self.generation, catalogue).generate(&seed)?;

        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        events.publish(LevelEvent::Generated {
            seed: generated.seed,
            attempts: generated.attempts,
            rooms: generated.graph.node_count(),
        });

        let loader = RoomContentLoader::new(producer, self.config.room_spacing);
        let runtime = RoomRuntime::new(generated.graph, loader, relocator, events, self.config);

        Ok(Level {
            runtime,
            seed: generated.seed,
            attempts: generated.attempts,
        })
    }
}
