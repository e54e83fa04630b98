//! Level walkthrough binary.
//!
//! Composition root that assembles:
//! 1. Content (archetype catalogue and generation parameters)
//! 2. Level (generator output wired into the runtime) via `Level::builder`
//! 3. A scripted walk from the start room to the boss
//!
//! # Examples
//!
//! ```bash
//! # Built-in catalogue, fixed seed
//! LEVEL_SEED=42 cargo run -p level-client
//!
//! # Content from the repository's data directory
//! LEVEL_DATA_DIR=data cargo run -p level-client
//! ```
mod config;
mod logging;
mod producer;
mod walk;

use anyhow::{Context, Result};
use level_content::{ContentFactory, builtin_catalogue};
use level_core::{ArchetypeCatalogue, GenerationConfig};
use level_runtime::Level;

use config::ClientConfig;
use producer::{LoggingParty, LoggingProducer};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    let (log_file, _log_guard) = logging::init(config.session_id.as_deref())?;
    tracing::info!("Starting level walk");

    // 3. Load content
    let (catalogue, generation) = load_content(&config)?;
    tracing::info!(archetypes = catalogue.len(), "content loaded");

    // 4. Build level
    let producer = LoggingProducer::new();
    let mut builder = Level::builder()
        .generation(generation)
        .catalogue(catalogue)
        .config(config.runtime.clone())
        .producer(producer.clone())
        .relocator(LoggingParty);
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    let mut level = builder.build().context("failed to generate level")?;

    // 5. Walk it
    let report = walk::walk_to_boss(&mut level).await?;
    println!("{report}");
    println!("log: {}", log_file.display());

    level.teardown().await?;
    tracing::info!(created = producer.created_count(), "level walk finished");
    Ok(())
}

fn load_content(config: &ClientConfig) -> Result<(ArchetypeCatalogue, GenerationConfig)> {
    let Some(data_dir) = &config.data_dir else {
        tracing::info!("no LEVEL_DATA_DIR set, using built-in catalogue");
        return Ok((builtin_catalogue(), GenerationConfig::default()));
    };

    let factory = ContentFactory::new(data_dir);
    let catalogue = factory
        .load_archetypes()
        .with_context(|| format!("failed to load archetypes from {}", data_dir.display()))?;
    let generation = factory.load_generation_config()?;
    Ok((catalogue, generation))
}
