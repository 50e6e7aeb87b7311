//! Headless trace replayer.
//!
//! Feeds a recorded event trace through a full dispatcher stack and logs the
//! resulting notifications. This is the development harness for the state
//! machine: everything a kernel transport would do is reproduced from the
//! trace file, so a hardware quirk report can be replayed and inspected on
//! any machine.
//!
//! ```text
//! tablet-dispatch <trace.toml> [config.toml]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tablet_core::ToolRegistry;

use tablet_dispatch::application::dispatch::TabletDispatcher;
use tablet_dispatch::infrastructure::database::{
    toml_db::TomlStylusDatabase, HeuristicStylusDatabase, StylusDatabase,
};
use tablet_dispatch::infrastructure::replay;
use tablet_dispatch::infrastructure::sink::TracingSink;
use tablet_dispatch::infrastructure::storage::config::DispatchConfig;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let trace_path: PathBuf = args
        .next()
        .context("usage: tablet-dispatch <trace.toml> [config.toml]")?
        .into();
    let config_path: Option<PathBuf> = args.next().map(Into::into);

    let config = load_config(config_path.as_deref())?;

    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let database: Arc<dyn StylusDatabase> = match &config.database_path {
        Some(path) => {
            let db = TomlStylusDatabase::load(path)
                .with_context(|| format!("loading stylus database {}", path.display()))?;
            info!(styli = db.stylus_count(), "stylus database loaded");
            Arc::new(db)
        }
        None => {
            info!("no stylus database configured, using type heuristics");
            Arc::new(HeuristicStylusDatabase)
        }
    };

    let trace = replay::load_trace(&trace_path)
        .with_context(|| format!("loading trace {}", trace_path.display()))?;
    info!(
        "trace loaded: {} events from device {:04x}:{:04x}",
        trace.events.len(),
        trace.device.vendor,
        trace.device.product
    );

    let tablet = Arc::new(replay::build_tablet(&trace.device));
    let mut dispatcher = TabletDispatcher::new(
        Arc::clone(&tablet) as _,
        database,
        Arc::new(TracingSink),
        Arc::new(ToolRegistry::new()),
    )
    .context("initializing dispatcher")?;

    if config.left_handed {
        dispatcher.set_left_handed(true);
    }

    for event_spec in &trace.events {
        let event = event_spec.to_raw();
        // Keep the transport's current values in step, as a kernel event
        // library would, before the dispatcher sees the event.
        tablet.apply(&event);
        dispatcher.process(&event);
    }

    info!("replay finished");
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DispatchConfig> {
    match path {
        Some(path) => DispatchConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(DispatchConfig::default()),
    }
}
