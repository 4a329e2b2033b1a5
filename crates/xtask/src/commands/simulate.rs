//! Run a scripted scenario through the runtime
//!
//! Spawns the scenario's templates, executes its steps in order and prints
//! every event the runtime publishes along the way.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use status_content::{Scenario, Step};
use status_core::EntityId;
use status_runtime::{EntitySnapshot, Runtime, RuntimeConfig, RuntimeHandle, StatusEvent, Topic};
use tokio::sync::broadcast;

use crate::utils;

/// Run a scripted scenario
#[derive(Parser)]
pub struct Simulate {
    /// Scenario name (file stem under <DATA_DIR>/scenarios) or path to a .ron file
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Custom content directory (defaults to the shipped content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the game seed
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable step log with final snapshots
    Summary,
    /// One JSON object per event, then one per final snapshot
    Json,
}

struct Subscriptions {
    effects: broadcast::Receiver<StatusEvent>,
    stats: broadcast::Receiver<StatusEvent>,
}

impl Subscriptions {
    fn new(handle: &RuntimeHandle) -> Self {
        Self {
            effects: handle.subscribe(Topic::Effects),
            stats: handle.subscribe(Topic::Stats),
        }
    }

    fn drain(&mut self) -> Vec<StatusEvent> {
        let mut events = Vec::new();
        for rx in [&mut self.effects, &mut self.stats] {
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event receiver lagged");
                    }
                    Err(_) => break,
                }
            }
        }
        events
    }
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let factory = utils::factory(self.data_dir);
        let scenario = utils::resolve_scenario(&factory, &self.scenario)?;

        let mut engine = factory.load_config()?;
        if let Some(seed) = self.seed.or(scenario.seed) {
            engine.game_seed = seed;
        }
        let registry = factory.load_registry()?;
        let templates = factory.load_entities()?;

        let runtime = Runtime::builder()
            .config(RuntimeConfig {
                engine,
                event_buffer_size: 4096,
                ..RuntimeConfig::default()
            })
            .registry(Arc::new(registry))
            .build()
            .await?;
        let handle = runtime.handle();
        let mut events = Subscriptions::new(&handle);

        if self.format == OutputFormat::Summary {
            println!(
                "{} {} ({} steps, {} ticks)",
                style("Scenario:").bold().cyan(),
                scenario.name,
                scenario.steps.len(),
                scenario.span()
            );
            println!();
        }

        for spawn in &scenario.spawns {
            let template = templates.get(&spawn.template).with_context(|| {
                format!(
                    "Scenario '{}' spawns unknown template '{}'",
                    scenario.name, spawn.template
                )
            })?;
            handle
                .spawn_template(spawn.entity(), template.clone())
                .await
                .with_context(|| format!("Failed to spawn entity {}", spawn.id))?;
        }

        for (index, step) in scenario.steps.iter().enumerate() {
            let result = run_step(&handle, step)
                .await
                .with_context(|| format!("Step {} failed: {:?}", index, step))?;

            let now = handle.now().await?;
            let published = events.drain();
            match self.format {
                OutputFormat::Summary => print_step(index, step, &result, now.0, &published),
                OutputFormat::Json => print_json_lines(&published)?,
            }
        }

        let snapshots = final_snapshots(&handle, &scenario).await?;
        match self.format {
            OutputFormat::Summary => print_snapshots(&snapshots),
            OutputFormat::Json => print_json_lines(&snapshots)?,
        }

        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}

async fn run_step(handle: &RuntimeHandle, step: &Step) -> Result<String> {
    let result = match *step {
        Step::Apply { target, .. } => {
            let request = step.request().context("Apply step without a request")?;
            format!("{:?}", handle.apply(EntityId(target), request).await?)
        }
        Step::Exit { target, kind } => {
            let ended = handle.force_exit(EntityId(target), kind).await?;
            let result = if ended { "ended" } else { "not active" };
            result.to_string()
        }
        Step::Clear { target, reason } => {
            let ended = handle.clear(EntityId(target), reason).await?;
            format!("{} ended", ended)
        }
        Step::Damage { target, hp, sp } => match handle.damage(EntityId(target), hp, sp).await? {
            Some(applied) if applied.killed => format!("hp {} (killed)", applied.hp),
            Some(applied) => format!("hp {} sp {}", applied.hp, applied.sp),
            None => "no target".to_string(),
        },
        Step::Kill { target } => {
            let id = EntityId(target);
            match handle.snapshot(id).await? {
                Some(snapshot) => {
                    let hp = snapshot.pool.hp.current;
                    let applied = handle.damage(id, -i32::try_from(hp.max(1)).unwrap_or(i32::MAX), 0).await?;
                    let result = if applied.is_some_and(|applied| applied.killed) {
                        "killed"
                    } else {
                        "survived"
                    };
                    result.to_string()
                }
                None => "no target".to_string(),
            }
        }
        Step::SetLevel { target, level } => {
            handle.set_level(EntityId(target), level).await?;
            format!("level {}", level)
        }
        Step::Advance { ticks } => {
            let fired = handle.advance(ticks).await?;
            format!("{} timers fired", fired)
        }
    };
    Ok(result)
}

async fn final_snapshots(
    handle: &RuntimeHandle,
    scenario: &Scenario,
) -> Result<Vec<EntitySnapshot>> {
    let mut snapshots = Vec::with_capacity(scenario.spawns.len());
    for spawn in &scenario.spawns {
        if let Some(snapshot) = handle.snapshot(spawn.entity()).await? {
            snapshots.push(snapshot);
        }
    }
    Ok(snapshots)
}

fn print_step(index: usize, step: &Step, result: &str, now: u64, events: &[StatusEvent]) {
    println!(
        "{} {} {:?} → {}",
        style(format!("[{:>6}]", now)).dim(),
        style(format!("#{}", index)).bold().yellow(),
        step,
        style(result).green()
    );

    for event in events {
        match event {
            StatusEvent::EffectChanged { entity, change, at } => {
                let verb = if change.active {
                    style("+").green()
                } else {
                    style("-").red()
                };
                let detail = match (change.active, change.reason) {
                    (true, _) => match change.remaining {
                        Some(remaining) => format!("{} ticks left", remaining),
                        None => "infinite".to_string(),
                    },
                    (false, Some(reason)) => reason.to_string(),
                    (false, None) => String::new(),
                };
                println!(
                    "         @{:<6} {} {} {} {:?} {}",
                    at.0, entity, verb, change.kind, change.params, detail
                );
            }
            StatusEvent::StatChanged {
                entity,
                stat,
                value,
                at,
            } => {
                println!("         @{:<6} {} {} = {}", at.0, entity, stat, value);
            }
            StatusEvent::Tick { .. } => {}
        }
    }
}

fn print_snapshots(snapshots: &[EntitySnapshot]) {
    println!();
    println!("{}", style("=== Final State ===").bold().green());

    for snapshot in snapshots {
        println!();
        println!(
            "{} {} ({:?}) HP {}/{} SP {}/{}",
            style("Entity").bold().yellow(),
            snapshot.id,
            snapshot.kind,
            snapshot.pool.hp.current,
            snapshot.pool.hp.maximum,
            snapshot.pool.mp.current,
            snapshot.pool.mp.maximum
        );

        if snapshot.effects.is_empty() {
            println!("  Effects: none");
        } else {
            println!("  Effects:");
            for effect in &snapshot.effects {
                let remaining = effect
                    .remaining
                    .map_or("infinite".to_string(), |r| format!("{} ticks", r));
                println!("    {} {:?} {}", effect.kind, effect.params, remaining);
            }
        }

        let blocked: Vec<String> = snapshot
            .blocked
            .capabilities()
            .map(|cap| cap.to_string())
            .collect();
        if !blocked.is_empty() {
            println!("  Blocked: {}", blocked.join(", "));
        }
    }
}

fn print_json_lines<T: serde::Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        println!(
            "{}",
            serde_json::to_string(item).context("Failed to serialize to JSON")?
        );
    }
    Ok(())
}
