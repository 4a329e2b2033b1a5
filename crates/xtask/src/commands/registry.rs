//! Print the effective effect table
//!
//! Shows the built-in table merged with the content directory's overrides.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use status_core::{EffectKind, EffectMetadata};

use crate::utils;

/// Print the effective effect table
#[derive(Parser)]
pub struct Registry {
    /// Only show these effects (e.g. poison, stun)
    #[arg(value_name = "KIND")]
    kinds: Vec<String>,

    /// Custom content directory (defaults to the shipped content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Full JSON output
    #[arg(long)]
    json: bool,
}

impl Registry {
    pub fn execute(self) -> Result<()> {
        let factory = utils::factory(self.data_dir);
        let registry = factory.load_registry()?;

        let kinds = self
            .kinds
            .iter()
            .map(|name| {
                name.parse::<EffectKind>()
                    .with_context(|| format!("Unknown effect '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;

        let selected: Vec<&EffectMetadata> = registry
            .iter()
            .filter(|meta| kinds.is_empty() || kinds.contains(&meta.kind))
            .collect();

        if self.json {
            let json =
                serde_json::to_string_pretty(&selected).context("Failed to serialize to JSON")?;
            println!("{}", json);
            return Ok(());
        }

        println!(
            "{} {} ({} effects)",
            style("Effect table:").bold().cyan(),
            factory.data_dir().display(),
            registry.len()
        );
        for meta in selected {
            print_effect(meta);
        }
        Ok(())
    }
}

fn print_effect(meta: &EffectMetadata) {
    println!();
    println!(
        "{} {}",
        style(meta.kind).bold().yellow(),
        style(format!("icon {}", meta.icon)).dim()
    );
    if !meta.flags.is_empty() {
        println!("  Flags: {:?}", meta.flags);
    }
    println!("  Stacking: {:?}", meta.stacking);

    let clamp = match (meta.min_duration, meta.max_duration) {
        (None, None) => None,
        (min, max) => Some(format!(
            "{}..{}",
            min.map_or(String::new(), |v| v.to_string()),
            max.map_or(String::new(), |v| v.to_string())
        )),
    };
    if let Some(clamp) = clamp {
        println!("  Duration: {}", clamp);
    }
    if let Some(periodic) = meta.periodic {
        println!(
            "  Every {} ticks: {:?}",
            periodic.interval, periodic.action
        );
    }
    for contribution in &meta.contributions {
        println!("  Contributes: {:?}", contribution);
    }
    if !meta.locks.is_empty() {
        let locks: Vec<String> = meta.locks.capabilities().map(|cap| cap.to_string()).collect();
        println!("  Locks: {}", locks.join(", "));
    }
    if !meta.conflicts.is_empty() {
        println!("  Conflicts: {:?}", meta.conflicts);
    }
    if !meta.blocked_by.is_empty() {
        println!("  Blocked by: {:?}", meta.blocked_by);
    }
    if !meta.on_end.is_empty() {
        println!("  On end: {:?}", meta.on_end);
    }
}
