//! Validate a content directory
//!
//! Loads every file the runtime would load and cross-checks scenarios
//! against the entity catalog.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use status_content::{Scenario, TemplateSet};

use crate::utils;

/// Validate a content directory
#[derive(Parser)]
pub struct Check {
    /// Custom content directory (defaults to the shipped content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let factory = utils::factory(self.data_dir);
        println!(
            "{} {}",
            style("Checking").bold().cyan(),
            factory.data_dir().display()
        );

        let config = factory.load_config()?;
        println!(
            "  {} config.toml (seed {}, depth {})",
            style("✓").green(),
            config.game_seed,
            config.max_reentry_depth
        );

        let registry = factory.load_registry()?;
        println!(
            "  {} effects ({} kinds)",
            style("✓").green(),
            registry.len()
        );

        let templates = factory.load_entities()?;
        println!(
            "  {} entities.ron ({} templates)",
            style("✓").green(),
            templates.len()
        );

        let mut failures = 0;
        for name in factory.scenario_names()? {
            let problems = match factory.load_scenario(&name) {
                Ok(scenario) => scenario_problems(&scenario, &templates),
                Err(err) => vec![format!("{:#}", err)],
            };

            if problems.is_empty() {
                println!("  {} scenarios/{}.ron", style("✓").green(), name);
            } else {
                failures += 1;
                println!("  {} scenarios/{}.ron", style("✗").red(), name);
                for problem in problems {
                    println!("      {}", problem);
                }
            }
        }

        if failures > 0 {
            anyhow::bail!("{} scenario(s) failed validation", failures);
        }
        Ok(())
    }
}

fn scenario_problems(scenario: &Scenario, templates: &TemplateSet) -> Vec<String> {
    let mut problems: Vec<String> = scenario
        .spawns
        .iter()
        .filter(|spawn| templates.get(&spawn.template).is_none())
        .map(|spawn| format!("entity {} uses unknown template '{}'", spawn.id, spawn.template))
        .collect();

    let spawned: BTreeSet<_> = scenario.spawns.iter().map(|spawn| spawn.entity()).collect();
    for (index, step) in scenario.steps.iter().enumerate() {
        if let Some(target) = step.target()
            && !spawned.contains(&target)
        {
            problems.push(format!("step {} targets unspawned entity {}", index, target));
        }
    }
    problems
}
