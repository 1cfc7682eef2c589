//! Scenario loader.
//!
//! Parses a RON scenario and checks it against its own layout, so a loaded
//! scenario always builds a grid and every placement lands on it.

use std::path::Path;

use crate::Scenario;
use crate::loaders::{LoadResult, read_file};

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} (in {})", e, path.display()))
    }

    /// Parse and validate a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        Self::validate(&scenario)?;
        Ok(scenario)
    }

    fn validate(scenario: &Scenario) -> LoadResult<()> {
        let grid = scenario
            .build_grid()
            .map_err(|e| anyhow::anyhow!("Invalid map in scenario '{}': {}", scenario.name, e))?;

        for cell in scenario.placements() {
            if !grid.contains(cell) {
                anyhow::bail!(
                    "Scenario '{}' places an entity at {} outside the {}x{} layout",
                    scenario.name,
                    cell,
                    grid.width(),
                    grid.height()
                );
            }
        }
        for agent in &scenario.agents {
            if grid.is_blocking(agent.cell) {
                anyhow::bail!(
                    "Scenario '{}' spawns an agent inside a wall at {}",
                    scenario.name,
                    agent.cell
                );
            }
        }
        Ok(())
    }
}
