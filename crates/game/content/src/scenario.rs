//! Scenario description: the map plus everything placed on it at start.
//!
//! All placements are in cell coordinates of the layout, with the first
//! layout line as `y = 0`.

use game_core::{Grid, GridError, ObstacleScatter, Position};

/// Energy station placed on a layout cell.
///
/// Stations block the cell they stand on until destroyed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSpec {
    pub cell: Position,
}

/// Agent spawn point with an optional starting energy.
///
/// `energy: None` starts the agent at its configured maximum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSpec {
    pub cell: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scenario {
    pub name: String,
    pub cell_radius: f32,
    /// `.`/`#` rows; see [`game_core::parse_layout`].
    pub layout: String,
    /// Extra obstacles scattered over the layout's free cells, keeping every
    /// placement clear.
    pub generate: Option<ObstacleScatter>,
    pub player: Option<Position>,
    pub stations: Vec<StationSpec>,
    pub agents: Vec<AgentSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: String::new(),
            cell_radius: game_core::GridConfig::DEFAULT_CELL_RADIUS,
            layout: String::new(),
            generate: None,
            player: None,
            stations: Vec::new(),
            agents: Vec::new(),
        }
    }
}

impl Scenario {
    /// Builds the static wall grid: the layout plus any generated obstacles.
    ///
    /// Stations are not applied here; the runtime layers them on top.
    pub fn build_grid(&self) -> Result<Grid, GridError> {
        let mut grid = Grid::from_layout(&self.layout, self.cell_radius)?;
        if let Some(scatter) = &self.generate {
            let reserved: Vec<Position> = self.placements().collect();
            grid.scatter_obstacles(scatter, &reserved)?;
        }
        Ok(grid)
    }

    /// Every placed cell in declaration order: player, stations, agents.
    pub fn placements(&self) -> impl Iterator<Item = Position> + '_ {
        self.player
            .iter()
            .copied()
            .chain(self.stations.iter().map(|station| station.cell))
            .chain(self.agents.iter().map(|agent| agent.cell))
    }
}
