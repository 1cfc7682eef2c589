use std::io::Write;

use game_content::{ConfigLoader, ScenarioLoader};
use game_core::{GridConfig, Position, WorldPoint};
use tempfile::NamedTempFile;

const WAREHOUSE: &str = r##"(
    name: "warehouse",
    cell_radius: 0.5,
    layout: r#"
        ........
        ..##....
        ........
        .....#..
    "#,
    player: Some((x: 7, y: 0)),
    stations: [(cell: (x: 3, y: 3))],
    agents: [
        (cell: (x: 0, y: 0)),
        (cell: (x: 6, y: 2), energy: Some(12.5)),
    ],
)"##;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_scenario_from_ron() {
    let file = write_temp(WAREHOUSE);
    let scenario = ScenarioLoader::load(file.path()).unwrap();

    assert_eq!(scenario.name, "warehouse");
    assert_eq!(scenario.player, Some(Position::new(7, 0)));
    assert_eq!(scenario.stations.len(), 1);
    assert_eq!(scenario.agents[0].energy, None);
    assert_eq!(scenario.agents[1].energy, Some(12.5));

    let grid = scenario.build_grid().unwrap();
    assert_eq!((grid.width(), grid.height()), (8, 4));
    assert!(grid.is_blocking(Position::new(2, 1)));
    assert!(grid.is_blocking(Position::new(5, 3)));
}

#[test]
fn rejects_agents_spawned_in_walls() {
    let content = WAREHOUSE.replace("(cell: (x: 0, y: 0))", "(cell: (x: 2, y: 1))");
    let err = ScenarioLoader::parse(&content).unwrap_err();
    assert!(err.to_string().contains("inside a wall"), "{err}");
}

#[test]
fn rejects_placements_outside_the_layout() {
    let content = WAREHOUSE.replace("(x: 7, y: 0)", "(x: 8, y: 0)");
    let err = ScenarioLoader::parse(&content).unwrap_err();
    assert!(err.to_string().contains("outside"), "{err}");
}

#[test]
fn rejects_ragged_layouts() {
    let content = WAREHOUSE.replace("..##....", "..##...");
    let err = ScenarioLoader::parse(&content).unwrap_err();
    assert!(err.to_string().contains("Invalid map"), "{err}");
}

#[test]
fn generated_obstacles_load_and_replay() {
    let content = WAREHOUSE.replace(
        "player: Some",
        "generate: Some((count: 4, min_spacing: 2.0, seed: 11)),\n    player: Some",
    );
    let scenario = ScenarioLoader::parse(&content).unwrap();
    assert_eq!(scenario.generate.map(|scatter| scatter.count), Some(4));

    let plain = ScenarioLoader::parse(WAREHOUSE).unwrap().build_grid().unwrap();
    let grid = scenario.build_grid().unwrap();
    assert!(grid.walkable_count() < plain.walkable_count());
    assert!(plain.walkable_count() - grid.walkable_count() <= 4);
    assert!(scenario.placements().all(|cell| grid.is_walkable(cell)));
    assert_eq!(grid.to_layout(), scenario.build_grid().unwrap().to_layout());
}

#[test]
fn rejects_negative_obstacle_spacing() {
    let content = WAREHOUSE.replace(
        "player: Some",
        "generate: Some((count: 4, min_spacing: -1.0, seed: 11)),\n    player: Some",
    );
    let err = ScenarioLoader::parse(&content).unwrap_err();
    assert!(err.to_string().contains("spacing"), "{err}");
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ron");
    let err = ScenarioLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("absent.ron"), "{err}");
}

#[test]
fn loads_partial_config_over_defaults() {
    let file = write_temp(
        r#"
        cell_radius = 0.25
        prevent_corner_cutting = false

        [center]
        x = 4.0
        y = -2.0
        "#,
    );
    let config: GridConfig = ConfigLoader::load(file.path()).unwrap();

    assert_eq!(config.cell_radius, 0.25);
    assert!(!config.prevent_corner_cutting);
    assert_eq!(config.center, WorldPoint::new(4.0, -2.0));
    assert_eq!(config.world_width, GridConfig::DEFAULT_WORLD_SIZE);
}

#[test]
fn malformed_config_is_an_error() {
    let result: Result<GridConfig, _> = ConfigLoader::parse("cell_radius = \"wide\"");
    assert!(result.is_err());
}
