use std::fs;

use worldbuilder::scenario::ScenarioLoader;
use worldbuilder::TerrainType;
use tempfile::tempdir;

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn bundled_scenarios_load_and_render() {
    let loader = scenario_loader();
    for file in ["scenarios/river_valley.yaml", "scenarios/archipelago.yaml"] {
        let scenario = loader.load(file).expect("scenario parses");
        let instance = scenario
            .build_map()
            .render(&scenario.render, scenario.seed)
            .expect("render succeeds");
        assert_eq!(instance.num_horizontal(), scenario.render.num_horizontal);
        assert_eq!(instance.num_vertical(), scenario.render.num_vertical);
    }
}

#[test]
fn archipelago_keeps_open_water() {
    let scenario = scenario_loader()
        .load("scenarios/archipelago.yaml")
        .unwrap();
    assert_eq!(scenario.worker.min_frame_ms, 100);
    assert_eq!(scenario.worker.stats_history, 100);
    let instance = scenario
        .build_map()
        .render(&scenario.render, scenario.seed)
        .unwrap();
    let counts = instance.terrain_counts();
    assert!(counts.get(&TerrainType::Water).copied().unwrap_or(0) > 0);
    assert!(counts.get(&TerrainType::Swamp).is_none());
}

#[test]
fn loader_reports_missing_and_malformed_files() {
    let temp = tempdir().expect("tempdir");
    let loader = ScenarioLoader::new(temp.path());

    let missing = loader.load("nope.yaml").unwrap_err();
    assert!(missing.to_string().contains("Failed to read scenario file"));

    fs::write(temp.path().join("broken.yaml"), "name: broken\nmap:\n  background: Lava\n").unwrap();
    let broken = loader.load("broken.yaml").unwrap_err();
    assert!(broken.to_string().contains("Failed to parse"));
}

#[test]
fn oversized_grid_is_rejected_at_load() {
    let temp = tempdir().expect("tempdir");
    let loader = ScenarioLoader::new(temp.path());
    fs::write(
        temp.path().join("huge.yaml"),
        "name: huge\nrender:\n  num_horizontal: 4000000000\n  num_vertical: 4000000000\n\
         map:\n  background: Plain\n",
    )
    .unwrap();

    let err = loader.load("huge.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("invalid render geometry"));
}
