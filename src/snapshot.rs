//! Serializable views of a rendered grid for text and JSON consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instance::MapInstance;
use crate::map::{FeatureType, TerrainType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMarker {
    pub x: u32,
    pub y: u32,
    pub feature: FeatureType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub scenario: String,
    pub seed: u64,
    pub num_horizontal: u32,
    pub num_vertical: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// One glyph per tile, one string per row.
    pub rows: Vec<String>,
    pub features: Vec<FeatureMarker>,
    pub terrain_counts: BTreeMap<TerrainType, usize>,
}

impl MapSnapshot {
    pub fn capture(scenario: &str, seed: u64, instance: &MapInstance) -> Self {
        let features = instance
            .features()
            .into_iter()
            .map(|(x, y, feature)| FeatureMarker { x, y, feature })
            .collect();
        Self {
            scenario: scenario.to_string(),
            seed,
            num_horizontal: instance.num_horizontal(),
            num_vertical: instance.num_vertical(),
            tile_width: instance.tile_width(),
            tile_height: instance.tile_height(),
            rows: glyph_rows(instance),
            features,
            terrain_counts: instance.terrain_counts(),
        }
    }

    pub fn to_ascii(&self) -> String {
        let mut text = self.rows.join("\n");
        text.push('\n');
        text
    }
}

fn glyph_rows(instance: &MapInstance) -> Vec<String> {
    instance
        .rows()
        .map(|row| row.iter().map(|tile| tile.glyph()).collect())
        .collect()
}

/// Legend for the glyphs used in [`MapSnapshot::rows`].
pub fn legend() -> String {
    let mut lines: Vec<String> = TerrainType::ALL
        .iter()
        .map(|terrain| format!("{} {terrain}", terrain.glyph()))
        .collect();
    for feature in [FeatureType::Town, FeatureType::Cave] {
        if let Some(glyph) = feature.glyph() {
            lines.push(format!("{glyph} {feature:?}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderSettings;
    use crate::location::Location;
    use crate::map::Map;

    #[test]
    fn test_capture_matches_grid() {
        let map = Map::new(TerrainType::Swamp)
            .with_terrain(Location::Central, TerrainType::Mountain)
            .with_feature(Location::NorthWest, FeatureType::Town);
        let settings = RenderSettings::new(16, 16, 12, 6);
        let instance = map.render(&settings, 4).unwrap();
        let snapshot = MapSnapshot::capture("test", 4, &instance);

        assert_eq!(snapshot.rows.len(), 6);
        assert!(snapshot.rows.iter().all(|row| row.chars().count() == 12));
        assert_eq!(snapshot.features.len(), 1);
        assert_eq!(snapshot.terrain_counts.values().sum::<usize>(), 72);

        let marker = &snapshot.features[0];
        let row: Vec<char> = snapshot.rows[marker.y as usize].chars().collect();
        assert_eq!(row[marker.x as usize], 'T');
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let map = Map::new(TerrainType::Water);
        let instance = map.render(&RenderSettings::new(1, 1, 3, 2), 0).unwrap();
        let snapshot = MapSnapshot::capture("lake", 0, &instance);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Water\":6"));
        let back: MapSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(snapshot.to_ascii(), "~~~\n~~~\n");
    }
}
