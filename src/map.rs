//! Map declarations and the render pipeline that turns them into tile grids.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{RenderSettings, MAX_TILES};
use crate::instance::MapInstance;
use crate::location::Location;
use crate::rendered::RenderedMap;
use crate::rng::MapRng;
use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Mountain,
    Plain,
    Water,
    Swamp,
    Forest,
}

impl TerrainType {
    pub const ALL: [TerrainType; 5] = [
        TerrainType::Mountain,
        TerrainType::Plain,
        TerrainType::Water,
        TerrainType::Swamp,
        TerrainType::Forest,
    ];

    pub fn glyph(self) -> char {
        match self {
            TerrainType::Mountain => '^',
            TerrainType::Plain => '.',
            TerrainType::Water => '~',
            TerrainType::Swamp => '%',
            TerrainType::Forest => '*',
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FeatureType {
    #[default]
    None,
    Cave,
    Town,
}

impl FeatureType {
    pub fn glyph(self) -> Option<char> {
        match self {
            FeatureType::None => None,
            FeatureType::Cave => Some('C'),
            FeatureType::Town => Some('T'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTerrain {
    pub location: Location,
    pub terrain: TerrainType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFeature {
    pub location: Location,
    pub feature: FeatureType,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error(
        "invalid render geometry: {num_horizontal}x{num_vertical} tiles of \
         {tile_width}x{tile_height} pixels (every dimension must be non-zero \
         and the grid at most {max} tiles)",
        max = MAX_TILES
    )]
    InvalidGeometry {
        tile_width: u32,
        tile_height: u32,
        num_horizontal: u32,
        num_vertical: u32,
    },
}

/// Authored description of a map: a background terrain plus terrain and
/// feature declarations, each pinned to a [`Location`]. Declarations are
/// append-only and kept in order; order matters to the render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    background: TerrainType,
    #[serde(default)]
    terrains: Vec<MapTerrain>,
    #[serde(default)]
    features: Vec<MapFeature>,
}

impl Map {
    pub fn new(background: TerrainType) -> Self {
        Self {
            background,
            terrains: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn background(&self) -> TerrainType {
        self.background
    }

    pub fn terrains(&self) -> &[MapTerrain] {
        &self.terrains
    }

    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }

    pub fn add_terrain(&mut self, location: Location, terrain: TerrainType) {
        self.terrains.push(MapTerrain { location, terrain });
    }

    pub fn add_map_feature(&mut self, location: Location, feature: FeatureType) {
        self.features.push(MapFeature { location, feature });
    }

    pub fn with_terrain(mut self, location: Location, terrain: TerrainType) -> Self {
        self.add_terrain(location, terrain);
        self
    }

    pub fn with_feature(mut self, location: Location, feature: FeatureType) -> Self {
        self.add_map_feature(location, feature);
        self
    }

    /// Render the declaration into a tile grid. Pure in `(self, settings, seed)`.
    pub fn render(
        &self,
        settings: &RenderSettings,
        seed: u64,
    ) -> Result<MapInstance, RenderError> {
        let mut rng = MapRng::new(seed);
        self.render_with(settings, &mut rng)
    }

    pub fn render_with(
        &self,
        settings: &RenderSettings,
        rng: &mut MapRng,
    ) -> Result<MapInstance, RenderError> {
        let rendered = self.render_form_with(settings, rng)?;
        let instance = MapInstance::rasterize(settings, &rendered);
        debug!(
            width = instance.num_horizontal(),
            height = instance.num_vertical(),
            shapes = rendered.terrains().len(),
            features = rendered.features().len(),
            "rendered map"
        );
        Ok(instance)
    }

    /// The intermediate placed shapes and feature points for `seed`.
    pub fn render_form(
        &self,
        settings: &RenderSettings,
        seed: u64,
    ) -> Result<RenderedMap, RenderError> {
        let mut rng = MapRng::new(seed);
        self.render_form_with(settings, &mut rng)
    }

    pub fn render_form_with(
        &self,
        settings: &RenderSettings,
        rng: &mut MapRng,
    ) -> Result<RenderedMap, RenderError> {
        settings.validate()?;
        let mut rendered = RenderedMap::new(self.background, settings.aspect_ratio());
        self.render_terrain(&mut rendered, rng);
        self.render_features(&mut rendered, rng);
        Ok(rendered)
    }

    fn render_terrain(&self, rendered: &mut RenderedMap, rng: &mut MapRng) {
        let region = rendered.region();
        for terrain in &self.terrains {
            let shape = Shape::generate(&region.get_location(terrain.location), rng);
            rendered.push_terrain(shape, terrain.terrain);
        }
    }

    /// Features sharing a location each get a distinct cell of a
    /// `ceil(sqrt(n))` square grid over that location, in shuffled order.
    /// Points are drawn group by group in location-table order but recorded
    /// in declaration order, which is the order tiles resolve ties in.
    fn render_features(&self, rendered: &mut RenderedMap, rng: &mut MapRng) {
        let mut by_location: BTreeMap<usize, (Location, Vec<usize>)> = BTreeMap::new();
        for (index, feature) in self.features.iter().enumerate() {
            by_location
                .entry(feature.location.index())
                .or_insert_with(|| (feature.location, Vec::new()))
                .1
                .push(index);
        }

        let region = rendered.region();
        let mut points = vec![None; self.features.len()];
        for (location, members) in by_location.into_values() {
            let location_region = region.get_location(location);
            let division = (members.len() as f64).sqrt().ceil() as usize;
            let mut cells = location_region.subdivide(division, division);
            cells.shuffle(rng);

            for (index, cell) in members.into_iter().zip(&cells) {
                points[index] = Some(cell.choose_point(rng));
            }
        }

        for (feature, point) in self.features.iter().zip(points) {
            if let Some(point) = point {
                rendered.push_feature(point, feature.feature);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn settings() -> RenderSettings {
        RenderSettings::default()
    }

    #[test]
    fn test_declarations_are_append_only_and_ordered() {
        let mut map = Map::new(TerrainType::Swamp);
        map.add_terrain(Location::East, TerrainType::Forest);
        map.add_terrain(Location::East, TerrainType::Water);
        map.add_map_feature(Location::North, FeatureType::Town);

        assert_eq!(map.terrains().len(), 2);
        assert_eq!(map.terrains()[1].terrain, TerrainType::Water);
        assert_eq!(map.features()[0].location, Location::North);
    }

    #[test]
    fn test_render_form_places_one_shape_per_terrain() {
        let map = Map::new(TerrainType::Plain)
            .with_terrain(Location::West, TerrainType::Water)
            .with_terrain(Location::East, TerrainType::Mountain);
        let rendered = map.render_form(&settings(), 3).unwrap();

        assert_eq!(rendered.terrains().len(), 2);
        let east = rendered.region().get_location(Location::East);
        for circle in rendered.terrains()[1].shape.circles() {
            assert!(east.contains(circle.center));
        }
    }

    #[test]
    fn test_features_in_one_location_never_share_a_cell() {
        let mut map = Map::new(TerrainType::Plain);
        for _ in 0..7 {
            map.add_map_feature(Location::Central, FeatureType::Town);
        }
        let rendered = map.render_form(&settings(), 21).unwrap();
        let central = rendered.region().get_location(Location::Central);
        let cells = central.subdivide(3, 3);

        let mut used = Vec::new();
        for feature in rendered.features() {
            assert!(central.contains(feature.point));
            let cell = cells
                .iter()
                .position(|cell| cell.contains(feature.point))
                .expect("feature inside a cell");
            assert!(!used.contains(&cell), "two features share cell {cell}");
            used.push(cell);
        }
        assert_eq!(used.len(), 7);
    }

    #[test]
    fn test_features_are_recorded_in_declaration_order() {
        let map = Map::new(TerrainType::Plain)
            .with_feature(Location::SouthEast, FeatureType::Cave)
            .with_feature(Location::NorthWest, FeatureType::Town)
            .with_feature(Location::SouthEast, FeatureType::Town);
        let rendered = map.render_form(&settings(), 0).unwrap();
        let types: Vec<FeatureType> = rendered.features().iter().map(|f| f.feature).collect();
        assert_eq!(
            types,
            vec![FeatureType::Cave, FeatureType::Town, FeatureType::Town]
        );

        let region = rendered.region();
        let expected = [Location::SouthEast, Location::NorthWest, Location::SouthEast];
        for (feature, location) in rendered.features().iter().zip(expected) {
            assert!(region.get_location(location).contains(feature.point));
        }
    }

    #[test]
    fn test_feature_draws_follow_location_table_order() {
        // The NorthWest group is drawn first, so its point depends only on the
        // stream start, whatever the declaration order.
        let settings = settings();
        let nw_last = Map::new(TerrainType::Plain)
            .with_feature(Location::SouthEast, FeatureType::Cave)
            .with_feature(Location::NorthWest, FeatureType::Town);
        let nw_only = Map::new(TerrainType::Plain).with_feature(Location::NorthWest, FeatureType::Town);

        let a = nw_last.render_form(&settings, 12).unwrap();
        let b = nw_only.render_form(&settings, 12).unwrap();
        assert_eq!(a.features()[1].point, b.features()[0].point);
    }

    #[test]
    fn test_declaration_order_changes_later_shapes() {
        let a = Map::new(TerrainType::Plain)
            .with_terrain(Location::West, TerrainType::Water)
            .with_terrain(Location::East, TerrainType::Forest);
        let b = Map::new(TerrainType::Plain)
            .with_terrain(Location::East, TerrainType::Forest)
            .with_terrain(Location::West, TerrainType::Water);
        let ra = a.render_form(&settings(), 8).unwrap();
        let rb = b.render_form(&settings(), 8).unwrap();
        assert_ne!(ra.terrains()[1].shape, rb.terrains()[0].shape);
    }

    #[test]
    fn test_zero_geometry_is_rejected() {
        let map = Map::new(TerrainType::Plain);
        let bad = RenderSettings {
            num_vertical: 0,
            ..RenderSettings::default()
        };
        assert!(matches!(
            map.render(&bad, 0),
            Err(RenderError::InvalidGeometry { num_vertical: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_geometry_is_rejected_before_rendering() {
        let map = Map::new(TerrainType::Plain).with_terrain(Location::Central, TerrainType::Forest);
        let huge = RenderSettings::new(16, 16, u32::MAX, u32::MAX);
        let err = map.render(&huge, 0).unwrap_err();
        assert!(err.to_string().contains("at most"));
        assert!(map.render_form(&huge, 0).is_err());
    }

    #[test]
    fn test_logical_space_follows_aspect_ratio() {
        let map = Map::new(TerrainType::Plain);
        let rendered = map.render_form(&settings(), 0).unwrap();
        let region = rendered.region();
        assert_eq!(region.top_left(), Point::new(0.0, 0.0));
        assert!((region.width() - 640.0 / 480.0).abs() < 1e-12);
        assert_eq!(region.height(), 1.0);
    }
}
