//! Seed-specific intermediate form: placed shapes and feature points in a
//! logical space of `aspect_ratio x 1.0`.

use serde::Serialize;

use crate::geometry::{Point, Region};
use crate::map::{FeatureType, TerrainType};
use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTerrain {
    pub shape: Shape,
    pub terrain: TerrainType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderedFeature {
    pub point: Point,
    pub feature: FeatureType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMap {
    background: TerrainType,
    aspect_ratio: f64,
    terrains: Vec<RenderedTerrain>,
    features: Vec<RenderedFeature>,
}

impl RenderedMap {
    pub fn new(background: TerrainType, aspect_ratio: f64) -> Self {
        Self {
            background,
            aspect_ratio,
            terrains: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn background(&self) -> TerrainType {
        self.background
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn region(&self) -> Region {
        Region::new(self.aspect_ratio, 1.0)
    }

    pub fn terrains(&self) -> &[RenderedTerrain] {
        &self.terrains
    }

    pub fn features(&self) -> &[RenderedFeature] {
        &self.features
    }

    pub fn push_terrain(&mut self, shape: Shape, terrain: TerrainType) {
        self.terrains.push(RenderedTerrain { shape, terrain });
    }

    pub fn push_feature(&mut self, point: Point, feature: FeatureType) {
        self.features.push(RenderedFeature { point, feature });
    }

    /// Later declarations occlude earlier ones; uncovered points fall back to
    /// the background.
    pub fn terrain_at(&self, p: Point) -> TerrainType {
        self.terrains
            .iter()
            .rev()
            .find(|layer| layer.shape.contains(p))
            .map_or(self.background, |layer| layer.terrain)
    }

    /// First feature, in rendered order, lying inside `footprint`.
    pub fn feature_in(&self, footprint: &Region) -> FeatureType {
        self.features
            .iter()
            .find(|f| footprint.contains(f.point))
            .map_or(FeatureType::None, |f| f.feature)
    }

    /// Feature points rescaled into a `width x height` output space, e.g.
    /// screen pixels.
    pub fn feature_positions(&self, width: f64, height: f64) -> Vec<(Point, FeatureType)> {
        let region = self.region();
        self.features
            .iter()
            .map(|f| (region.rescale(f.point, width, height), f.feature))
            .collect()
    }
}
