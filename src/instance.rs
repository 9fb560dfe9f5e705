//! The final tile grid handed to renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RenderSettings;
use crate::geometry::{Point, Region};
use crate::map::{FeatureType, TerrainType};
use crate::rendered::RenderedMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub terrain_type: TerrainType,
    pub feature_type: FeatureType,
}

impl Tile {
    pub fn glyph(&self) -> char {
        self.feature_type
            .glyph()
            .unwrap_or_else(|| self.terrain_type.glyph())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("tile ({x}, {y}) is outside of the {width}x{height} map")]
    OutOfRange { x: i32, y: i32, width: u32, height: u32 },
}

/// Dense, immutable grid of tiles stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInstance {
    tiles: Vec<Tile>,
    tile_width: u32,
    tile_height: u32,
    num_horizontal: u32,
    num_vertical: u32,
}

impl MapInstance {
    /// Sample `rendered` once per tile. Each tile covers a closed logical
    /// rectangle; terrain is read at its centre and a feature is picked up
    /// when its point falls inside the rectangle.
    pub(crate) fn rasterize(settings: &RenderSettings, rendered: &RenderedMap) -> Self {
        let region = rendered.region();
        let cell_width = region.width() / settings.num_horizontal as f64;
        let cell_height = region.height() / settings.num_vertical as f64;

        let mut tiles = Vec::with_capacity(settings.tile_count() as usize);
        for y in 0..settings.num_vertical {
            for x in 0..settings.num_horizontal {
                let footprint = Region::from_corners(
                    Point::new(x as f64 * cell_width, y as f64 * cell_height),
                    Point::new((x + 1) as f64 * cell_width, (y + 1) as f64 * cell_height),
                );
                tiles.push(Tile {
                    terrain_type: rendered.terrain_at(footprint.center()),
                    feature_type: rendered.feature_in(&footprint),
                });
            }
        }

        Self {
            tiles,
            tile_width: settings.tile_width,
            tile_height: settings.tile_height,
            num_horizontal: settings.num_horizontal,
            num_vertical: settings.num_vertical,
        }
    }

    pub fn num_horizontal(&self) -> u32 {
        self.num_horizontal
    }

    pub fn num_vertical(&self) -> u32 {
        self.num_vertical
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn at(&self, x: i32, y: i32) -> Result<&Tile, TileError> {
        let out_of_range = TileError::OutOfRange {
            x,
            y,
            width: self.num_horizontal,
            height: self.num_vertical,
        };
        let (Ok(ux), Ok(uy)) = (u32::try_from(x), u32::try_from(y)) else {
            return Err(out_of_range);
        };
        if ux >= self.num_horizontal || uy >= self.num_vertical {
            return Err(out_of_range);
        }
        Ok(&self.tiles[uy as usize * self.num_horizontal as usize + ux as usize])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.num_horizontal.max(1) as usize)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn terrain_counts(&self) -> BTreeMap<TerrainType, usize> {
        let mut counts = BTreeMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.terrain_type).or_insert(0) += 1;
        }
        counts
    }

    /// Every tile carrying a feature, as `(x, y, feature)` in row-major order.
    pub fn features(&self) -> Vec<(u32, u32, FeatureType)> {
        let width = self.num_horizontal.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.feature_type != FeatureType::None)
            .map(|(index, tile)| {
                let index = index as u32;
                (index % width, index / width, tile.feature_type)
            })
            .collect()
    }
}
