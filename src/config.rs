//! Configuration sections shared by scenarios, the worker and the CLI

use serde::{Deserialize, Serialize};

use crate::map::RenderError;

fn default_tile_size() -> u32 {
    16
}

fn default_num_horizontal() -> u32 {
    40
}

fn default_num_vertical() -> u32 {
    30
}

/// Upper bound on `num_horizontal * num_vertical`; the tile grid is allocated up front.
pub const MAX_TILES: u64 = 1 << 24;

/// Output grid geometry: tile size in pixels and tile counts per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_tile_size")]
    pub tile_width: u32,
    #[serde(default = "default_tile_size")]
    pub tile_height: u32,
    #[serde(default = "default_num_horizontal")]
    pub num_horizontal: u32,
    #[serde(default = "default_num_vertical")]
    pub num_vertical: u32,
}

impl RenderSettings {
    pub fn new(tile_width: u32, tile_height: u32, num_horizontal: u32, num_vertical: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            num_horizontal,
            num_vertical,
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.tile_width == 0
            || self.tile_height == 0
            || self.num_horizontal == 0
            || self.num_vertical == 0
            || self.tile_count() > MAX_TILES
        {
            return Err(RenderError::InvalidGeometry {
                tile_width: self.tile_width,
                tile_height: self.tile_height,
                num_horizontal: self.num_horizontal,
                num_vertical: self.num_vertical,
            });
        }
        Ok(())
    }

    pub fn tile_count(&self) -> u64 {
        self.num_horizontal as u64 * self.num_vertical as u64
    }

    /// Width over height of the full output in pixels.
    pub fn aspect_ratio(&self) -> f64 {
        (self.tile_width as f64 * self.num_horizontal as f64)
            / (self.tile_height as f64 * self.num_vertical as f64)
    }

    pub fn pixel_width(&self) -> u64 {
        self.tile_width as u64 * self.num_horizontal as u64
    }

    pub fn pixel_height(&self) -> u64 {
        self.tile_height as u64 * self.num_vertical as u64
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_width: default_tile_size(),
            tile_height: default_tile_size(),
            num_horizontal: default_num_horizontal(),
            num_vertical: default_num_vertical(),
        }
    }
}

fn default_min_frame_ms() -> u64 {
    200
}

fn default_stats_history() -> usize {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Floor on the time between two published frames.
    #[serde(default = "default_min_frame_ms")]
    pub min_frame_ms: u64,
    #[serde(default = "default_stats_history")]
    pub stats_history: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_frame_ms: default_min_frame_ms(),
            stats_history: default_stats_history(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render_settings_match_screen() {
        let settings = RenderSettings::default();
        assert_eq!(settings.pixel_width(), 640);
        assert_eq!(settings.pixel_height(), 480);
        assert!((settings.aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: RenderSettings = serde_yaml::from_str("num_horizontal: 10").unwrap();
        assert_eq!(settings.num_horizontal, 10);
        assert_eq!(settings.num_vertical, 30);
        assert_eq!(settings.tile_width, 16);

        let worker: WorkerConfig = serde_yaml::from_str("min_frame_ms: 5").unwrap();
        assert_eq!(worker.min_frame_ms, 5);
        assert_eq!(worker.stats_history, 100);
    }

    #[test]
    fn test_zero_tile_size_fails_validation() {
        let settings = RenderSettings::new(0, 16, 40, 30);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_oversized_grid_fails_validation() {
        let settings = RenderSettings::new(16, 16, 4_000_000_000, 4_000_000_000);
        assert!(matches!(
            settings.validate(),
            Err(RenderError::InvalidGeometry {
                num_horizontal: 4_000_000_000,
                ..
            })
        ));

        let edge = RenderSettings::new(1, 1, 4096, 4096);
        assert_eq!(edge.tile_count(), MAX_TILES);
        assert!(edge.validate().is_ok());
        assert!(RenderSettings::new(1, 1, 4097, 4096).validate().is_err());
    }
}
