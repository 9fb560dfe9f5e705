pub mod config;
pub mod engine;
pub mod geometry;
pub mod instance;
pub mod location;
pub mod map;
pub mod rendered;
pub mod rng;
pub mod scenario;
pub mod shape;
pub mod snapshot;
pub mod web;

pub use config::RenderSettings;
pub use engine::{Status, Worker};
pub use instance::{MapInstance, Tile, TileError};
pub use location::Location;
pub use map::{FeatureType, Map, RenderError, TerrainType};
