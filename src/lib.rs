//! Agrizone — management-zone delineation for precision agriculture.
//!
//! Takes a raster of continuous field measurements (NDVI, soil moisture,
//! yield index), partitions it into a requested number of internally
//! homogeneous zones with the `agrizone-optimization` engine, and renders
//! the result as a color-mapped zone map.
//!
//! This crate is the thin glue around the engine:
//! - [`raster`]: on-disk instance format parsing
//! - [`render`]: heatmap rendering with zone-boundary and label overlays

pub mod raster;
pub mod render;

pub use agrizone_optimization as optimization;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
