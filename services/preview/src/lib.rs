//! Address source previews.
//!
//! Reads a CSV or zipped CSV of `LON`/`LAT` points, fits a bounding box to
//! them, pulls basemap features from a vector tile service and draws the
//! points over landuse, water and roads into a PNG.

pub mod config;
pub mod pipeline;

pub use config::{CliArgs, LogFormat};
pub use pipeline::{
    draw_preview, render, render_points, render_with, Preview, RenderOptions, RenderSummary,
};
