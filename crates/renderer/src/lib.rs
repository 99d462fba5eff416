//! Raster rendering for address previews.
//!
//! - [`canvas`]: map-to-pixel transform and a tiny-skia drawing surface
//! - [`rasterize`]: layer and point composition in draw order
//! - [`style`]: palette colors
//! - [`png`]: indexed/RGBA PNG encoding

pub mod canvas;
pub mod png;
pub mod rasterize;
pub mod style;

pub use canvas::{Canvas, MapTransform, PathCommand};
pub use png::encode_png;
pub use rasterize::Rasterizer;
pub use style::{hex_to_rgb, Palette, Rgb};
