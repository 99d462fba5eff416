//! End-to-end preview rendering.
//!
//! ingest → project → bounds → plan → fetch/classify → rasterize → encode →
//! write. Every stage runs to completion before the next starts, and the
//! output file is only written once the PNG has been encoded.

use std::path::Path;

use tracing::{info, instrument};

use basemap::{fetch_layers, BasemapLayers, FeatureClassifier, TileSource};
use ingestion::PointIngestor;
use preview_common::{
    BoundingBox, GridPlan, PreviewError, PreviewResult, ProjectedPoint, Resolution,
};
use projection::WebMercator;
use renderer::{Canvas, Palette, Rasterizer};

/// Output width in reference pixels, sized for a GitHub comment box.
pub const DEFAULT_WIDTH: u32 = 668;

/// Rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Width in reference pixels; the canvas is `width * resolution` wide
    pub width: u32,
    pub resolution: Resolution,
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            resolution: Resolution::Normal,
            palette: Palette::default(),
        }
    }
}

/// What a render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    /// Valid points drawn
    pub points: usize,
    /// Source rows dropped as malformed (zero for pre-projected input)
    pub skipped_rows: usize,
    pub bounds: BoundingBox,
    pub width_px: u32,
    pub height_px: u32,
    pub scale: f64,
    pub continuous_zoom: f64,
    pub zoom: u32,
    /// Tiles fetched
    pub tiles: usize,
    pub landuse: usize,
    pub water: usize,
    pub roads: usize,
}

/// A drawn, not yet encoded, preview.
pub struct Preview {
    pub canvas: Canvas,
    pub summary: RenderSummary,
}

/// Render `source` (local path or http(s) URL) to a PNG at `output`.
///
/// Remote sources are downloaded without a timeout; use [`render_with`] to
/// supply a configured ingestor.
pub async fn render(
    source: &str,
    output: &Path,
    options: &RenderOptions,
    tiles: &dyn TileSource,
) -> PreviewResult<RenderSummary> {
    let ingestor = PointIngestor::new(None)?;
    render_with(&ingestor, source, output, options, tiles).await
}

/// [`render`] with an explicit ingestor.
#[instrument(skip(ingestor, output, options, tiles), fields(output = %output.display()))]
pub async fn render_with(
    ingestor: &PointIngestor,
    source: &str,
    output: &Path,
    options: &RenderOptions,
    tiles: &dyn TileSource,
) -> PreviewResult<RenderSummary> {
    let report = ingestor.ingest(source).await?;
    let points = WebMercator::default().project_all(report.points);

    let mut preview = draw_preview(&points, options, tiles).await?;
    preview.summary.skipped_rows = report.skipped;

    write_png(&preview, output).await?;
    Ok(preview.summary)
}

/// Render already-projected points to a PNG at `output`.
pub async fn render_points(
    points: &[ProjectedPoint],
    output: &Path,
    options: &RenderOptions,
    tiles: &dyn TileSource,
) -> PreviewResult<RenderSummary> {
    let preview = draw_preview(points, options, tiles).await?;
    write_png(&preview, output).await?;
    Ok(preview.summary)
}

/// Plan, fetch and draw without encoding or writing anything.
pub async fn draw_preview(
    points: &[ProjectedPoint],
    options: &RenderOptions,
    tiles: &dyn TileSource,
) -> PreviewResult<Preview> {
    let bounds = BoundingBox::estimate(points)?;
    let plan = GridPlan::new(bounds, options.width, options.resolution)?;

    info!(
        "Preview width {}, scale {:.5}, zoom {:.2}",
        options.width, plan.scale, plan.continuous_zoom
    );

    let coords = plan.tiles();
    let layers = fetch_layers(tiles, &coords, &FeatureClassifier::default()).await?;

    let canvas = Rasterizer::new(options.palette).render(
        &plan,
        &[&layers.landuse, &layers.water, &layers.roads],
        points,
    )?;

    Ok(Preview {
        canvas,
        summary: summarize(points.len(), &plan, coords.len(), &layers),
    })
}

fn summarize(points: usize, plan: &GridPlan, tiles: usize, layers: &BasemapLayers) -> RenderSummary {
    RenderSummary {
        points,
        skipped_rows: 0,
        bounds: plan.bounds,
        width_px: plan.width_px,
        height_px: plan.height_px,
        scale: plan.scale,
        continuous_zoom: plan.continuous_zoom,
        zoom: plan.zoom,
        tiles,
        landuse: layers.landuse.len(),
        water: layers.water.len(),
        roads: layers.roads.len(),
    }
}

async fn write_png(preview: &Preview, output: &Path) -> PreviewResult<()> {
    let png = preview.canvas.encode_png()?;
    tokio::fs::write(output, &png)
        .await
        .map_err(|e| PreviewError::Io(format!("{}: {}", output.display(), e)))?;

    info!(
        path = %output.display(),
        bytes = png.len(),
        width = preview.summary.width_px,
        height = preview.summary.height_px,
        "Wrote preview"
    );
    Ok(())
}
