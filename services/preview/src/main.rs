//! Address source preview renderer.
//!
//! Draws the points of a CSV or zipped CSV over a basemap from a vector tile
//! service and writes the result as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use basemap::HttpTileSource;
use ingestion::PointIngestor;
use preview::{render_with, CliArgs, LogFormat};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    // Initialize tracing
    let builder = FmtSubscriber::builder()
        .with_max_level(args.level())
        .with_target(true);
    match args.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }

    let options = args
        .render_options()
        .context("Failed to load palette")?;
    let ingestor = PointIngestor::new(args.timeout())?;
    let tiles = HttpTileSource::new(args.tile_config())?;

    let summary = render_with(&ingestor, &args.source, &args.output, &options, &tiles)
        .await
        .map_err(|e| {
            error!(kind = e.kind(), error = %e, "Render failed");
            e
        })
        .with_context(|| format!("Failed to render a preview of {}", args.source))?;

    info!(
        points = summary.points,
        skipped = summary.skipped_rows,
        tiles = summary.tiles,
        zoom = summary.zoom,
        "Done"
    );
    Ok(())
}
