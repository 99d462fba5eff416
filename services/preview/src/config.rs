//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::Level;

use basemap::{TileServiceConfig, DEFAULT_TILE_URL};
use preview_common::{PreviewResult, Resolution};
use renderer::Palette;

use crate::pipeline::{RenderOptions, DEFAULT_WIDTH};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "preview")]
#[command(about = "Draw a map of a single address source")]
pub struct CliArgs {
    /// Input Zip or CSV filename or URL
    pub source: String,

    /// Output PNG filename
    pub output: PathBuf,

    /// Width in pixels
    #[arg(long, env = "PREVIEW_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Draw at double resolution
    #[arg(long = "2x", overrides_with = "normal")]
    pub double: bool,

    /// Draw at normal resolution
    #[arg(long = "1x", overrides_with = "double")]
    pub normal: bool,

    /// Tile service API key
    #[arg(long, env = "PREVIEW_TILE_API_KEY", alias = "mapzen-key")]
    pub api_key: Option<String>,

    /// Tile URL template with {z}, {x}, {y} and optional {?api_key}
    #[arg(long, env = "PREVIEW_TILE_URL", default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    /// JSON file overriding palette colors
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// HTTP timeout in seconds for downloads and tile requests
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Turn on verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Turn off most logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CliArgs {
    pub fn resolution(&self) -> Resolution {
        if self.double {
            Resolution::Double
        } else {
            Resolution::Normal
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Max log level; `-v` and `-q` win over `--log-level`.
    pub fn level(&self) -> Level {
        if self.verbose {
            return Level::DEBUG;
        }
        if self.quiet {
            return Level::WARN;
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    pub fn tile_config(&self) -> TileServiceConfig {
        TileServiceConfig {
            url_template: self.tile_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout(),
        }
    }

    /// Render options, loading the palette file if one was given.
    pub fn render_options(&self) -> PreviewResult<RenderOptions> {
        let palette = match &self.palette {
            Some(path) => Palette::from_file(path)?,
            None => Palette::default(),
        };

        Ok(RenderOptions {
            width: self.width,
            resolution: self.resolution(),
            palette,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("preview").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["in.csv", "out.png"]);
        assert_eq!(args.source, "in.csv");
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.resolution(), Resolution::Normal);
        assert_eq!(args.level(), Level::INFO);
        assert_eq!(args.log_format, LogFormat::Text);
        assert_eq!(args.timeout(), None);

        let options = args.render_options().unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_resolution_last_flag_wins() {
        assert_eq!(parse(&["a.csv", "b.png", "--2x"]).resolution(), Resolution::Double);
        assert_eq!(
            parse(&["a.csv", "b.png", "--2x", "--1x"]).resolution(),
            Resolution::Normal
        );
        assert_eq!(
            parse(&["a.csv", "b.png", "--1x", "--2x"]).resolution(),
            Resolution::Double
        );
    }

    #[test]
    fn test_mapzen_key_alias() {
        let args = parse(&["a.csv", "b.png", "--mapzen-key", "mz-123", "--timeout-secs", "30"]);
        let tiles = args.tile_config();
        assert_eq!(tiles.api_key.as_deref(), Some("mz-123"));
        assert_eq!(tiles.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["a.csv", "b.png", "-v"]).level(), Level::DEBUG);
        assert_eq!(parse(&["a.csv", "b.png", "-q"]).level(), Level::WARN);
        assert_eq!(
            parse(&["a.csv", "b.png", "--log-level", "ERROR"]).level(),
            Level::ERROR
        );
        assert!(CliArgs::try_parse_from(["preview", "a.csv", "b.png", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_missing_palette_file_fails() {
        let args = parse(&["a.csv", "b.png", "--palette", "/nonexistent/palette.json"]);
        assert!(args.render_options().is_err());
    }
}
