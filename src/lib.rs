use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub mod background;
pub mod error;
pub mod layout;
pub mod logging;
pub mod page;
pub mod settings;
pub mod svg;
pub mod transcript;

pub use background::Background;
pub use error::Error;
pub use layout::LineBox;
pub use page::PageCanvas;
pub use settings::Settings;
pub use transcript::TextLine;

#[derive(Debug, Clone)]
pub struct Config {
    pub text_file: String,
    pub background_file: Option<String>,
    pub page_number: usize,
    pub output_file: String,
    pub settings_path: Option<String>,
}

/// Runs the whole pipeline: read transcript, load/rasterize the background,
/// lay out the highlight bands, compose the SVG, and only then write the
/// output file. Nothing is written on any failure path.
pub fn run(config: Config) -> Result<()> {
    let settings = settings::load_settings(config.settings_path.as_deref().map(Path::new))?;
    let canvas = page::PageCanvas::a4();

    let lines = transcript::read_transcript(Path::new(&config.text_file))?;
    tracing::debug!(lines = lines.len(), "transcript loaded");

    let background = background::load_background(
        config.background_file.as_deref().map(Path::new),
        config.page_number,
        &settings,
    )?;

    let boxes = layout::layout_lines(&lines, &canvas, &settings);
    let markup = svg::compose(&canvas, &background, &lines, &boxes, &settings);

    fs::write(&config.output_file, markup)
        .with_context(|| format!("failed to write output: {}", config.output_file))?;
    tracing::info!(output = %config.output_file, "svg written");
    Ok(())
}
