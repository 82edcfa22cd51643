use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "svg-textboxes",
    version,
    about = "Generate an A4 SVG that places transcript lines over a scanned page"
)]
struct Cli {
    /// Path to the input transcript (UTF-8, one entry per line)
    #[arg(short = 't', long = "text-file")]
    text_file: String,

    /// Background image or PDF
    #[arg(short = 'b', long = "background-file")]
    background_file: Option<String>,

    /// Page number for PDF backgrounds (0-indexed)
    #[arg(short = 'p', long = "page-number", default_value_t = 0)]
    page_number: usize,

    /// Output SVG filename
    #[arg(short = 'o', long = "output-file", default_value = "output.svg")]
    output_file: String,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    svg_textboxes::logging::init(cli.verbose)?;

    svg_textboxes::run(svg_textboxes::Config {
        text_file: cli.text_file,
        background_file: cli.background_file,
        page_number: cli.page_number,
        output_file: cli.output_file,
        settings_path: cli.read_settings,
    })
}
