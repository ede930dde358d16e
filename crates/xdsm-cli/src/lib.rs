//! CLI logic for the XDSM diagram tool.
//!
//! This module contains the core CLI logic for the XDSM diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use xdsm::{DiagramBuilder, WriteOptions, XdsmError};

/// Run the XDSM CLI application
///
/// This function loads the figure file, writes its TikZ and LaTeX sources
/// into the output directory and, unless `--no-build` is given, typesets it.
/// Flags can only narrow the figure's `[write]` settings, except `--open`.
///
/// # Errors
///
/// Returns `XdsmError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Figure errors
/// - Export errors
/// - Toolchain errors
pub fn run(args: &Args) -> Result<(), XdsmError> {
    info!(
        input_path = args.input,
        output_dir = args.output_dir;
        "Processing figure"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    fs::create_dir_all(&args.output_dir)?;

    let builder = DiagramBuilder::new(app_config);
    let figure = builder.load(&source)?;
    let options = write_options(args, figure.write_options());

    let artifacts = builder.write(figure.diagram(), &args.output_dir, &options)?;

    match artifacts.pdf() {
        Some(pdf) => info!(output_file = pdf.display().to_string(); "PDF built successfully"),
        None => info!(output_file = artifacts.tex().display().to_string(); "LaTeX written successfully"),
    }

    Ok(())
}

fn write_options(args: &Args, declared: WriteOptions) -> WriteOptions {
    let build = declared.build() && !args.no_build;
    let cleanup = declared.cleanup() && !args.no_cleanup;
    let auto_launch = declared.auto_launch() || args.open;
    let options = declared
        .with_build(build)
        .with_cleanup(cleanup)
        .with_auto_launch(auto_launch);
    match &args.name {
        Some(name) => options.with_name(name),
        None => options,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from(["xdsm", "mdf.toml", "--no-cleanup", "--open", "-n", "x"]);
        let options = write_options(&args, WriteOptions::default());

        assert!(options.build());
        assert!(!options.cleanup());
        assert!(options.auto_launch());
        assert_eq!(options.name(), Some("x"));
    }

    #[test]
    fn test_figure_settings_survive_without_flags() {
        let args = Args::parse_from(["xdsm", "idf_a320.toml"]);
        let declared = WriteOptions::default()
            .with_cleanup(false)
            .with_auto_launch(true);
        let options = write_options(&args, declared);

        assert!(options.build());
        assert!(!options.cleanup());
        assert!(options.auto_launch());
        assert_eq!(options.name(), None);
    }

    #[test]
    fn test_no_build_wins_over_figure() {
        let args = Args::parse_from(["xdsm", "idf_a320.toml", "--no-build"]);
        let options = write_options(&args, WriteOptions::default().with_auto_launch(true));

        assert!(!options.build());
    }
}
