//! Command-line argument definitions for the XDSM CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the figure and output locations, the
//! toolchain run, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the XDSM diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input figure file
    #[arg(help = "Path to the input figure (TOML)")]
    pub input: String,

    /// Directory receiving the generated files
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Output file stem, defaults to the figure name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Only write the TikZ and LaTeX sources
    #[arg(long)]
    pub no_build: bool,

    /// Keep the toolchain's intermediate files
    #[arg(long)]
    pub no_cleanup: bool,

    /// Open the PDF after building it
    #[arg(long)]
    pub open: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["xdsm", "mdf.toml"]);

        assert_eq!(args.input, "mdf.toml");
        assert_eq!(args.output_dir, ".");
        assert_eq!(args.name, None);
        assert!(!args.no_build);
        assert!(!args.no_cleanup);
        assert!(!args.open);
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "xdsm",
            "idf.toml",
            "-o",
            "out",
            "-n",
            "idf_trail1",
            "--no-build",
            "--no-cleanup",
            "--open",
            "-c",
            "xdsm.toml",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.output_dir, "out");
        assert_eq!(args.name.as_deref(), Some("idf_trail1"));
        assert!(args.no_build && args.no_cleanup && args.open);
        assert_eq!(args.config.as_deref(), Some("xdsm.toml"));
        assert_eq!(args.log_level, "debug");
    }
}
