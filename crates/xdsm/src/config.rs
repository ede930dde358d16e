//! Configuration types for XDSM diagram output.
//!
//! This module provides configuration structures that control how diagrams
//! are typeset and built. All types implement [`serde::Deserialize`] for
//! loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining build and style settings.
//! - [`BuildConfig`] - Controls the external TeX toolchain invocation.
//! - [`StyleConfig`] - Controls block colors, extra packages and the styles file.
//!
//! # Example
//!
//! ```
//! # use xdsm::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.build().command(), "pdflatex");
//! assert!(config.style().data_fill_color().is_ok());
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use xdsm_core::{color::Color, semantic::SystemKind};

/// Top-level application configuration combining build and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Build configuration section.
    #[serde(default)]
    build: BuildConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified build and style configurations.
    pub fn new(build: BuildConfig, style: StyleConfig) -> Self {
        Self { build, style }
    }

    /// Returns the build configuration.
    pub fn build(&self) -> &BuildConfig {
        &self.build
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// External toolchain configuration.
///
/// The command is run inside the output directory with `args` followed by
/// the `.tex` file name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Typesetting command.
    command: String,

    /// Arguments placed before the `.tex` file name.
    args: Vec<String>,

    /// Kill the build after this many seconds.
    timeout_secs: Option<u64>,

    /// Program used to open the built PDF instead of the platform opener.
    viewer: Option<String>,

    /// Additional files staged next to the document during the build.
    extra_files: Vec<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: "pdflatex".to_string(),
            args: vec![
                "-halt-on-error".to_string(),
                "-interaction=nonstopmode".to_string(),
            ],
            timeout_secs: None,
            viewer: None,
            extra_files: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Creates a build configuration running `command` with `args`.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the build timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Sets the files staged next to the document during the build.
    pub fn with_extra_files(mut self, files: Vec<PathBuf>) -> Self {
        self.extra_files = files;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the build timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    pub fn extra_files(&self) -> &[PathBuf] {
        &self.extra_files
    }
}

/// Block fill colors, as CSS color strings.
///
/// Unset entries fall back to the built-in palette.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillConfig {
    #[serde(default)]
    optimization: Option<String>,
    #[serde(default)]
    mda: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    function: Option<String>,
    #[serde(default)]
    metamodel: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Visual styling configuration for generated documents.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Fill colors for blocks.
    #[serde(default)]
    fill: FillConfig,

    /// Extra LaTeX packages loaded by the document, e.g. `sfmath`.
    #[serde(default)]
    packages: Vec<String>,

    /// Styles file used instead of the generated one.
    #[serde(default)]
    styles_file: Option<PathBuf>,
}

impl StyleConfig {
    /// Sets the packages loaded by the document.
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Uses the styles file at `path` instead of the generated one.
    pub fn with_styles_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.styles_file = Some(path.into());
        self
    }

    /// Returns the parsed fill [`Color`] for blocks of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn fill_color(&self, kind: SystemKind) -> Result<Color, String> {
        let (configured, default) = match kind {
            SystemKind::Optimization => (&self.fill.optimization, "#c8e6c9"),
            SystemKind::Mda => (&self.fill.mda, "#ffe0b2"),
            SystemKind::Analysis => (&self.fill.analysis, "#bbdefb"),
            SystemKind::Function => (&self.fill.function, "#f8bbd0"),
            SystemKind::Metamodel => (&self.fill.metamodel, "#e1bee7"),
        };
        parse_fill(configured.as_deref(), default)
            .map_err(|err| format!("Invalid {kind} fill color in config: {err}"))
    }

    /// Returns the parsed fill [`Color`] for data blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn data_fill_color(&self) -> Result<Color, String> {
        parse_fill(self.fill.data.as_deref(), "#eeeeee")
            .map_err(|err| format!("Invalid data fill color in config: {err}"))
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn styles_file(&self) -> Option<&Path> {
        self.styles_file.as_deref()
    }
}

fn parse_fill(configured: Option<&str>, default: &str) -> Result<Color, String> {
    Color::new(configured.unwrap_or(default))
}
