//! XDSM - Extended Design Structure Matrix diagrams for MDO formulations.
//!
//! Figures are declared as TOML documents, arranged on the XDSM grid and
//! written out as TikZ with a standalone LaTeX document. The document can
//! then be typeset with an external TeX toolchain.

pub mod build;
pub mod config;
pub mod figure;
pub mod temporary;

mod error;
mod export;
mod structure;

pub use xdsm_core::{color, identifier, semantic, tex};

pub use error::XdsmError;

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use build::Toolchain;
use config::AppConfig;
use export::{
    Exporter,
    tikz::{self, STYLES_FILE, TikzBuilder},
};
use structure::Matrix;
use temporary::StagedFiles;

/// Options for [`DiagramBuilder::write`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    name: Option<String>,
    build: bool,
    cleanup: bool,
    auto_launch: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            name: None,
            build: true,
            cleanup: true,
            auto_launch: false,
        }
    }
}

impl WriteOptions {
    /// Output file stem used instead of the diagram name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether to typeset the document after writing it.
    pub fn with_build(mut self, build: bool) -> Self {
        self.build = build;
        self
    }

    /// Whether to remove the toolchain's intermediate files after a build.
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Whether to open the PDF after a build.
    pub fn with_auto_launch(mut self, auto_launch: bool) -> Self {
        self.auto_launch = auto_launch;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn build(&self) -> bool {
        self.build
    }

    pub fn cleanup(&self) -> bool {
        self.cleanup
    }

    pub fn auto_launch(&self) -> bool {
        self.auto_launch
    }
}

/// Files produced by [`DiagramBuilder::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    tikz: PathBuf,
    tex: PathBuf,
    styles: Option<PathBuf>,
    pdf: Option<PathBuf>,
}

impl Artifacts {
    pub fn tikz(&self) -> &Path {
        &self.tikz
    }

    pub fn tex(&self) -> &Path {
        &self.tex
    }

    /// Styles file left in the output directory, if any.
    ///
    /// During a build the styles file is only staged and is gone afterwards,
    /// unless one already existed in the output directory.
    pub fn styles(&self) -> Option<&Path> {
        self.styles.as_deref()
    }

    pub fn pdf(&self) -> Option<&Path> {
        self.pdf.as_deref()
    }
}

/// Builder for loading and writing XDSM diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use xdsm::{DiagramBuilder, WriteOptions, config::AppConfig};
///
/// let source = r#"
/// name = "mdf"
///
/// [[system]]
/// id = "opt"
/// kind = "optimization"
/// label = "Optimizer"
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder.parse(source).expect("Failed to parse");
///
/// // Write `mdf.tikz`, `mdf.tex` and `diagram_styles.tikz` without typesetting
/// let options = WriteOptions::default().with_build(false);
/// builder.write(&diagram, "out", &options).expect("Failed to write");
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse a figure document into a semantic diagram.
    ///
    /// # Errors
    ///
    /// Returns [`XdsmError::Figure`] carrying the source text for syntax
    /// errors and inconsistent figures.
    pub fn parse(&self, source: &str) -> Result<semantic::Diagram, XdsmError> {
        self.load(source).map(figure::Figure::into_diagram)
    }

    /// Load a figure document together with its `[write]` settings.
    ///
    /// # Errors
    ///
    /// Same as [`DiagramBuilder::parse`].
    pub fn load(&self, source: &str) -> Result<figure::Figure, XdsmError> {
        info!("Parsing figure");

        let figure =
            figure::load(source).map_err(|err| XdsmError::new_figure_error(err, source))?;

        debug!("Figure parsed successfully");
        trace!(figure:?; "Parsed figure");

        Ok(figure)
    }

    /// Render the `tikzpicture` of a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`XdsmError::Export`] if rendering fails.
    pub fn render_tikz(&self, diagram: &semantic::Diagram) -> Result<String, XdsmError> {
        let matrix = Matrix::from_diagram(diagram);
        Ok(tikz::render_picture(&matrix)?)
    }

    /// Render the standalone LaTeX document for a diagram written as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`XdsmError::Export`] if rendering fails.
    pub fn render_document(&self, name: &str) -> Result<String, XdsmError> {
        Ok(tikz::render_document(name, self.config.style().packages())?)
    }

    /// Render the shared styles file.
    ///
    /// # Errors
    ///
    /// Returns [`XdsmError::Export`] if a configured color is invalid or a
    /// configured styles file cannot be read.
    pub fn render_styles(&self) -> Result<String, XdsmError> {
        Ok(tikz::styles::render_styles(self.config.style())?)
    }

    /// Write a diagram into `out_dir` and optionally typeset it.
    ///
    /// `{name}.tikz` and `{name}.tex` are always written. Without a build the
    /// styles file is written next to them. With a build it is staged for the
    /// duration of the toolchain run, together with the configured extra
    /// files, and the PDF path is returned in the [`Artifacts`].
    ///
    /// With `cleanup` set the intermediate files are removed whether or not
    /// the toolchain succeeds. A failure keeps the tail of the toolchain log
    /// in the returned [`build::Error`].
    ///
    /// # Errors
    ///
    /// Returns [`XdsmError::Config`] if an extra file is named like the styles
    /// file or like another extra file, [`XdsmError::Export`] for invalid
    /// output names or write failures, [`XdsmError::Io`] for staging failures
    /// and [`XdsmError::Build`] for toolchain failures.
    pub fn write(
        &self,
        diagram: &semantic::Diagram,
        out_dir: impl AsRef<Path>,
        options: &WriteOptions,
    ) -> Result<Artifacts, XdsmError> {
        let out_dir = out_dir.as_ref();
        let name = options.name.as_deref().unwrap_or(diagram.name());

        if options.build {
            check_extra_file_names(self.config.build().extra_files())?;
        }

        info!(name = name, systems = diagram.systems().count(); "Building diagram structure");
        let matrix = Matrix::from_diagram(diagram);
        debug!(size = matrix.size(); "Structure built successfully");

        let mut exporter = TikzBuilder::new(out_dir, name)
            .with_style(self.config.style())
            .build()?;
        exporter.export_matrix(&matrix)?;

        let mut artifacts = Artifacts {
            tikz: exporter.picture_path(),
            tex: exporter.document_path(),
            styles: None,
            pdf: None,
        };

        let styles = self.render_styles()?;
        let styles_path = out_dir.join(STYLES_FILE);

        if !options.build {
            fs::write(&styles_path, styles)?;
            info!(path = styles_path.display().to_string(); "Styles written");
            artifacts.styles = Some(styles_path);
            return Ok(artifacts);
        }

        // A scratch copy is staged so the output directory ends up with only
        // the diagram files. An existing styles file is refreshed instead.
        let scratch = tempfile::tempdir()?;
        let mut sources = Vec::new();
        if styles_path.exists() {
            info!(path = styles_path.display().to_string(); "Refreshing existing styles file");
            fs::write(&styles_path, &styles)?;
            artifacts.styles = Some(styles_path);
        } else {
            let generated = scratch.path().join(STYLES_FILE);
            fs::write(&generated, &styles)?;
            sources.push(generated);
        }

        for extra in self.config.build().extra_files() {
            let present = extra
                .file_name()
                .is_some_and(|file_name| out_dir.join(file_name).exists());
            if present {
                debug!(path = extra.display().to_string(); "Extra file already in output directory");
            } else {
                sources.push(extra.clone());
            }
        }

        let staged = StagedFiles::stage(&sources, out_dir)?;
        debug!(staged = staged.paths().len(); "Build inputs staged");

        let toolchain = Toolchain::from_config(self.config.build());
        let compiled = toolchain.compile(out_dir, name);
        drop(staged);

        if options.cleanup {
            build::clean_intermediates(out_dir, name);
        }
        let pdf = compiled?;
        if options.auto_launch {
            toolchain.launch(&pdf)?;
        }

        artifacts.pdf = Some(pdf);
        Ok(artifacts)
    }
}

/// Rejects extra files that would collide when staged into one directory.
fn check_extra_file_names(extra_files: &[PathBuf]) -> Result<(), XdsmError> {
    let mut seen: HashSet<&OsStr> = HashSet::from([OsStr::new(STYLES_FILE)]);
    for extra in extra_files {
        let Some(file_name) = extra.file_name() else {
            continue;
        };
        if !seen.insert(file_name) {
            return Err(XdsmError::Config(format!(
                "extra file `{}` collides with another build input named `{}`",
                extra.display(),
                file_name.to_string_lossy()
            )));
        }
    }
    Ok(())
}
