//! TikZ exporter.
//!
//! Writes two files per diagram:
//!
//! - `{name}.tikz` - the `tikzpicture` with the matrix, process chains and data lines
//! - `{name}.tex` - a standalone document that inputs the styles file and the picture
//!
//! The styles file itself is produced by [`styles::render_styles`] and placed
//! by the caller, since it is shared by every diagram in a directory.

pub mod styles;

use std::{
    fmt::{self, Write},
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info};

use xdsm_core::tex::{ZERO_MACRO, render_label};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    structure::{Cell, Chain, Matrix},
};

/// File name of the styles file the generated document inputs.
pub const STYLES_FILE: &str = "diagram_styles.tikz";

/// Builder for [`Tikz`] exporters.
pub struct TikzBuilder<'a> {
    directory: PathBuf,
    name: String,
    style: Option<&'a StyleConfig>,
}

impl<'a> TikzBuilder<'a> {
    /// Exporter writing `{name}.tikz` and `{name}.tex` into `directory`.
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the name cannot be used as a TeX
    /// file name or the directory does not exist.
    pub fn build(self) -> Result<Tikz, export::Error> {
        if !is_valid_file_stem(&self.name) {
            return Err(export::Error::Render(format!(
                "`{}` cannot be used as an output name",
                self.name
            )));
        }
        if !self.directory.is_dir() {
            return Err(export::Error::Render(format!(
                "output directory `{}` does not exist",
                self.directory.display()
            )));
        }

        Ok(Tikz {
            directory: self.directory,
            name: self.name,
            packages: self
                .style
                .map(|style| style.packages().to_vec())
                .unwrap_or_default(),
        })
    }
}

/// Output names end up in `\input{...}` and on the toolchain command line.
fn is_valid_file_stem(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.chars().any(|c| {
            c.is_whitespace() || matches!(c, '/' | '\\' | '%' | '{' | '}' | '#' | '$' | '"')
        })
}

/// TikZ exporter for a single diagram.
pub struct Tikz {
    directory: PathBuf,
    name: String,
    packages: Vec<String>,
}

impl Tikz {
    pub fn picture_path(&self) -> PathBuf {
        self.directory.join(format!("{}.tikz", self.name))
    }

    pub fn document_path(&self) -> PathBuf {
        self.directory.join(format!("{}.tex", self.name))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), export::Error> {
        info!(file_name = path.display().to_string(); "Writing TikZ output");
        if let Err(err) = fs::write(path, content) {
            error!(file_name = path.display().to_string(), err:err; "Failed to write TikZ output");
            return Err(export::Error::Io(err));
        }
        Ok(())
    }
}

impl Exporter for Tikz {
    fn export_matrix(&mut self, matrix: &Matrix) -> Result<(), export::Error> {
        let picture = render_picture(matrix)?;
        debug!("TikZ picture rendered");
        self.write_file(&self.picture_path(), &picture)?;

        let document = render_document(&self.name, &self.packages)?;
        self.write_file(&self.document_path(), &document)
    }
}

/// Render the `tikzpicture` for an arranged matrix.
///
/// # Errors
///
/// Returns [`export::Error::Render`] if formatting fails.
pub(crate) fn render_picture(matrix: &Matrix) -> Result<String, export::Error> {
    let mut out = String::new();
    write_picture(&mut out, matrix)?;
    Ok(out)
}

/// Render the standalone document that wraps `{name}.tikz`.
///
/// # Errors
///
/// Returns [`export::Error::Render`] if formatting fails.
pub fn render_document(name: &str, packages: &[String]) -> Result<String, export::Error> {
    let mut out = String::new();
    write_document(&mut out, name, packages)?;
    Ok(out)
}

fn write_picture(out: &mut impl Write, matrix: &Matrix) -> fmt::Result {
    writeln!(out, r"\begin{{tikzpicture}}")?;
    writeln!(out)?;

    writeln!(out, r"\matrix[MatrixSetup]{{")?;
    for (index, row) in matrix.rows().enumerate() {
        writeln!(out, "%Row {index}")?;
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.as_ref().map(node).unwrap_or_default())
            .collect();
        writeln!(out, r"{}\\", cells.join("&\n"))?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    if !matrix.chains().is_empty() {
        writeln!(out, "% XDSM process chains")?;
        for chain in matrix.chains() {
            write_chain(out, chain)?;
        }
        writeln!(out)?;
    }

    let horizontal = matrix.horizontal_lines();
    let vertical = matrix.vertical_lines();
    if !horizontal.is_empty() || !vertical.is_empty() {
        writeln!(out, r"\begin{{pgfonlayer}}{{data}}")?;
        writeln!(out, r"\path")?;
        writeln!(out, "% Horizontal edges")?;
        for line in horizontal {
            writeln!(out, "({}) edge [DataLine] ({})", line.start(), line.end())?;
        }
        writeln!(out, "% Vertical edges")?;
        for line in vertical {
            writeln!(out, "({}) edge [DataLine] ({})", line.start(), line.end())?;
        }
        writeln!(out, ";")?;
        writeln!(out, r"\end{{pgfonlayer}}")?;
        writeln!(out)?;
    }

    writeln!(out, r"\end{{tikzpicture}}")
}

fn node(cell: &Cell) -> String {
    format!(
        r"\node [{}] ({}) {{{}}};",
        cell.style(),
        cell.name(),
        render_label(cell.label())
    )
}

fn write_chain(out: &mut impl Write, chain: &Chain) -> fmt::Result {
    let join = if chain.has_arrow() {
        "ProcessHVA"
    } else {
        "ProcessHV"
    };

    writeln!(out, "{{ [start chain=process]")?;
    writeln!(out, r"\begin{{pgfonlayer}}{{process}}")?;
    for (index, node) in chain.nodes().iter().enumerate() {
        if index == 0 {
            writeln!(out, r"\chainin ({node});")?;
        } else {
            writeln!(out, r"\chainin ({node}) [join=by {join}];")?;
        }
    }
    writeln!(out, r"\end{{pgfonlayer}}")?;
    writeln!(out, "}}")
}

fn write_document(out: &mut impl Write, name: &str, packages: &[String]) -> fmt::Result {
    writeln!(out, r"\documentclass{{article}}")?;
    for package in ["geometry", "amsfonts", "amsmath", "amssymb", "tikz"] {
        writeln!(out, r"\usepackage{{{package}}}")?;
    }
    for package in packages {
        writeln!(out, r"\usepackage{{{package}}}")?;
    }
    writeln!(out)?;
    writeln!(out, r"\usepackage[active,tightpage]{{preview}}")?;
    writeln!(out, r"\PreviewEnvironment{{tikzpicture}}")?;
    writeln!(out, r"\setlength{{\PreviewBorder}}{{5pt}}")?;
    writeln!(out)?;
    writeln!(out, "{ZERO_MACRO}")?;
    writeln!(out)?;
    writeln!(out, r"\input{{{STYLES_FILE}}}")?;
    writeln!(out)?;
    writeln!(out, r"\begin{{document}}")?;
    writeln!(out, r"\input{{{name}.tikz}}")?;
    writeln!(out, r"\end{{document}}")
}
