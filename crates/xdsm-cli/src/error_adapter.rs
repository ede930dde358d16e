//! Error adapter for converting XdsmError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Figure errors are
//! rendered with a snippet of the figure source; toolchain failures carry the
//! tail of the TeX log as help text.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use xdsm::{XdsmError, build, figure};

/// Adapter for a figure loading error.
pub struct FigureAdapter<'a> {
    /// The wrapped figure error
    err: &'a figure::Error,
    /// Figure source for displaying snippets
    src: &'a str,
}

impl<'a> FigureAdapter<'a> {
    /// Create a new figure adapter.
    pub fn new(err: &'a figure::Error, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for FigureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigureAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for FigureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err.message())
    }
}

impl std::error::Error for FigureAdapter<'_> {}

impl MietteDiagnostic for FigureAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("xdsm::figure"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span_to_miette(span));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`XdsmError`] variants without source locations.
///
/// This adapter handles I/O, configuration, export and toolchain errors.
pub struct ErrorAdapter<'a>(pub &'a XdsmError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            XdsmError::Io(_) => "xdsm::io",
            XdsmError::Figure { .. } => return None,
            XdsmError::Config(_) => "xdsm::config",
            XdsmError::Export(_) => "xdsm::export",
            XdsmError::Build(_) => "xdsm::build",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let XdsmError::Build(err) = &self.0 else {
            return None;
        };
        match err {
            build::Error::Spawn { .. } => Some(Box::new(
                "install a TeX distribution or set `build.command` in the configuration",
            )),
            build::Error::Timeout { .. } => {
                Some(Box::new("raise `build.timeout_secs` in the configuration"))
            }
            _ => err
                .log_tail()
                .map(|tail| Box::new(tail) as Box<dyn fmt::Display>),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a figure error with source snippet or a plain
/// error, providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A figure error with source location information.
    Figure(FigureAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Figure(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Figure(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Figure(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Figure(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Figure(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Figure(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: Range<usize>) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

/// Convert an [`XdsmError`] into a list of reportable errors.
pub fn to_reportables(err: &XdsmError) -> Vec<Reportable<'_>> {
    match err {
        XdsmError::Figure { err: figure_err, src } => {
            vec![Reportable::Figure(FigureAdapter::new(figure_err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
