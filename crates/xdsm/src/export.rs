//! Export functionality for XDSM diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing an arranged [`Matrix`] to disk. It is the final stage before the
//! optional toolchain build.
//!
//! # Pipeline Position
//!
//! ```text
//! Figure Source
//!     ↓ parse
//! Semantic Diagram
//!     ↓ structure
//! Matrix
//!     ↓ export (this module)
//! .tikz / .tex / styles
//!     ↓ build (optional)
//! .pdf
//! ```
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`XdsmError::Export`] at the crate
//! boundary.
//!
//! [`XdsmError::Export`]: crate::XdsmError::Export

/// TikZ/LaTeX export backend.
pub mod tikz;

use std::io;

use crate::structure::Matrix;

/// Abstraction for diagram export backends.
pub(crate) trait Exporter {
    /// Exports an arranged matrix to the backend's output files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the matrix cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_matrix(&mut self, matrix: &Matrix) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while reading or writing files.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::Render(err.to_string())
    }
}
