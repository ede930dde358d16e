//! Error types for XDSM operations.
//!
//! This module provides the main error type [`XdsmError`] which wraps
//! the error conditions that can occur while producing a diagram.

use std::io;

use thiserror::Error;

use crate::{build, figure};

/// The main error type for XDSM operations.
///
/// # Diagnostic Variants
///
/// The `Figure` variant carries the figure source next to the structured
/// error so that byte spans can be rendered as labelled source snippets.
#[derive(Debug, Error)]
pub enum XdsmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Figure { err: figure::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Build error: {0}")]
    Build(#[from] build::Error),
}

impl From<crate::export::Error> for XdsmError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl XdsmError {
    /// Create a new `Figure` error with the associated source text.
    pub fn new_figure_error(err: figure::Error, src: impl Into<String>) -> Self {
        Self::Figure {
            err,
            src: src.into(),
        }
    }
}
