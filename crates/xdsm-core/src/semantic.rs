//! Semantic model types for XDSM diagrams.
//!
//! This module provides the types that describe *what* an XDSM diagram
//! contains, independent of how it is typeset:
//!
//! - **Systems** ([`System`], [`SystemKind`]) - The blocks on the matrix diagonal
//! - **Edges** ([`Connection`], [`ProcessChain`], [`Edge`]) - Data flow and execution order
//! - **Annotations** ([`Annotation`], [`AnnotationKind`], [`Side`]) - External inputs and outputs
//! - **Diagram** ([`Diagram`]) - The ordered collection of all of the above
//!
//! A [`Diagram`] is built by a linear sequence of additions. Every addition is
//! checked against the systems declared so far, so a finished diagram never
//! references an unknown system.

mod annotation;
mod diagram;
mod edge;
mod label;
mod system;

pub use annotation::{Annotation, AnnotationKind, Side};
pub use diagram::{Diagram, DiagramError};
pub use edge::{Connection, Edge, EdgeKind, ProcessChain};
pub use label::Label;
pub use system::{System, SystemKind};
