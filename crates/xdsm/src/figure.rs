//! Declarative figure files.
//!
//! A figure is a TOML document describing one XDSM diagram. Tables are applied
//! in a fixed order (systems, processes, connections, inputs, outputs) and
//! entries within each table keep their order, so loading the same source
//! always yields the same [`Diagram`].
//!
//! An optional `[write]` table overrides the default [`WriteOptions`] for the
//! figure.
//!
//! ```toml
//! name = "mdf"
//!
//! [write]
//! cleanup = true
//! auto_launch = true
//!
//! [[system]]
//! id = "opt"
//! kind = "optimization"
//! label = ['0, 8 $\rightarrow$ 1:', "Optimizer"]
//!
//! [[system]]
//! id = "A"
//! kind = "analysis"
//! label = ["3:", "Aero."]
//!
//! [[process]]
//! systems = ["opt", "A", "opt"]
//!
//! [[connect]]
//! from = "opt"
//! to = "A"
//! label = '$S$, $A$'
//!
//! [[output]]
//! system = "opt"
//! label = '$S^*$, $A^*$'
//! side = "left"
//! ```

use std::{fmt, ops::Range};

use log::{debug, trace};
use serde::Deserialize;
use toml::Spanned;

use xdsm_core::semantic::{Diagram, DiagramError, Label, Side, SystemKind};

use crate::WriteOptions;

/// A figure loading failure, optionally pointing into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
    span: Option<Range<usize>>,
    help: Option<String>,
}

impl Error {
    pub fn new(message: impl Into<String>, span: Option<Range<usize>>) -> Self {
        Self {
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range of the offending value in the source.
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    fn from_diagram(err: DiagramError, span: Range<usize>) -> Self {
        let help = match &err {
            DiagramError::UnknownSystem(_) => {
                Some("declare the system in a [[system]] table before referring to it")
            }
            DiagramError::InvalidId(_) => Some("rename the system, e.g. `G_load`"),
            DiagramError::ProcessTooShort(_) => {
                Some("list at least a start and an end system")
            }
            DiagramError::DuplicateSystem(_) | DiagramError::SelfConnection(_) => None,
        };
        let error = Self::new(err.to_string(), Some(span));
        match help {
            Some(help) => error.with_help(help),
            None => error,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(err.message().to_string(), err.span())
    }
}

/// A loaded figure: the diagram plus the write settings it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    diagram: Diagram,
    write: WriteSection,
}

impl Figure {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    /// Default [`WriteOptions`] with the figure's `[write]` settings applied.
    pub fn write_options(&self) -> WriteOptions {
        let mut options = WriteOptions::default();
        if let Some(build) = self.write.build {
            options = options.with_build(build);
        }
        if let Some(cleanup) = self.write.cleanup {
            options = options.with_cleanup(cleanup);
        }
        if let Some(auto_launch) = self.write.auto_launch {
            options = options.with_auto_launch(auto_launch);
        }
        options
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct WriteSection {
    build: Option<bool>,
    cleanup: Option<bool>,
    auto_launch: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FigureDocument {
    name: String,
    #[serde(default)]
    write: WriteSection,
    #[serde(default, rename = "system")]
    systems: Vec<SystemEntry>,
    #[serde(default, rename = "process")]
    processes: Vec<ProcessEntry>,
    #[serde(default, rename = "connect")]
    connections: Vec<ConnectEntry>,
    #[serde(default, rename = "input")]
    inputs: Vec<InputEntry>,
    #[serde(default, rename = "output")]
    outputs: Vec<OutputEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SystemEntry {
    id: Spanned<String>,
    kind: SystemKind,
    label: Label,
    #[serde(default)]
    stack: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessEntry {
    systems: Spanned<Vec<Spanned<String>>>,
    #[serde(default = "default_arrow")]
    arrow: bool,
}

fn default_arrow() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectEntry {
    from: Spanned<String>,
    to: Spanned<String>,
    label: Label,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputEntry {
    system: Spanned<String>,
    label: Label,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputEntry {
    system: Spanned<String>,
    label: Label,
    #[serde(default)]
    side: Side,
}

/// Parse a figure document into a [`Diagram`], ignoring its `[write]` table.
///
/// # Errors
///
/// Same as [`load`].
pub fn parse(source: &str) -> Result<Diagram, Error> {
    load(source).map(Figure::into_diagram)
}

/// Load a figure document with its write settings.
///
/// # Errors
///
/// Returns an [`Error`] for TOML syntax errors, unknown keys, unknown system
/// kinds and any inconsistency rejected by [`Diagram`], such as a connection
/// to an undeclared system. The error span points at the offending value.
pub fn load(source: &str) -> Result<Figure, Error> {
    let document: FigureDocument = toml::from_str(source)?;
    trace!(document:?; "Parsed figure document");

    let mut diagram = Diagram::new(document.name);

    for entry in &document.systems {
        let id = entry.id.get_ref();
        let result = if entry.stack {
            diagram.add_stacked_system(id, entry.kind, entry.label.clone())
        } else {
            diagram.add_system(id, entry.kind, entry.label.clone())
        };
        result.map_err(|err| Error::from_diagram(err, entry.id.span()))?;
    }

    for entry in &document.processes {
        let names = entry.systems.get_ref();
        diagram
            .add_process(names.iter().map(Spanned::get_ref), entry.arrow)
            .map_err(|err| {
                let span = match &err {
                    DiagramError::UnknownSystem(name) => names
                        .iter()
                        .find(|n| n.get_ref() == name)
                        .map(Spanned::span),
                    _ => None,
                };
                Error::from_diagram(err, span.unwrap_or_else(|| entry.systems.span()))
            })?;
    }

    for entry in &document.connections {
        diagram
            .connect(entry.from.get_ref(), entry.to.get_ref(), entry.label.clone())
            .map_err(|err| {
                let span = match &err {
                    DiagramError::UnknownSystem(name) if name == entry.from.get_ref() => {
                        entry.from.span()
                    }
                    _ => entry.to.span(),
                };
                Error::from_diagram(err, span)
            })?;
    }

    for entry in &document.inputs {
        diagram
            .add_input(entry.system.get_ref(), entry.label.clone())
            .map_err(|err| Error::from_diagram(err, entry.system.span()))?;
    }

    for entry in &document.outputs {
        diagram
            .add_output(entry.system.get_ref(), entry.label.clone(), entry.side)
            .map_err(|err| Error::from_diagram(err, entry.system.span()))?;
    }

    debug!(
        name = diagram.name(),
        systems = diagram.systems().count(),
        connections = diagram.connections().len();
        "Figure loaded"
    );

    Ok(Figure {
        diagram,
        write: document.write,
    })
}
