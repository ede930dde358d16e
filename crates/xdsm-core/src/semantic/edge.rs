//! Data connections and process chains.

use crate::{identifier::Id, semantic::Label};

/// Distinguishes execution-order edges from variable-flow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Variables flowing from source to target.
    Data,
    /// Execution order, drawn with an arrow head when `arrow` is set.
    Process { arrow: bool },
}

/// A single directed edge between two systems.
///
/// This is the flattened view over a diagram's [`Connection`]s and
/// [`ProcessChain`]s; see [`Diagram::edges`](crate::semantic::Diagram::edges).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    label: Label,
    kind: EdgeKind,
}

impl Edge {
    pub fn new(source: Id, target: Id, label: Label, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            label,
            kind,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_process(&self) -> bool {
        matches!(self.kind, EdgeKind::Process { .. })
    }
}

/// Data exchanged from one system to another.
///
/// Drawn as a block in the off-diagonal cell at the source's row and the
/// target's column.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    source: Id,
    target: Id,
    label: Label,
}

impl Connection {
    pub fn new(source: Id, target: Id, label: Label) -> Self {
        Self {
            source,
            target,
            label,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    /// Returns `true` if this connection links `source` to `target`.
    pub fn links(&self, source: Id, target: Id) -> bool {
        self.source == source && self.target == target
    }

    /// Converts this connection into a data [`Edge`].
    pub fn to_edge(&self) -> Edge {
        Edge::new(self.source, self.target, self.label.clone(), EdgeKind::Data)
    }
}

/// An execution path through a sequence of systems.
///
/// A chain usually starts at the optimizer and may close back into it. It
/// always holds at least two systems.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessChain {
    systems: Vec<Id>,
    arrow: bool,
}

impl ProcessChain {
    pub(crate) fn new(systems: Vec<Id>, arrow: bool) -> Self {
        debug_assert!(systems.len() >= 2, "process chain needs two systems");
        Self { systems, arrow }
    }

    /// The systems visited, in order.
    pub fn systems(&self) -> &[Id] {
        &self.systems
    }

    pub fn has_arrow(&self) -> bool {
        self.arrow
    }

    /// Expands the chain into consecutive process edges with empty labels.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let kind = EdgeKind::Process { arrow: self.arrow };
        self.systems
            .windows(2)
            .map(move |pair| Edge::new(pair[0], pair[1], Label::default(), kind))
    }
}
