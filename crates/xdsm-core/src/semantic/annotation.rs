//! External inputs and outputs attached to systems.

use serde::{Deserialize, Serialize};

use crate::{identifier::Id, semantic::Label};

/// Where an output annotation is drawn relative to the matrix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// In a leading column, on the system's row.
    #[default]
    Left,
    /// In a trailing row, under the system's column.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Data entering the system from outside the diagram, drawn above it.
    Input,
    /// Final values leaving the system.
    Output { side: Side },
}

/// An input or output annotation attached to a single system.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    system: Id,
    kind: AnnotationKind,
    label: Label,
}

impl Annotation {
    pub fn input(system: Id, label: Label) -> Self {
        Self {
            system,
            kind: AnnotationKind::Input,
            label,
        }
    }

    pub fn output(system: Id, label: Label, side: Side) -> Self {
        Self {
            system,
            kind: AnnotationKind::Output { side },
            label,
        }
    }

    pub fn system(&self) -> Id {
        self.system
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    /// Returns `true` if both annotations would occupy the same slot.
    pub(crate) fn same_slot(&self, other: &Annotation) -> bool {
        self.system == other.system && self.kind == other.kind
    }
}
