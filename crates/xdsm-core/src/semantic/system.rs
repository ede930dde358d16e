//! Systems placed on the diagonal of the XDSM matrix.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{identifier::Id, semantic::Label};

/// Role palette for diagram blocks.
///
/// The kind only selects how a block is drawn; it carries no behavior. The
/// names match external configuration strings (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    /// Optimizer driving the design variables.
    Optimization,
    /// Solver or coordinator converging a multidisciplinary analysis.
    #[serde(alias = "solver")]
    Mda,
    /// Disciplinary analysis.
    Analysis,
    /// Objective or constraint function.
    Function,
    /// Surrogate model or grouped analysis.
    Metamodel,
}

impl SystemKind {
    /// All kinds, in the order their styles are declared.
    pub const ALL: [SystemKind; 5] = [
        SystemKind::Optimization,
        SystemKind::Mda,
        SystemKind::Analysis,
        SystemKind::Function,
        SystemKind::Metamodel,
    ];

    /// Returns the TikZ style name used to draw blocks of this kind.
    pub fn style_name(self) -> &'static str {
        match self {
            SystemKind::Optimization => "Optimization",
            SystemKind::Mda => "MDA",
            SystemKind::Analysis => "Analysis",
            SystemKind::Function => "Function",
            SystemKind::Metamodel => "Metamodel",
        }
    }
}

impl FromStr for SystemKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimization" => Ok(Self::Optimization),
            "mda" | "solver" => Ok(Self::Mda),
            "analysis" => Ok(Self::Analysis),
            "function" => Ok(Self::Function),
            "metamodel" => Ok(Self::Metamodel),
            _ => Err("Unsupported system kind"),
        }
    }
}

impl From<SystemKind> for &'static str {
    fn from(val: SystemKind) -> Self {
        match val {
            SystemKind::Optimization => "optimization",
            SystemKind::Mda => "mda",
            SystemKind::Analysis => "analysis",
            SystemKind::Function => "function",
            SystemKind::Metamodel => "metamodel",
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A named block of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    id: Id,
    kind: SystemKind,
    label: Label,
    stack: bool,
}

impl System {
    /// Create a new system.
    pub fn new(id: Id, kind: SystemKind, label: Label) -> Self {
        Self {
            id,
            kind,
            label,
            stack: false,
        }
    }

    /// Draw this system as a stack of blocks, for families of similar functions.
    pub fn stacked(mut self) -> Self {
        self.stack = true;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn is_stacked(&self) -> bool {
        self.stack
    }
}
