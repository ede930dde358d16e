//! The root diagram type and its construction rules.

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::{
    identifier::Id,
    semantic::{
        Annotation, Connection, Edge, Label, ProcessChain, Side, System, SystemKind,
    },
};

/// Errors raised when a diagram is assembled inconsistently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("system `{0}` is already defined")]
    DuplicateSystem(String),

    #[error("unknown system `{0}`")]
    UnknownSystem(String),

    #[error("invalid system id `{0}`: only ASCII letters, digits and underscores are allowed")]
    InvalidId(String),

    #[error("system `{0}` cannot be connected to itself")]
    SelfConnection(String),

    #[error("a process chain needs at least two systems, got {0}")]
    ProcessTooShort(usize),
}

/// An XDSM diagram: systems, process chains, data connections and annotations.
///
/// Systems keep their declaration order, which is also their position on the
/// matrix diagonal. Every other element refers to systems by [`Id`] and is
/// rejected if the system has not been added yet.
///
/// # Examples
///
/// ```
/// use xdsm_core::semantic::{Diagram, Side, SystemKind};
///
/// let mut diagram = Diagram::new("mdf");
/// diagram.add_system("opt", SystemKind::Optimization, [r"0, 8 $\rightarrow$ 1:", "Optimizer"])?;
/// diagram.add_system("A", SystemKind::Analysis, ["3:", "Aero."])?;
/// diagram.add_process(["opt", "A", "opt"], true)?;
/// diagram.connect("opt", "A", r"$S$, $A$")?;
/// diagram.add_output("opt", r"$S^*$, $A^*$", Side::Left)?;
///
/// assert_eq!(diagram.systems().count(), 2);
/// assert_eq!(diagram.edges().count(), 3);
/// # Ok::<(), xdsm_core::semantic::DiagramError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Diagram {
    name: String,
    systems: IndexMap<Id, System>,
    processes: Vec<ProcessChain>,
    connections: Vec<Connection>,
    annotations: Vec<Annotation>,
}

/// Equality includes the diagonal order of the systems.
impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.systems.iter().eq(other.systems.iter())
            && self.processes == other.processes
            && self.connections == other.connections
            && self.annotations == other.annotations
    }
}

impl Diagram {
    /// Create an empty diagram; `name` is the base name of the written files.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            systems: IndexMap::new(),
            processes: Vec::new(),
            connections: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a system at the next diagonal position.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::InvalidId`] if `id` is not a valid node name and
    /// [`DiagramError::DuplicateSystem`] if it is already taken.
    pub fn add_system(
        &mut self,
        id: &str,
        kind: SystemKind,
        label: impl Into<Label>,
    ) -> Result<Id, DiagramError> {
        let id = self.new_system_id(id)?;
        self.systems.insert(id, System::new(id, kind, label.into()));
        Ok(id)
    }

    /// Add a system drawn as a stack of blocks.
    ///
    /// # Errors
    ///
    /// Same as [`Diagram::add_system`].
    pub fn add_stacked_system(
        &mut self,
        id: &str,
        kind: SystemKind,
        label: impl Into<Label>,
    ) -> Result<Id, DiagramError> {
        let id = self.new_system_id(id)?;
        self.systems
            .insert(id, System::new(id, kind, label.into()).stacked());
        Ok(id)
    }

    /// Add an execution path through `systems`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::ProcessTooShort`] for fewer than two systems and
    /// [`DiagramError::UnknownSystem`] for any undeclared system.
    pub fn add_process<I, S>(&mut self, systems: I, arrow: bool) -> Result<(), DiagramError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = systems
            .into_iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if ids.len() < 2 {
            return Err(DiagramError::ProcessTooShort(ids.len()));
        }

        self.processes.push(ProcessChain::new(ids, arrow));
        Ok(())
    }

    /// Connect `source` to `target` with the variables in `label`.
    ///
    /// Connecting the same pair again replaces the earlier label, since both
    /// would occupy the same matrix cell.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownSystem`] for undeclared endpoints and
    /// [`DiagramError::SelfConnection`] if both endpoints are the same system.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        label: impl Into<Label>,
    ) -> Result<(), DiagramError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        if source == target {
            return Err(DiagramError::SelfConnection(source.to_string()));
        }

        let label = label.into();
        if let Some(existing) = self
            .connections
            .iter_mut()
            .find(|conn| conn.links(source, target))
        {
            debug!(source:% = source, target:% = target; "Replacing existing connection label");
            existing.set_label(label);
        } else {
            self.connections
                .push(Connection::new(source, target, label));
        }

        Ok(())
    }

    /// Attach an external input to `system`, replacing any earlier input.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownSystem`] for an undeclared system.
    pub fn add_input(&mut self, system: &str, label: impl Into<Label>) -> Result<(), DiagramError> {
        let system = self.resolve(system)?;
        self.push_annotation(Annotation::input(system, label.into()));
        Ok(())
    }

    /// Attach an output to `system` on `side`, replacing any earlier output on that side.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownSystem`] for an undeclared system.
    pub fn add_output(
        &mut self,
        system: &str,
        label: impl Into<Label>,
        side: Side,
    ) -> Result<(), DiagramError> {
        let system = self.resolve(system)?;
        self.push_annotation(Annotation::output(system, label.into(), side));
        Ok(())
    }

    /// Iterate over systems in diagonal order.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.values()
    }

    /// Look up a system by id.
    pub fn system(&self, id: Id) -> Option<&System> {
        self.systems.get(&id)
    }

    /// Diagonal position of a system.
    pub fn position(&self, id: Id) -> Option<usize> {
        self.systems.get_index_of(&id)
    }

    pub fn processes(&self) -> &[ProcessChain] {
        &self.processes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// All edges: process edges in chain order, followed by data edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.processes
            .iter()
            .flat_map(ProcessChain::edges)
            .chain(self.connections.iter().map(Connection::to_edge))
    }

    fn new_system_id(&self, name: &str) -> Result<Id, DiagramError> {
        if !Id::is_valid_name(name) {
            return Err(DiagramError::InvalidId(name.to_string()));
        }
        let id = Id::new(name);
        if self.systems.contains_key(&id) {
            return Err(DiagramError::DuplicateSystem(name.to_string()));
        }
        Ok(id)
    }

    fn resolve(&self, name: &str) -> Result<Id, DiagramError> {
        let id = Id::new(name);
        if self.systems.contains_key(&id) {
            Ok(id)
        } else {
            Err(DiagramError::UnknownSystem(name.to_string()))
        }
    }

    fn push_annotation(&mut self, annotation: Annotation) {
        if let Some(existing) = self
            .annotations
            .iter_mut()
            .find(|a| a.same_slot(&annotation))
        {
            debug!(system:% = annotation.system(); "Replacing existing annotation");
            existing.set_label(annotation.label().clone());
        } else {
            self.annotations.push(annotation);
        }
    }
}
