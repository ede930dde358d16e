//! XDSM matrix structure.
//!
//! This module arranges a semantic [`Diagram`] on the XDSM grid. Placement is
//! fixed by convention rather than computed:
//!
//! - systems sit on the diagonal in declaration order;
//! - a connection from `s` to `t` sits in row of `s`, column of `t`;
//! - inputs occupy an extra leading row above their system;
//! - left outputs occupy an extra leading column on their system's row;
//! - right outputs occupy an extra trailing row under their system.
//!
//! The resulting [`Matrix`] also carries the data lines and process chains
//! expressed in terms of grid node names, ready for export.

use log::{debug, trace};

use xdsm_core::semantic::{AnnotationKind, Diagram, Label, Side};

/// TikZ style of off-diagonal connection blocks.
pub(crate) const DATA_INTER_STYLE: &str = "DataInter";
/// TikZ style of input and output blocks.
pub(crate) const DATA_IO_STYLE: &str = "DataIO";

/// A filled grid cell: a named TikZ node with a style and a label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    name: String,
    style: String,
    label: Label,
}

impl Cell {
    fn new(name: String, style: impl Into<String>, label: Label) -> Self {
        Self {
            name,
            style: style.into(),
            label,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

/// A data line drawn between two grid nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataLine {
    from: String,
    to: String,
}

impl DataLine {
    fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn start(&self) -> &str {
        &self.from
    }

    pub fn end(&self) -> &str {
        &self.to
    }
}

/// A process chain over grid node names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chain {
    nodes: Vec<String>,
    arrow: bool,
}

impl Chain {
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn has_arrow(&self) -> bool {
        self.arrow
    }
}

/// The laid-out XDSM grid of a diagram.
#[derive(Debug, Clone)]
pub(crate) struct Matrix {
    size: usize,
    cells: Vec<Option<Cell>>,
    horizontal: Vec<DataLine>,
    vertical: Vec<DataLine>,
    chains: Vec<Chain>,
}

impl Matrix {
    /// Arrange `diagram` on the XDSM grid.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let annotations = diagram.annotations();
        let has_inputs = annotations
            .iter()
            .any(|a| a.kind() == AnnotationKind::Input);
        let has_left = annotations
            .iter()
            .any(|a| a.kind() == AnnotationKind::Output { side: Side::Left });
        let has_right = annotations
            .iter()
            .any(|a| a.kind() == AnnotationKind::Output { side: Side::Right });

        let systems = diagram.systems().count();
        let row_offset = usize::from(has_inputs);
        let col_offset = usize::from(has_left);
        let size = systems + row_offset + col_offset + usize::from(has_right);

        let mut matrix = Self {
            size,
            cells: vec![None; size * size],
            horizontal: Vec::new(),
            vertical: Vec::new(),
            chains: Vec::new(),
        };

        // Positions are looked up through the diagram; every id it hands out
        // belongs to a declared system.
        let row_of = |id| diagram.position(id).map(|pos| pos + row_offset);
        let col_of = |id| diagram.position(id).map(|pos| pos + col_offset);

        for (pos, system) in diagram.systems().enumerate() {
            let mut style = system.kind().style_name().to_string();
            if system.is_stacked() {
                style.push_str(",stack");
            }
            matrix.set(
                pos + row_offset,
                pos + col_offset,
                Cell::new(system.id().to_string(), style, system.label().clone()),
            );
        }

        for connection in diagram.connections() {
            let (Some(row), Some(col)) = (row_of(connection.source()), col_of(connection.target()))
            else {
                continue;
            };
            let source = connection.source().to_string();
            let target = connection.target().to_string();
            let name = format!("{source}-{target}");

            matrix.set(
                row,
                col,
                Cell::new(name.clone(), DATA_INTER_STYLE, connection.label().clone()),
            );
            matrix.horizontal.push(DataLine::new(source, name.clone()));
            matrix.vertical.push(DataLine::new(name, target));
        }

        for annotation in annotations {
            let system = annotation.system();
            let (Some(row), Some(col)) = (row_of(system), col_of(system)) else {
                continue;
            };
            let system = system.to_string();
            let label = annotation.label().clone();

            match annotation.kind() {
                AnnotationKind::Input => {
                    let name = format!("input_{system}");
                    matrix.set(0, col, Cell::new(name.clone(), DATA_IO_STYLE, label));
                    matrix.vertical.push(DataLine::new(name, system));
                }
                AnnotationKind::Output { side: Side::Left } => {
                    let name = format!("left_output_{system}");
                    matrix.set(row, 0, Cell::new(name.clone(), DATA_IO_STYLE, label));
                    matrix.horizontal.push(DataLine::new(name, system));
                }
                AnnotationKind::Output { side: Side::Right } => {
                    let name = format!("right_output_{system}");
                    matrix.set(size - 1, col, Cell::new(name.clone(), DATA_IO_STYLE, label));
                    matrix.vertical.push(DataLine::new(name, system));
                }
            }
        }

        matrix.chains = diagram
            .processes()
            .iter()
            .map(|process| Chain {
                nodes: process.systems().iter().map(ToString::to_string).collect(),
                arrow: process.has_arrow(),
            })
            .collect();

        debug!(size, chains = matrix.chains.len(); "Matrix built");
        trace!(matrix:?; "Matrix layout");

        matrix
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row * self.size + col)?.as_ref()
    }

    /// Iterate over rows, each a slice of `size` optional cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        // `max(1)` keeps `chunks` valid for an empty diagram, which has no cells.
        self.cells.chunks(self.size.max(1))
    }

    pub fn horizontal_lines(&self) -> &[DataLine] {
        &self.horizontal
    }

    pub fn vertical_lines(&self) -> &[DataLine] {
        &self.vertical
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = row * self.size + col;
        self.cells[index] = Some(cell);
    }
}
