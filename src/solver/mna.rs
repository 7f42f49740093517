//! MNA matrix assembly and the Gaussian-elimination solve.

use tracing::debug;

use crate::circuit::{Element, ElementId, ElementKind};

use super::model::norton_equivalent;
use super::topology::Topology;

/// Pivots with magnitude below this are treated as zero: the elimination
/// step is skipped and the corresponding unknown later resolves to zero.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// MNA system Ax = z, stored row-major.
///
/// Rows/columns `0..nodeCount−1` carry the non-ground node equations (node k
/// at index k − 1); one further row per battery enforces its terminal
/// voltage and introduces the branch current as an unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    a: Vec<f64>,
    /// Source vector z
    z: Vec<f64>,
    /// Matrix dimension
    size: usize,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            size,
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance between two node indices (`None` = ground):
    ///   A[n1,n1] += G, A[n2,n2] += G, A[n1,n2] −= G, A[n2,n1] −= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a current source of magnitude `current` flowing n1 → n2:
    /// the current leaves n1 and enters n2.
    pub fn stamp_current_source(&mut self, n1: Option<usize>, n2: Option<usize>, current: f64) {
        if let Some(i) = n1 {
            self.add_source(i, -current);
        }
        if let Some(j) = n2 {
            self.add_source(j, current);
        }
    }

    /// Stamp an ideal voltage source between two node indices with its
    /// branch-current unknown at `branch_row`, enforcing
    /// `V(n1) − V(n2) = voltage`. The branch unknown is the current through
    /// the source from n1 to n2.
    pub fn stamp_voltage_source(
        &mut self,
        n1: Option<usize>,
        n2: Option<usize>,
        branch_row: usize,
        voltage: f64,
    ) {
        if let Some(i) = n1 {
            self.add(branch_row, i, 1.0);
            self.add(i, branch_row, 1.0);
        }
        if let Some(j) = n2 {
            self.add(branch_row, j, -1.0);
            self.add(j, branch_row, -1.0);
        }
        self.add_source(branch_row, voltage);
    }

    /// Solve Ax = z by Gaussian elimination with partial pivoting, on
    /// private copies of A and z.
    ///
    /// This never fails: when the best remaining pivot in a column is below
    /// [`PIVOT_TOLERANCE`] the column is left uneliminated, and back
    /// substitution reports zero for any unknown whose final diagonal stays
    /// below tolerance. Singular or indeterminate sub-systems therefore
    /// resolve to zero instead of aborting the tick, keeping a degenerate
    /// or half-built circuit editable.
    pub fn solve(&self) -> Vec<f64> {
        let n = self.size;
        let mut a = self.a.clone();
        let mut z = self.z.clone();

        for k in 0..n {
            // Partial pivoting: largest magnitude in the remaining column.
            let mut max_row = k;
            let mut max_val = a[k * n + k].abs();
            for i in (k + 1)..n {
                let val = a[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    a.swap(k * n + j, max_row * n + j);
                }
                z.swap(k, max_row);
            }

            let pivot = a[k * n + k];
            if pivot.abs() < PIVOT_TOLERANCE {
                continue;
            }

            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                z[i] -= factor * z[k];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = z[i];
            for j in (i + 1)..n {
                sum -= a[i * n + j] * x[j];
            }
            let diag = a[i * n + i];
            x[i] = if diag.abs() < PIVOT_TOLERANCE {
                0.0
            } else {
                sum / diag
            };
        }
        x
    }
}

/// An assembled system plus the branch row of every battery, in element
/// order.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub matrix: MnaMatrix,
    /// (battery element, its branch-current row/column)
    pub source_rows: Vec<(ElementId, usize)>,
}

impl Assembly {
    /// The branch-current row of a battery element, if it has one.
    pub fn source_row(&self, id: ElementId) -> Option<usize> {
        self.source_rows
            .iter()
            .find(|(element, _)| *element == id)
            .map(|(_, row)| *row)
    }
}

/// Build the MNA system for the given elements and resolved topology.
///
/// Elements whose two terminals resolve to the same node contribute nothing.
/// The system dimension is `(nodeCount − 1) + batteryCount`; battery branch
/// rows follow the node rows in element order.
pub fn assemble(elements: &[Element], topology: &Topology, dt: f64) -> Assembly {
    let node_unknowns = topology.node_count().saturating_sub(1);
    let battery_count = elements.iter().filter(|e| e.is_voltage_source()).count();
    let size = node_unknowns + battery_count;

    let mut matrix = MnaMatrix::new(size);
    let mut source_rows = Vec::with_capacity(battery_count);
    let mut next_branch_row = node_unknowns;

    for element in elements {
        // Self-loop: both terminals on one node, nothing to stamp.
        if topology.node_of(element.p1.id) == topology.node_of(element.p2.id) {
            if let ElementKind::Battery { .. } = element.kind {
                // The branch row still exists so the unknown count stays
                // consistent; the row is left empty and the branch current
                // resolves to zero.
                let row = next_branch_row;
                next_branch_row += 1;
                source_rows.push((element.id, row));
            }
            continue;
        }

        let n1 = topology.unknown_index(element.p1.id);
        let n2 = topology.unknown_index(element.p2.id);

        match element.kind {
            ElementKind::Battery { voltage } => {
                let row = next_branch_row;
                next_branch_row += 1;
                matrix.stamp_voltage_source(n1, n2, row, voltage);
                source_rows.push((element.id, row));
            }
            _ => {
                // Non-battery elements always have a Norton form.
                if let Some(eq) = norton_equivalent(element, dt) {
                    matrix.stamp_conductance(n1, n2, eq.conductance);
                    if eq.source_current != 0.0 {
                        matrix.stamp_current_source(n1, n2, eq.source_current);
                    }
                }
            }
        }
    }

    debug_assert_eq!(next_branch_row, size);
    debug_assert_eq!(source_rows.len(), battery_count);
    debug!(
        nodes = topology.node_count(),
        batteries = battery_count,
        dimension = size,
        "assembled nodal system"
    );

    Assembly {
        matrix,
        source_rows,
    }
}
