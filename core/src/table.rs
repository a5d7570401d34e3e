//! Sparse dynamic-programming table.
//!
//! The table only materializes cells present in a search space. Each cell
//! stores its minimal cost and the coordinates of the predecessor that
//! produced it; an origin cell points at itself. Backtracking is repeated
//! lookup, never a pointer graph.

use ahash::AHashMap;

use crate::space::SearchSpace;

/// One computed cell: cost plus the predecessor it came from.
#[derive(Debug, Clone, Copy)]
struct Cell {
    score: f64,
    prev: (i32, i32),
}

/// The cost model driving a [`SparseTable`].
///
/// Given read access to already-computed cells, returns the cost of `(x, y)`
/// together with the predecessor chosen for it. An origin cell (no
/// predecessor) returns its own coordinates; a cell with no reachable
/// predecessor returns `f64::INFINITY` and its own coordinates.
///
/// Implementations may only query cells with strictly smaller coordinates;
/// combined with the ascending `(y, x)` traversal of the search spaces this
/// keeps the computation a single forward pass.
pub trait ScoreFunction {
    fn score(&self, table: &SparseTable, x: i32, y: i32) -> (f64, i32, i32);
}

impl<F> ScoreFunction for F
where
    F: Fn(&SparseTable, i32, i32) -> (f64, i32, i32),
{
    fn score(&self, table: &SparseTable, x: i32, y: i32) -> (f64, i32, i32) {
        self(table, x, y)
    }
}

/// Sparse minimum-cost table over an arbitrary search space.
#[derive(Debug, Default)]
pub struct SparseTable {
    cells: AHashMap<(i32, i32), Cell>,
}

impl SparseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes every cell of `space` in traversal order.
    ///
    /// After this returns, every in-space cell holds a defined score;
    /// out-of-space cells stay undefined.
    pub fn solve(&mut self, space: &dyn SearchSpace, score: &dyn ScoreFunction) {
        for (x, y) in space.iter() {
            let (cost, px, py) = score.score(self, x, y);
            self.cells.insert(
                (x, y),
                Cell {
                    score: cost,
                    prev: (px, py),
                },
            );
        }
    }

    /// The score stored at `(x, y)`, or `None` when the cell was never
    /// computed. Score functions treat `None` as "move not allowed".
    pub fn get(&self, x: i32, y: i32) -> Option<f64> {
        self.cells.get(&(x, y)).map(|c| c.score)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Walks the optimal path backward from `(x, y)`.
    ///
    /// Yields `(x, y, score)` for every visited cell, the starting cell
    /// first, the origin (self-loop) last. Empty when `(x, y)` was never
    /// computed, which is how an unreachable terminal surfaces.
    pub fn backtrack_from(&self, x: i32, y: i32) -> Backtrack<'_> {
        Backtrack {
            table: self,
            next: Some((x, y)),
        }
    }
}

/// Iterator over the optimal path, terminal to origin.
pub struct Backtrack<'a> {
    table: &'a SparseTable,
    next: Option<(i32, i32)>,
}

impl Iterator for Backtrack<'_> {
    type Item = (i32, i32, f64);

    fn next(&mut self) -> Option<(i32, i32, f64)> {
        let (x, y) = self.next?;
        let cell = self.table.cells.get(&(x, y))?;
        self.next = if cell.prev == (x, y) {
            None
        } else {
            Some(cell.prev)
        };
        Some((x, y, cell.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::SetSearchSpace;

    /// Cheapest-path score over unit moves right/up, cost 1 per step.
    fn unit_step(table: &SparseTable, x: i32, y: i32) -> (f64, i32, i32) {
        if (x, y) == (0, 0) {
            return (0.0, x, y);
        }
        let mut best = f64::INFINITY;
        let mut prev = (x, y);
        for (px, py) in [(x - 1, y), (x, y - 1), (x - 1, y - 1)] {
            if let Some(s) = table.get(px, py) {
                if s + 1.0 < best {
                    best = s + 1.0;
                    prev = (px, py);
                }
            }
        }
        (best, prev.0, prev.1)
    }

    fn full_space(n: i32) -> SetSearchSpace {
        let mut space = SetSearchSpace::new(0, 0, n, n);
        for y in 0..=n {
            for x in 0..=n {
                space.add(x, y);
            }
        }
        space
    }

    #[test]
    fn solve_fills_every_in_space_cell() {
        let space = full_space(3);
        let mut table = SparseTable::new();
        table.solve(&space, &unit_step);
        assert_eq!(table.len(), 16);
        assert_eq!(table.get(3, 3), Some(3.0));
        assert_eq!(table.get(4, 4), None);
    }

    #[test]
    fn backtrack_follows_diagonal() {
        let space = full_space(2);
        let mut table = SparseTable::new();
        table.solve(&space, &unit_step);
        let path: Vec<_> = table.backtrack_from(2, 2).collect();
        assert_eq!(
            path,
            vec![(2, 2, 2.0), (1, 1, 1.0), (0, 0, 0.0)],
        );
    }

    #[test]
    fn backtrack_from_missing_terminal_is_empty() {
        let space = full_space(2);
        let mut table = SparseTable::new();
        table.solve(&space, &unit_step);
        assert_eq!(table.backtrack_from(5, 5).count(), 0);
    }

    #[test]
    fn backtrack_visits_at_most_table_len_cells() {
        let space = full_space(4);
        let mut table = SparseTable::new();
        table.solve(&space, &unit_step);
        assert!(table.backtrack_from(4, 4).count() <= table.len());
    }

    #[test]
    fn sparse_space_leaves_holes_undefined() {
        let mut space = SetSearchSpace::new(0, 0, 2, 2);
        space.add(0, 0);
        space.add(1, 1);
        space.add(2, 2);
        let mut table = SparseTable::new();
        table.solve(&space, &unit_step);
        assert_eq!(table.get(1, 0), None);
        assert_eq!(table.get(2, 2), Some(2.0));
    }
}
