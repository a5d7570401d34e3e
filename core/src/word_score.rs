//! Word-level score for the cognate path.
//!
//! The word grid holds one cell per (target word position, source word
//! position) cognate hit. The score of a cell is the cheapest way of
//! reaching it from earlier hits: each transition pays the absolute
//! deviation of its step from the texts' global aspect ratio, plus a
//! surcharge for every additional source row the search had to reach back
//! through ("returns").

use std::collections::BTreeSet;

use crate::space::{RowMapSearchSpace, SearchSpace};
use crate::table::{ScoreFunction, SparseTable};

#[derive(Debug)]
pub struct WordPathScore<'a> {
    space: &'a RowMapSearchSpace,
    return_count: usize,
    return_cost: f64,
    /// Target words per source word: the slope of the perfect diagonal in
    /// the word grid.
    slope: f64,
}

impl<'a> WordPathScore<'a> {
    pub fn new(space: &'a RowMapSearchSpace, return_count: usize, return_cost: f64) -> Self {
        let b = space.bounds();
        let dx = (b.x_up - b.x_lo) as f64;
        let dy = (b.y_up - b.y_lo) as f64;
        let slope = if dy > 0.0 { dx / dy } else { 0.0 };
        Self {
            space,
            return_count,
            return_cost,
            slope,
        }
    }

    fn deviation(&self, dx: f64, dy: f64) -> f64 {
        (dx - self.slope * dy).abs()
    }

    fn scan_row(
        &self,
        table: &SparseTable,
        x: i32,
        y: i32,
        row: i32,
        cols: &BTreeSet<i32>,
        rows_used: &mut usize,
        best: &mut f64,
        prev: &mut (i32, i32),
    ) {
        let mut row_counted = false;
        for &cx in cols.range(..=x) {
            let Some(prev_score) = table.get(cx, row) else {
                continue;
            };
            if !row_counted {
                row_counted = true;
                *rows_used += 1;
            }
            let cost = prev_score
                + self.deviation((x - cx) as f64, (y - row) as f64)
                + (*rows_used as f64 - 1.0) * self.return_cost;
            if cost < *best {
                *best = cost;
                *prev = (cx, row);
            }
        }
    }
}

impl ScoreFunction for WordPathScore<'_> {
    fn score(&self, table: &SparseTable, x: i32, y: i32) -> (f64, i32, i32) {
        let mut best = f64::INFINITY;
        let mut prev = (x, y);
        let mut rows_used = 0usize;

        // Rows strictly below the current source row, nearest first; the
        // k-th row that contributes a candidate pays (k - 1) returns.
        for (row, cols) in self.space.rows_below(y) {
            if rows_used > self.return_count {
                break;
            }
            self.scan_row(table, x, y, row, cols, &mut rows_used, &mut best, &mut prev);
        }

        if rows_used == 0 {
            // No earlier hit reachable: the cell is an origin, priced by its
            // own distance to the diagonal.
            best = if y != 0 {
                self.deviation(x as f64, y as f64)
            } else {
                x as f64 * self.slope
            };
            prev = (x, y);
        }

        (best, prev.0, prev.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::SearchSpace;

    fn space_with(cells: &[(i32, i32)], x_up: i32, y_up: i32) -> RowMapSearchSpace {
        let mut s = RowMapSearchSpace::new(0, 0, x_up, y_up);
        for &(x, y) in cells {
            assert!(s.add(x, y));
        }
        s
    }

    #[test]
    fn origin_cell_pays_distance_to_diagonal() {
        // 11x11 grid, slope 1.
        let space = space_with(&[(0, 0), (3, 1), (10, 10)], 10, 10);
        let score = WordPathScore::new(&space, 2, 5.0);
        let table = SparseTable::new();

        let (cost, px, py) = score.score(&table, 3, 1);
        assert!((cost - 2.0).abs() < 1e-12); // |3 - 1*1| = 2
        assert_eq!((px, py), (3, 1));
    }

    #[test]
    fn first_row_of_predecessors_costs_no_return() {
        let space = space_with(&[(0, 0), (1, 1), (2, 2)], 10, 10);
        let score = WordPathScore::new(&space, 2, 5.0);
        let mut table = SparseTable::new();
        table.solve(&space, &score);

        // (1,1) reaches back to (0,0): step (1,1) sits on the diagonal.
        assert_eq!(table.get(1, 1), Some(0.0));
        assert_eq!(table.get(2, 2), Some(0.0));
    }

    #[test]
    fn reaching_past_a_row_costs_returns() {
        // Two candidate predecessors on different rows; the nearer row is a
        // poor fit, the farther one perfect, but it pays one return.
        let space = space_with(&[(0, 0), (2, 1), (2, 2)], 10, 10);
        let score = WordPathScore::new(&space, 5, 0.5);
        let mut table = SparseTable::new();
        table.solve(&space, &score);

        // slope = 1. At (2,2): via (2,1) dev |0 - 1| = 1 on top of that
        // cell's own cost 1; via (0,0) dev |2 - 2| = 0 plus one return.
        let (cost, px, py) = score.score(&table, 2, 2);
        assert_eq!((px, py), (0, 0));
        assert!((cost - 0.5).abs() < 1e-9);
    }

    #[test]
    fn return_budget_limits_lookback() {
        // With return_count = 0 only the nearest contributing row may be
        // used, even if a farther row would be cheaper.
        let space = space_with(&[(0, 0), (2, 1), (2, 2)], 10, 10);
        let score = WordPathScore::new(&space, 0, 0.5);
        let mut table = SparseTable::new();
        table.solve(&space, &score);

        let (cost, px, py) = score.score(&table, 2, 2);
        assert_eq!((px, py), (2, 1));
        assert!((cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn predecessors_right_of_current_column_are_ignored() {
        let space = space_with(&[(5, 0), (2, 1)], 10, 10);
        let score = WordPathScore::new(&space, 2, 5.0);
        let mut table = SparseTable::new();
        table.solve(&space, &score);

        // (5,0) is to the right of column 2, so (2,1) has no predecessor.
        let (_, px, py) = score.score(&table, 2, 1);
        assert_eq!((px, py), (2, 1));
    }
}
