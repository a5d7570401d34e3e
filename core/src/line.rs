//! Integer-grid line rasterization (midpoint algorithm).
//!
//! Search-space fillers draw the skeleton of the alignment path as straight
//! segments between passage points; this module turns one such segment into
//! the ordered set of lattice cells it crosses.

/// Rasterizes the straight segment between two integer endpoints.
///
/// Yields the classical Bresenham point set, endpoints inclusive, ordered
/// from `(x0, y0)` toward `(x1, y1)`. Coincident endpoints yield nothing.
///
/// State is O(1); the full walk is O(max(|dx|, |dy|)).
#[derive(Debug, Clone)]
pub struct DiscreteLine {
    x: i32,
    y: i32,
    /// True when x is the driving axis (|dx| > |dy|).
    x_drives: bool,
    step_main: i32,
    step_side: i32,
    main_end: i32,
    decision: i32,
    incr_straight: i32,
    incr_diagonal: i32,
    first: bool,
}

impl DiscreteLine {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        if dx > dy {
            Self {
                x: x0,
                y: y0,
                x_drives: true,
                step_main: if x1 > x0 { 1 } else { -1 },
                step_side: if y1 > y0 { 1 } else { -1 },
                main_end: x1,
                decision: 2 * dy - dx,
                incr_straight: 2 * dy,
                incr_diagonal: 2 * (dy - dx),
                first: true,
            }
        } else {
            Self {
                x: x0,
                y: y0,
                x_drives: false,
                step_main: if y1 > y0 { 1 } else { -1 },
                step_side: if x1 > x0 { 1 } else { -1 },
                main_end: y1,
                decision: 2 * dx - dy,
                incr_straight: 2 * dx,
                incr_diagonal: 2 * (dx - dy),
                first: true,
            }
        }
    }
}

impl Iterator for DiscreteLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        let main = if self.x_drives { self.x } else { self.y };

        // The driving coordinate has reached the far endpoint (or the segment
        // was empty to begin with).
        if (self.main_end - main) * self.step_main <= 0 {
            return None;
        }

        if self.first {
            self.first = false;
        } else {
            if self.decision <= 0 {
                self.decision += self.incr_straight;
            } else {
                self.decision += self.incr_diagonal;
                if self.x_drives {
                    self.y += self.step_side;
                } else {
                    self.x += self.step_side;
                }
            }

            if self.x_drives {
                self.x += self.step_main;
            } else {
                self.y += self.step_main;
            }
        }

        Some((self.x, self.y))
    }
}
