//! Alignment beads and their reconstruction from a solved table.

/// One alignment unit: `source_len` consecutive source sentences matched to
/// `target_len` consecutive target sentences, with the cumulative path score
/// at the bead's upper-right cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bead {
    pub source_len: usize,
    pub target_len: usize,
    pub score: f64,
}

/// Folds a backtracking walk (terminal first, origin last) into beads
/// ordered from the origin to the terminal.
///
/// Each pair of successive visited cells contributes one bead sized by the
/// coordinate deltas; the final (self-looping) cell contributes none. An
/// empty walk yields an empty alignment.
pub fn collect_beads(walk: impl IntoIterator<Item = (i32, i32, f64)>) -> Vec<Bead> {
    let mut beads = Vec::new();
    let mut iter = walk.into_iter();

    let Some((mut x, mut y, mut score)) = iter.next() else {
        return beads;
    };

    for (nx, ny, nscore) in iter {
        beads.push(Bead {
            source_len: (x - nx) as usize,
            target_len: (y - ny) as usize,
            score,
        });
        x = nx;
        y = ny;
        score = nscore;
    }

    beads.reverse();
    beads
}
