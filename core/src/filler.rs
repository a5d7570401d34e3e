//! Search-space construction for the sentence table.
//!
//! A filler decides which sentence cells the outer table may visit. The
//! simple variant draws a constant-width beam along the grid diagonal; the
//! cognate variant first aligns word-level cognate hits with an inner sparse
//! pass and threads the beam through the passage points that path projects
//! onto the sentence grid.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cognate::PassageValidator;
use crate::line::DiscreteLine;
use crate::space::{RowMapSearchSpace, SearchSpace};
use crate::table::SparseTable;
use crate::text::{Text, WordId};
use crate::word_score::WordPathScore;

/// Marks the admissible cells around one point of the alignment path.
pub trait BeamMarker {
    fn mark(&self, space: &mut dyn SearchSpace, x: i32, y: i32);
}

/// Fixed-radius vertical beam: every `(x, y')` with
/// `y' ∈ [y - r + 1, y + r - 1]`, clipped to the space's rectangle.
#[derive(Debug, Clone, Copy)]
pub struct ConstantBeamMarker {
    radius: i32,
}

impl ConstantBeamMarker {
    pub fn new(radius: usize) -> Self {
        Self {
            radius: (radius.max(1)) as i32,
        }
    }
}

impl BeamMarker for ConstantBeamMarker {
    fn mark(&self, space: &mut dyn SearchSpace, x: i32, y: i32) {
        for yy in (y - self.radius + 1)..=(y + self.radius - 1) {
            space.add(x, yy);
        }
    }
}

/// Rasterizes an ordered chain of passage points into a search space.
///
/// Points are kept sorted by `(x, y)` and deduplicated; each consecutive
/// pair is drawn with [`DiscreteLine`] and the marker is invoked at every
/// lattice point, shared endpoints only once.
pub struct PassageFiller<'a> {
    marker: &'a dyn BeamMarker,
    points: BTreeSet<(i32, i32)>,
}

impl<'a> PassageFiller<'a> {
    pub fn new(marker: &'a dyn BeamMarker) -> Self {
        Self {
            marker,
            points: BTreeSet::new(),
        }
    }

    pub fn add_passage_point(&mut self, x: i32, y: i32) {
        self.points.insert((x, y));
    }

    pub fn passage_point_count(&self) -> usize {
        self.points.len()
    }

    pub fn fill(&self, space: &mut dyn SearchSpace) {
        let mut iter = self.points.iter();
        let Some(&(mut px, mut py)) = iter.next() else {
            return;
        };

        self.marker.mark(space, px, py);

        for &(nx, ny) in iter {
            let mut line = DiscreteLine::new(px, py, nx, ny);
            // The segment's first lattice point was marked as the previous
            // segment's last.
            line.next();
            for (x, y) in line {
                self.marker.mark(space, x, y);
            }
            px = nx;
            py = ny;
        }
    }
}

/// Diagonal-band filler: passage points at the two grid corners only.
pub struct BeamFiller<'a> {
    marker: &'a dyn BeamMarker,
}

impl<'a> BeamFiller<'a> {
    pub fn new(marker: &'a dyn BeamMarker) -> Self {
        Self { marker }
    }

    pub fn fill(&self, space: &mut dyn SearchSpace) {
        let b = space.bounds();
        let mut filler = PassageFiller::new(self.marker);
        filler.add_passage_point(b.x_lo, b.y_lo);
        filler.add_passage_point(b.x_up, b.y_up);
        filler.fill(space);
    }
}

/// Cognate-guided filler.
///
/// Builds a word-level search space over `(target word, source word)`
/// cognate hits, solves the word path, projects the optimal path onto
/// sentence coordinates and beams through those passage points (plus the
/// sentence-grid corners, so the terminal is always reachable).
pub struct CognateFiller<'a> {
    source: &'a Text,
    target: &'a Text,
    marker: &'a dyn BeamMarker,
    return_count: usize,
    return_cost: f64,
    /// Band half-width in sentences around the scaled diagonal; 0 disables
    /// the restriction.
    word_radius: usize,
    max_frequency: usize,
}

impl<'a> CognateFiller<'a> {
    pub fn new(
        source: &'a Text,
        target: &'a Text,
        marker: &'a dyn BeamMarker,
        return_count: usize,
        return_cost: f64,
        word_radius: usize,
        max_frequency: usize,
    ) -> Self {
        Self {
            source,
            target,
            marker,
            return_count,
            return_cost,
            word_radius,
            max_frequency,
        }
    }

    pub fn fill(&self, space: &mut dyn SearchSpace) {
        let source_words = self.source.word_count();
        let target_words = self.target.word_count();

        let mut word_space = RowMapSearchSpace::new(
            0,
            0,
            target_words as i32 - 1,
            source_words as i32 - 1,
        );
        let wb = word_space.bounds();
        // Both corners: the lower one seeds the recurrence, the upper one
        // makes the path traceable.
        word_space.add(wb.x_lo, wb.y_lo);
        word_space.add(wb.x_up, wb.y_up);
        self.populate_word_space(&mut word_space);
        debug!(cells = word_space.len(), "word-level search space built");

        let word_score = WordPathScore::new(&word_space, self.return_count, self.return_cost);
        let mut word_table = SparseTable::new();
        word_table.solve(&word_space, &word_score);

        let b = space.bounds();
        let mut filler = PassageFiller::new(self.marker);
        filler.add_passage_point(b.x_lo, b.y_lo);
        filler.add_passage_point(b.x_up, b.y_up);

        for (x, y, _) in word_table.backtrack_from(wb.x_up, wb.y_up) {
            filler.add_passage_point(
                self.source.sentence_of_word(y as usize) as i32,
                self.target.sentence_of_word(x as usize) as i32,
            );
        }
        debug!(
            passage_points = filler.passage_point_count(),
            "rasterizing passage points"
        );

        filler.fill(space);
    }

    /// Adds one word-grid cell per (source position, synonym occurrence)
    /// pair, optionally band-limited around the scaled diagonal.
    fn populate_word_space(&self, word_space: &mut RowMapSearchSpace) {
        let source_words = self.source.word_count();
        let target_words = self.target.word_count();
        if source_words == 0 || target_words == 0 {
            return;
        }

        let validator = PassageValidator::new(self.max_frequency);
        let source_dict = self.source.dictionary();
        let target_dict = self.target.dictionary();

        // Index the source positions of every synonym target.
        let mut positions: ahash::AHashMap<WordId, Vec<usize>> = ahash::AHashMap::new();
        for i in 0..source_words {
            let info = source_dict.word(self.source.word(i));
            if !validator.accept(info, target_dict) {
                continue;
            }
            for synonym in info.synonyms() {
                positions.entry(synonym).or_default().push(i);
            }
        }

        // Source words per target word: projects a target position onto its
        // expected source position.
        let slope = source_words as f64 / target_words as f64;

        for j in 0..target_words {
            let Some(hits) = positions.get(&self.target.word(j)) else {
                continue;
            };

            let (min, max) = if self.word_radius == 0 {
                (0, source_words)
            } else {
                let projected =
                    ((slope * j as f64) as usize).min(source_words - 1);
                let at = self.source.sentence_of_word(projected);
                let low = at.saturating_sub(self.word_radius);
                let high = (at + self.word_radius).min(self.source.sentence_count() - 1);
                let (band_begin, _) = self.source.sentence_bounds(low);
                let (_, band_end) = self.source.sentence_bounds(high);
                (band_begin, band_end)
            };

            for &i in hits {
                if i >= min && i < max {
                    word_space.add(j as i32, i as i32);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cognate::{find_identity_cognates, CognateValidator};
    use crate::space::SetSearchSpace;

    #[test]
    fn beam_marker_clips_to_bounds() {
        let mut space = SetSearchSpace::new(-1, -1, 5, 5);
        ConstantBeamMarker::new(3).mark(&mut space, 0, 0);
        let cells: Vec<_> = space.iter().collect();
        assert_eq!(cells, vec![(0, -1), (0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn beam_marker_radius_has_a_floor_of_one() {
        let mut space = SetSearchSpace::new(0, 0, 5, 5);
        ConstantBeamMarker::new(0).mark(&mut space, 2, 2);
        assert_eq!(space.iter().collect::<Vec<_>>(), vec![(2, 2)]);
    }

    #[test]
    fn beam_filler_connects_the_corners() {
        let mut space = SetSearchSpace::new(-1, -1, 4, 4);
        let marker = ConstantBeamMarker::new(1);
        BeamFiller::new(&marker).fill(&mut space);
        // Radius 1 degenerates to the rasterized diagonal itself.
        let cells: Vec<_> = space.iter().collect();
        assert_eq!(
            cells,
            vec![(-1, -1), (0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]
        );
    }

    #[test]
    fn passage_points_are_deduplicated_and_sorted() {
        let marker = ConstantBeamMarker::new(1);
        let mut filler = PassageFiller::new(&marker);
        filler.add_passage_point(3, 3);
        filler.add_passage_point(0, 0);
        filler.add_passage_point(3, 3);
        assert_eq!(filler.passage_point_count(), 2);

        let mut space = SetSearchSpace::new(0, 0, 3, 3);
        filler.fill(&mut space);
        assert!(space.contains(0, 0));
        assert!(space.contains(3, 3));
        assert_eq!(space.len(), 4);
    }

    #[test]
    fn empty_passage_set_fills_nothing() {
        let marker = ConstantBeamMarker::new(2);
        let filler = PassageFiller::new(&marker);
        let mut space = SetSearchSpace::new(0, 0, 3, 3);
        filler.fill(&mut space);
        assert!(space.is_empty());
    }

    fn parallel_texts() -> (Text, Text) {
        let sentences = [
            "alpha omega",
            "unique1 filler",
            "words here",
            "unique2 tail",
        ];
        let mut src = Text::new();
        let mut tgt = Text::new();
        for (i, s) in sentences.iter().enumerate() {
            src.push_sentence((i + 1).to_string());
            tgt.push_sentence((i + 1).to_string());
            for w in s.split_whitespace() {
                src.push_word(w);
                tgt.push_word(w);
            }
        }
        (src, tgt)
    }

    #[test]
    fn cognate_filler_always_includes_both_corners() {
        let (mut src, tgt) = parallel_texts();
        find_identity_cognates(&mut src, &tgt, &CognateValidator::new(4, 25));

        let marker = ConstantBeamMarker::new(2);
        let filler = CognateFiller::new(&src, &tgt, &marker, 50, 5.0, 0, 25);
        let mut space = SetSearchSpace::new(-1, -1, 3, 3);
        filler.fill(&mut space);

        assert!(space.contains(-1, -1));
        assert!(space.contains(3, 3));
    }

    #[test]
    fn cognate_filler_covers_the_diagonal_of_identical_texts() {
        let (mut src, tgt) = parallel_texts();
        find_identity_cognates(&mut src, &tgt, &CognateValidator::new(4, 25));

        let marker = ConstantBeamMarker::new(2);
        let filler = CognateFiller::new(&src, &tgt, &marker, 50, 5.0, 0, 25);
        let mut space = SetSearchSpace::new(-1, -1, 3, 3);
        filler.fill(&mut space);

        for d in -1..=3 {
            assert!(space.contains(d, d), "missing diagonal cell ({d}, {d})");
        }
    }

    #[test]
    fn cognate_filler_handles_empty_texts() {
        let src = Text::new();
        let tgt = Text::new();
        let marker = ConstantBeamMarker::new(2);
        let filler = CognateFiller::new(&src, &tgt, &marker, 50, 5.0, 0, 25);
        let mut space = SetSearchSpace::new(-1, -1, -1, -1);
        filler.fill(&mut space);
        assert!(space.contains(-1, -1));
    }
}
