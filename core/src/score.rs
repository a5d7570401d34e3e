//! Sentence-level score model.
//!
//! The cost of a bead joining `a` source sentences to `b` target sentences
//! combines a length term (Gale & Church: how plausible are the character
//! counts under a normal model of the length ratio) with an optional cognate
//! term (Simard: how many word-level cognate links the bead realizes versus
//! chance). Both are negated log-probabilities, so the outer table minimizes
//! their weighted sum.

use crate::config::{Config, GapCorrection, ScoreKind};
use crate::error::AlignError;
use crate::stats::{average, pnorm, standardize};
use crate::table::{ScoreFunction, SparseTable};
use crate::text::{Text, WordId};

/// Floor applied to the two-sided tail probability so that extreme length
/// mismatches stay finite and insertions of long sentences remain payable.
const TAIL_FLOOR: f64 = 1e-24;

/// The origin cell of the sentence grid.
pub const ORIGIN: (i32, i32) = (-1, -1);

/// One registered alignment step: `a` source sentences against `b` target
/// sentences, with its prior probability and derived penalty.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub source_len: i32,
    pub target_len: i32,
    pub probability: f64,
    pub penalty: f64,
}

/// The set of admissible bead shapes.
///
/// Penalties are `-ln(p / max_p)`; whenever a registration raises the
/// maximum probability, every penalty is re-derived so the most probable
/// category always costs zero.
#[derive(Debug, Clone, Default)]
pub struct CategorySet {
    categories: Vec<Category>,
    max_probability: f64,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from configuration, rejecting non-positive
    /// probabilities.
    pub fn from_config(config: &Config) -> Result<Self, AlignError> {
        let mut set = Self::new();
        for spec in &config.categories {
            if !(spec.probability > 0.0) || !spec.probability.is_finite() {
                return Err(AlignError::InvalidCategory {
                    source_len: spec.source_len,
                    target_len: spec.target_len,
                    probability: spec.probability,
                });
            }
            set.add(spec.source_len as i32, spec.target_len as i32, spec.probability);
        }
        Ok(set)
    }

    /// Registers a category, replacing the probability of an existing
    /// `(a, b)` entry.
    pub fn add(&mut self, source_len: i32, target_len: i32, probability: f64) {
        if probability > self.max_probability {
            self.max_probability = probability;
            let max = self.max_probability;
            for cat in &mut self.categories {
                cat.penalty = Self::derive_penalty(cat.probability, max);
            }
        }

        let penalty = Self::derive_penalty(probability, self.max_probability);
        if let Some(cat) = self
            .categories
            .iter_mut()
            .find(|c| c.source_len == source_len && c.target_len == target_len)
        {
            cat.probability = probability;
            cat.penalty = penalty;
        } else {
            self.categories.push(Category {
                source_len,
                target_len,
                probability,
                penalty,
            });
        }
    }

    fn derive_penalty(probability: f64, max_probability: f64) -> f64 {
        -(probability / max_probability).ln()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }
}

/// Parameters of the cognate term, present only for the composite score.
#[derive(Debug, Clone, Copy)]
struct CognateTerm {
    length_weight: f64,
    cognate_weight: f64,
    /// `-ln(p_in / p_out)`: reward per matched cognate.
    r1: f64,
    /// `-ln((1 - p_in) / (1 - p_out))`: cost per unmatched word.
    r2: f64,
    gap_correction: GapCorrection,
    correction: f64,
}

/// Score function for the sentence-level table.
///
/// Holds its parameters and read-only references to the two texts; the table
/// engine only sees the `(table, x, y) -> (cost, prev)` contract.
pub struct SentenceScore<'a> {
    source: &'a Text,
    target: &'a Text,
    categories: CategorySet,
    production: f64,
    variance: f64,
    match_weight: f64,
    penalty_weight: f64,
    cognate: Option<CognateTerm>,
}

impl<'a> SentenceScore<'a> {
    pub fn from_config(
        config: &Config,
        source: &'a Text,
        target: &'a Text,
    ) -> Result<Self, AlignError> {
        config.validate()?;
        let categories = CategorySet::from_config(config)?;

        let cognate = match config.score {
            ScoreKind::Length => None,
            ScoreKind::Composite => Some(CognateTerm {
                length_weight: config.length_weight,
                cognate_weight: config.cognate_weight,
                r1: -(config.p_in / config.p_out).ln(),
                r2: -((1.0 - config.p_in) / (1.0 - config.p_out)).ln(),
                gap_correction: config.gap_correction,
                correction: config.correction,
            }),
        };

        Ok(Self {
            source,
            target,
            categories,
            production: config.production,
            variance: config.variance,
            match_weight: config.match_weight,
            penalty_weight: config.penalty_weight,
            cognate,
        })
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Cost of the bead ending at sentence cell `(x, y)` with shape
    /// `(a, b) = (cat.source_len, cat.target_len)`.
    pub fn bead_cost(&self, x: i32, y: i32, cat: &Category) -> f64 {
        let mut length_cost = self.length_cost(x, y, cat);

        let Some(term) = &self.cognate else {
            return length_cost;
        };

        let mut cognate_cost = self.cognate_cost(x, y, cat, term);

        // Insertions and deletions would otherwise be priced as total
        // mismatches; the correction divides the affected term(s) down.
        if cat.source_len == 0 || cat.target_len == 0 {
            match term.gap_correction {
                GapCorrection::None => {}
                GapCorrection::Length => length_cost /= term.correction,
                GapCorrection::Cognate => cognate_cost /= term.correction,
                GapCorrection::Both => {
                    length_cost /= term.correction;
                    cognate_cost /= term.correction;
                }
            }
        }

        term.cognate_weight * cognate_cost + term.length_weight * length_cost
    }

    fn length_cost(&self, x: i32, y: i32, cat: &Category) -> f64 {
        let mut source_chars = 0usize;
        for k in 0..cat.source_len {
            source_chars += self.source.sentence_length((x - k) as usize);
        }
        let mut target_chars = 0usize;
        for k in 0..cat.target_len {
            target_chars += self.target.sentence_length((y - k) as usize);
        }

        self.match_weight * self.length_match(source_chars, target_chars)
            + self.penalty_weight * cat.penalty
    }

    /// `-ln` of the two-sided tail probability of the standardized length
    /// difference. Zero when both sides are empty.
    fn length_match(&self, source_chars: usize, target_chars: usize) -> f64 {
        if source_chars == 0 && target_chars == 0 {
            return 0.0;
        }

        let l1 = source_chars as f64;
        let l2 = target_chars as f64;
        let mean = average(l1, self.production * l2);
        let z = standardize(l1 - self.production * l2, mean, self.variance).abs();
        let pd = (2.0 * (1.0 - pnorm(z))).max(TAIL_FLOOR);

        -pd.ln()
    }

    fn cognate_cost(&self, x: i32, y: i32, cat: &Category, term: &CognateTerm) -> f64 {
        let mut word_count = 0usize;
        for k in 0..cat.source_len {
            word_count += self.source.sentence_word_count((x - k) as usize);
        }
        for k in 0..cat.target_len {
            word_count += self.target.sentence_word_count((y - k) as usize);
        }
        word_count /= 2;

        let matched = self.count_cognates(x, y, cat);

        matched as f64 * term.r1 + (word_count as f64 - matched as f64) * term.r2
    }

    /// Greedy bipartite cognate count over the bead.
    ///
    /// Each source word with synonyms claims the first still-unclaimed
    /// target occurrence of any of its synonyms, then stops. Deterministic
    /// by construction.
    fn count_cognates(&self, x: i32, y: i32, cat: &Category) -> usize {
        let mut remaining: Vec<WordId> = Vec::new();
        for k in 0..cat.target_len {
            let (begin, end) = self.target.sentence_bounds((y - k) as usize);
            for w in begin..end {
                remaining.push(self.target.word(w));
            }
        }

        let mut matched = 0usize;
        for k in 0..cat.source_len {
            let (begin, end) = self.source.sentence_bounds((x - k) as usize);
            for w in begin..end {
                let info = self.source.word_info(w);
                if !info.has_synonyms() {
                    continue;
                }
                if let Some(pos) = remaining.iter().position(|&tid| info.is_synonym(tid)) {
                    remaining.remove(pos);
                    matched += 1;
                }
            }
        }

        matched
    }
}

impl ScoreFunction for SentenceScore<'_> {
    fn score(&self, table: &SparseTable, x: i32, y: i32) -> (f64, i32, i32) {
        if (x, y) == ORIGIN {
            return (0.0, x, y);
        }

        let mut best = f64::INFINITY;
        let mut prev = (x, y);

        for cat in self.categories.iter() {
            let px = x - cat.source_len;
            let py = y - cat.target_len;
            if let Some(prev_score) = table.get(px, py) {
                let cost = prev_score + self.bead_cost(x, y, cat);
                if cost < best {
                    best = cost;
                    prev = (px, py);
                }
            }
        }

        (best, prev.0, prev.1)
    }
}
