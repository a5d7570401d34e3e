//! sentalign-core
//!
//! Core of a length-and-cognate sentence aligner for parallel texts: sparse
//! dynamic programming over a restricted sentence grid, with the search
//! space shaped by word-level cognate matches.
//!
//! Public API:
//! - `Text` / `Dictionary` - parsed texts and their word arenas
//! - `Config` - all alignment knobs, TOML round-trippable
//! - `align` - the end-to-end pipeline producing `Bead`s
//! - `SparseTable` / `SearchSpace` / `DiscreteLine` - the engine pieces,
//!   exposed for embeddings that assemble their own pipeline

pub mod aligner;
pub use aligner::align;

pub mod bead;
pub use bead::{collect_beads, Bead};

pub mod cognate;
pub use cognate::{
    find_identity_cognates, load_lexicon, CognateValidator, PassageValidator,
    PrefixCognateFinder,
};

pub mod config;
pub use config::{
    CategorySpec, CognateMode, Config, FillerKind, GapCorrection, ScoreKind,
};

pub mod error;
pub use error::AlignError;

pub mod filler;
pub use filler::{BeamFiller, BeamMarker, CognateFiller, ConstantBeamMarker, PassageFiller};

pub mod line;
pub use line::DiscreteLine;

pub mod score;
pub use score::{Category, CategorySet, SentenceScore};

pub mod space;
pub use space::{Bounds, RowMapSearchSpace, SearchSpace, SetSearchSpace};

pub mod stats;

pub mod table;
pub use table::{Backtrack, ScoreFunction, SparseTable};

pub mod text;
pub use text::{Dictionary, Text, WordId, WordInfo};

pub mod word_score;
pub use word_score::WordPathScore;

/// Utility helpers.
pub mod utils {
    use unicode_normalization::char::is_combining_mark;
    use unicode_normalization::UnicodeNormalization;

    /// Canonicalizes a word for dictionary keying: decompose, drop the
    /// combining marks (stripping diacritics), fold guillemets to a plain
    /// double quote, uppercase.
    pub fn canonicalize(word: &str) -> String {
        word.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(|c| match c {
                '\u{00AB}' | '\u{00BB}' => Box::new(std::iter::once('"'))
                    as Box<dyn Iterator<Item = char>>,
                c => Box::new(c.to_uppercase()),
            })
            .collect()
    }

    /// True when every character of `word` is alphabetic. The empty string
    /// is vacuously alphabetic.
    pub fn is_alphabetic(word: &str) -> bool {
        word.chars().all(char::is_alphabetic)
    }

}
