//! Alignment configuration.
//!
//! All knobs the embedding can turn, with the defaults the score model and
//! fillers were tuned with. The struct round-trips through TOML so presets
//! can be kept on disk; command-line layers override individual fields.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// How cognate candidates are discovered before alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognateMode {
    /// No cognate detection.
    None,
    /// Exact canonical-form identity.
    Identity,
    /// Shared prefix for alphabetic words, identity otherwise.
    Prefix,
}

impl FromStr for CognateMode {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "none" => Ok(Self::None),
            "identity" => Ok(Self::Identity),
            "prefix" => Ok(Self::Prefix),
            _ => Err(AlignError::UnknownSelector {
                what: "cognate mode",
                value: s.to_string(),
            }),
        }
    }
}

/// How the sentence search space is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillerKind {
    /// Constant-width band along the grid diagonal.
    Beam,
    /// Band threaded through word-level cognate passage points.
    Cognate,
}

impl FromStr for FillerKind {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "beam" => Ok(Self::Beam),
            "cognate" => Ok(Self::Cognate),
            _ => Err(AlignError::UnknownSelector {
                what: "search space",
                value: s.to_string(),
            }),
        }
    }
}

/// Which terms the per-bead cost carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Length term only.
    Length,
    /// Length term plus cognate term.
    Composite,
}

impl FromStr for ScoreKind {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "length" => Ok(Self::Length),
            "composite" => Ok(Self::Composite),
            _ => Err(AlignError::UnknownSelector {
                what: "score function",
                value: s.to_string(),
            }),
        }
    }
}

/// Which cost terms the insertion/deletion correction divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapCorrection {
    None,
    Length,
    Cognate,
    Both,
}

impl FromStr for GapCorrection {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "none" => Ok(Self::None),
            "length" => Ok(Self::Length),
            "cognate" => Ok(Self::Cognate),
            "both" => Ok(Self::Both),
            _ => Err(AlignError::UnknownSelector {
                what: "gap correction mode",
                value: s.to_string(),
            }),
        }
    }
}

/// One admissible bead shape with its prior probability, written
/// `source-target-probability` on the command line (e.g. `1-2-0.089`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub source_len: usize,
    pub target_len: usize,
    pub probability: f64,
}

impl CategorySpec {
    pub fn new(source_len: usize, target_len: usize, probability: f64) -> Self {
        Self {
            source_len,
            target_len,
            probability,
        }
    }
}

impl FromStr for CategorySpec {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        let bad = || AlignError::InvalidConfig(format!("bad category spec: {s:?}"));
        let mut parts = s.splitn(3, '-');
        let source_len = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(bad)?;
        let target_len = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(bad)?;
        let probability = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(bad)?;
        Ok(Self {
            source_len,
            target_len,
            probability,
        })
    }
}

/// Full configuration of one alignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Cognate detection
    /// Cognate discovery mode applied before alignment.
    pub cognate_mode: CognateMode,
    /// Minimum length of an alphabetic cognate candidate (chars).
    pub min_cognate_length: usize,
    /// Prefix length compared in prefix mode.
    pub prefix_length: usize,
    /// Frequency cap on both sides of a cognate candidate link.
    pub max_cognate_frequency: usize,
    /// Frequency cap for a word (and its synonyms) to anchor a passage
    /// point.
    pub max_passage_frequency: usize,
    /// External bilingual lexicons, one `source target` pair per line.
    pub lexicons: Vec<PathBuf>,

    // Search space
    /// Search-space filling strategy.
    pub filler: FillerKind,
    /// Half-width of the beam drawn around the alignment skeleton
    /// (sentences).
    pub beam_radius: usize,
    /// Band half-width around the diagonal for word-level hits (sentences);
    /// 0 leaves the word grid unrestricted.
    pub word_radius: usize,
    /// Extra source rows the word path may reach back through.
    pub return_count: usize,
    /// Cost of each such return.
    pub return_cost: f64,

    // Score model
    /// Which terms the per-bead cost carries.
    pub score: ScoreKind,
    /// Expected target characters produced per source character.
    pub production: f64,
    /// Variance of the standardized length difference.
    pub variance: f64,
    /// Weight of the length-match part inside the length term.
    pub match_weight: f64,
    /// Weight of the category penalty inside the length term.
    pub penalty_weight: f64,
    /// Weight of the length term in the composite score.
    pub length_weight: f64,
    /// Weight of the cognate term in the composite score.
    pub cognate_weight: f64,
    /// Probability of a cognate link inside a true translation pair.
    pub p_in: f64,
    /// Probability of a cognate link between unrelated sentences.
    pub p_out: f64,
    /// Which terms the insertion/deletion correction divides.
    pub gap_correction: GapCorrection,
    /// Divisor applied by the correction.
    pub correction: f64,
    /// Admissible bead shapes with prior probabilities. Kept last so the
    /// TOML rendering groups the `[[categories]]` tables after the scalar
    /// options.
    pub categories: Vec<CategorySpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cognate_mode: CognateMode::Prefix,
            min_cognate_length: 4,
            prefix_length: 4,
            max_cognate_frequency: 25,
            max_passage_frequency: 25,
            lexicons: Vec::new(),

            filler: FillerKind::Cognate,
            beam_radius: 30,
            word_radius: 0,
            return_count: 50,
            return_cost: 5.0,

            score: ScoreKind::Composite,
            production: 1.0,
            variance: 6.8,
            match_weight: 0.2,
            penalty_weight: 1.0,
            length_weight: 1.0,
            cognate_weight: 0.85,
            p_in: 0.3,
            p_out: 0.09,
            gap_correction: GapCorrection::Both,
            correction: 2.0,
            categories: vec![
                CategorySpec::new(1, 1, 0.89),
                CategorySpec::new(0, 1, 0.0099),
                CategorySpec::new(1, 0, 0.0099),
                CategorySpec::new(1, 2, 0.089),
                CategorySpec::new(2, 1, 0.089),
                CategorySpec::new(2, 2, 0.011),
            ],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, AlignError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AlignError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, AlignError> {
        toml::from_str(content).map_err(|e| AlignError::InvalidConfig(e.to_string()))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, AlignError> {
        toml::to_string_pretty(self).map_err(|e| AlignError::InvalidConfig(e.to_string()))
    }

    /// Checks the numeric parameters the score model depends on.
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.categories.is_empty() {
            return Err(AlignError::InvalidConfig(
                "at least one alignment category is required".into(),
            ));
        }
        for spec in &self.categories {
            if !(spec.probability > 0.0) || !spec.probability.is_finite() {
                return Err(AlignError::InvalidCategory {
                    source_len: spec.source_len,
                    target_len: spec.target_len,
                    probability: spec.probability,
                });
            }
        }
        if !(self.production > 0.0) {
            return Err(AlignError::InvalidConfig(format!(
                "production must be positive, got {}",
                self.production
            )));
        }
        if !(self.variance > 0.0) {
            return Err(AlignError::InvalidConfig(format!(
                "variance must be positive, got {}",
                self.variance
            )));
        }
        if !(self.correction > 0.0) {
            return Err(AlignError::InvalidConfig(format!(
                "gap correction divisor must be positive, got {}",
                self.correction
            )));
        }
        for (name, p) in [("p_in", self.p_in), ("p_out", self.p_out)] {
            if !(p > 0.0 && p < 1.0) {
                return Err(AlignError::InvalidConfig(format!(
                    "{name} must lie in (0, 1), got {p}"
                )));
            }
        }
        Ok(())
    }
}
