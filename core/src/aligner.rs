//! End-to-end alignment pipeline.
//!
//! Wires the configured cognate finder, search-space filler and score
//! function together: cognate links are populated first (the only
//! dictionary mutation), then the sentence search space is built, the
//! sparse table solved, and the optimal path folded into beads.

use std::fs::File;
use std::io::BufReader;

use tracing::{debug, info, warn};

use crate::bead::{collect_beads, Bead};
use crate::cognate::{
    find_identity_cognates, load_lexicon, CognateValidator, PrefixCognateFinder,
};
use crate::config::{CognateMode, Config, FillerKind};
use crate::error::AlignError;
use crate::filler::{BeamFiller, CognateFiller, ConstantBeamMarker};
use crate::score::SentenceScore;
use crate::space::{SearchSpace, SetSearchSpace};
use crate::table::SparseTable;
use crate::text::Text;

/// Aligns `source` against `target` under `config`.
///
/// Returns the bead sequence ordered from the texts' start to their end.
/// An empty sequence on non-empty texts means the search space did not
/// connect the origin to the terminal; that is reported as a warning, not an
/// error.
pub fn align(
    source: &mut Text,
    target: &Text,
    config: &Config,
) -> Result<Vec<Bead>, AlignError> {
    config.validate()?;

    find_cognates(source, target, config)?;

    info!("filling search space");
    let space = build_search_space(source, target, config);
    debug!(cells = space.len(), "sentence search space built");

    info!("finding best alignment");
    let score = SentenceScore::from_config(config, source, target)?;
    let mut table = SparseTable::new();
    table.solve(&space, &score);

    let bounds = space.bounds();
    let beads = collect_beads(table.backtrack_from(bounds.x_up, bounds.y_up));

    if beads.is_empty() && (source.sentence_count() > 0 || target.sentence_count() > 0) {
        warn!("search space does not reach the final sentence pair; empty alignment");
    }

    Ok(beads)
}

fn find_cognates(source: &mut Text, target: &Text, config: &Config) -> Result<(), AlignError> {
    let validator = CognateValidator::new(config.min_cognate_length, config.max_cognate_frequency);

    match config.cognate_mode {
        CognateMode::None => {}
        CognateMode::Identity => {
            info!("finding cognates by word identity");
            find_identity_cognates(source, target, &validator);
        }
        CognateMode::Prefix => {
            info!(prefix_length = config.prefix_length, "finding cognates by prefix");
            PrefixCognateFinder::new(config.prefix_length).run(source, target, &validator);
        }
    }

    for path in &config.lexicons {
        info!(path = %path.display(), "loading bilingual lexicon");
        let file = File::open(path).map_err(|e| AlignError::io(path, e))?;
        let added = load_lexicon(BufReader::new(file), source, target)?;
        debug!(links = added, "lexicon links registered");
    }

    Ok(())
}

fn build_search_space(source: &Text, target: &Text, config: &Config) -> SetSearchSpace {
    let mut space = SetSearchSpace::new(
        -1,
        -1,
        source.sentence_count() as i32 - 1,
        target.sentence_count() as i32 - 1,
    );
    let marker = ConstantBeamMarker::new(config.beam_radius);

    match config.filler {
        FillerKind::Beam => BeamFiller::new(&marker).fill(&mut space),
        FillerKind::Cognate => CognateFiller::new(
            source,
            target,
            &marker,
            config.return_count,
            config.return_cost,
            config.word_radius,
            config.max_passage_frequency,
        )
        .fill(&mut space),
    }

    space
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreKind;

    fn text_from(sentences: &[&str]) -> Text {
        let mut text = Text::new();
        text.push_division();
        text.push_paragraph();
        for (i, s) in sentences.iter().enumerate() {
            text.push_sentence((i + 1).to_string());
            for w in s.split_whitespace() {
                text.push_word(w);
            }
        }
        text
    }

    #[test]
    fn beam_and_cognate_fillers_agree_on_identical_texts() {
        let sentences = ["uno dos tres", "quatro cinco", "seis siete ocho nueve"];
        let config_beam = {
            let mut c = Config::default();
            c.filler = FillerKind::Beam;
            c.cognate_mode = CognateMode::None;
            c.score = ScoreKind::Length;
            c
        };
        let mut src = text_from(&sentences);
        let tgt = text_from(&sentences);
        let beam = align(&mut src, &tgt, &config_beam).unwrap();

        let config_cog = {
            let mut c = Config::default();
            c.cognate_mode = CognateMode::Identity;
            c
        };
        let mut src = text_from(&sentences);
        let tgt = text_from(&sentences);
        let cognate = align(&mut src, &tgt, &config_cog).unwrap();

        let shape = |beads: &[Bead]| -> Vec<(usize, usize)> {
            beads.iter().map(|b| (b.source_len, b.target_len)).collect()
        };
        assert_eq!(shape(&beam), vec![(1, 1); 3]);
        assert_eq!(shape(&cognate), vec![(1, 1); 3]);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let mut config = Config::default();
        config.categories.clear();
        let mut src = text_from(&["abc"]);
        let tgt = text_from(&["abc"]);
        assert!(align(&mut src, &tgt, &config).is_err());
    }

    #[test]
    fn missing_lexicon_file_is_an_io_error() {
        let mut config = Config::default();
        config.lexicons.push("/nonexistent/lexicon.txt".into());
        let mut src = text_from(&["abc"]);
        let tgt = text_from(&["abc"]);
        match align(&mut src, &tgt, &config) {
            Err(AlignError::Io { .. }) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn both_texts_empty_yield_empty_alignment() {
        let mut src = Text::new();
        let tgt = Text::new();
        let beads = align(&mut src, &tgt, &Config::default()).unwrap();
        assert!(beads.is_empty());
    }
}
