//! Cognate detection.
//!
//! A cognate is a source word linked to one or more target-dictionary words
//! it may translate to. Links are discovered by exact canonical-form
//! identity, by shared prefix, or loaded from an external bilingual lexicon;
//! the sentence score later counts how many of them a candidate bead
//! realizes.
//!
//! Detection runs once, before any dynamic programming, and is the only
//! mutation the dictionaries see after parsing.

use std::io::BufRead;

use crate::error::AlignError;
use crate::text::{Dictionary, Text, WordInfo};
use crate::utils::is_alphabetic;

/// Accepts words worth considering as cognate candidates.
///
/// Words above the frequency cap are too common to be informative.
/// Alphabetic words must additionally reach the minimum length; anything
/// containing a digit or punctuation (numbers, composite tokens) passes the
/// length check regardless, since such tokens anchor well at any length.
#[derive(Debug, Clone, Copy)]
pub struct CognateValidator {
    min_length: usize,
    max_frequency: usize,
}

impl CognateValidator {
    pub fn new(min_length: usize, max_frequency: usize) -> Self {
        Self {
            min_length,
            max_frequency,
        }
    }

    pub fn accept(&self, info: &WordInfo) -> bool {
        if info.frequency() > self.max_frequency {
            return false;
        }
        if info.form().chars().count() < self.min_length {
            !is_alphabetic(info.form())
        } else {
            true
        }
    }
}

/// Accepts words usable as word-level passage points.
///
/// Frequent words (and words whose synonyms are collectively frequent) make
/// poor anchors; both the word's own count and the summed counts of its
/// synonyms must stay under the cap.
#[derive(Debug, Clone, Copy)]
pub struct PassageValidator {
    max_frequency: usize,
}

impl PassageValidator {
    pub fn new(max_frequency: usize) -> Self {
        Self { max_frequency }
    }

    pub fn accept(&self, info: &WordInfo, target_dict: &Dictionary) -> bool {
        if info.frequency() > self.max_frequency {
            return false;
        }
        let synonym_freq: usize = info
            .synonyms()
            .map(|id| target_dict.word(id).frequency())
            .sum();
        synonym_freq <= self.max_frequency
    }
}

/// Word-identity mode: a source entry gains its target homograph as a
/// synonym when both sides pass the validator.
pub fn find_identity_cognates(
    source: &mut Text,
    target: &Text,
    validator: &CognateValidator,
) {
    let target_dict = target.dictionary();
    let mut links = Vec::new();

    for (form, src_id) in source.dictionary().iter() {
        if let Some(tgt_id) = target_dict.get(form) {
            if validator.accept(source.dictionary().word(src_id))
                && validator.accept(target_dict.word(tgt_id))
            {
                links.push((src_id, tgt_id));
            }
        }
    }

    let dict = source.dictionary_mut();
    for (src_id, tgt_id) in links {
        dict.add_synonym(src_id, tgt_id);
    }
}

/// Prefix mode: alphabetic source words of sufficient length adopt every
/// target word sharing their first `prefix_length` characters; other tokens
/// fall back to identity matching.
#[derive(Debug, Clone, Copy)]
pub struct PrefixCognateFinder {
    prefix_length: usize,
}

impl PrefixCognateFinder {
    pub fn new(prefix_length: usize) -> Self {
        Self { prefix_length }
    }

    pub fn run(&self, source: &mut Text, target: &Text, validator: &CognateValidator) {
        let target_dict = target.dictionary();
        let mut links = Vec::new();

        for (form, src_id) in source.dictionary().iter() {
            if !validator.accept(source.dictionary().word(src_id)) {
                continue;
            }

            if is_alphabetic(form) {
                // Too-short alphabetic words are simply skipped.
                if form.chars().count() < self.prefix_length {
                    continue;
                }
                let prefix: String = form.chars().take(self.prefix_length).collect();
                for tgt_id in target_dict.words_with_prefix(&prefix) {
                    if validator.accept(target_dict.word(tgt_id)) {
                        links.push((src_id, tgt_id));
                    }
                }
            } else if let Some(tgt_id) = target_dict.get(form) {
                if validator.accept(target_dict.word(tgt_id)) {
                    links.push((src_id, tgt_id));
                }
            }
        }

        let dict = source.dictionary_mut();
        for (src_id, tgt_id) in links {
            dict.add_synonym(src_id, tgt_id);
        }
    }
}

/// Loads an external bilingual lexicon: one `source_word target_word` pair
/// per line, canonicalized like any text word. A pair only registers when
/// both words already occur in their respective texts.
///
/// Returns the number of links added.
pub fn load_lexicon<R: BufRead>(
    reader: R,
    source: &mut Text,
    target: &Text,
) -> Result<usize, AlignError> {
    let mut added = 0;

    for line in reader.lines() {
        let line = line.map_err(|e| AlignError::MalformedInput(e.to_string()))?;
        let mut tokens = line.split_whitespace();
        let (Some(src_word), Some(tgt_word)) = (tokens.next(), tokens.next()) else {
            continue;
        };

        let src_form = crate::utils::canonicalize(src_word);
        let tgt_form = crate::utils::canonicalize(tgt_word);

        let src_id = source.dictionary().get(&src_form);
        let tgt_id = target.dictionary().get(&tgt_form);
        if let (Some(src_id), Some(tgt_id)) = (src_id, tgt_id) {
            source.dictionary_mut().add_synonym(src_id, tgt_id);
            added += 1;
        }
    }

    Ok(added)
}
