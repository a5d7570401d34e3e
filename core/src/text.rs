//! Text and dictionary model.
//!
//! A text is an ordered word sequence partitioned into sentences, paragraphs
//! and divisions. Words are canonicalized at ingest (diacritics stripped,
//! uppercased) and interned into the text's dictionary; the word stream
//! stores dictionary handles, not strings.
//!
//! Synonym links are directional, from a source-dictionary entry into the
//! target text's dictionary. Both dictionaries are arenas addressed by
//! [`WordId`] so the cross-dictionary links are plain indices and the whole
//! structure stays free of ownership cycles.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::utils::canonicalize;

/// Handle of a word entry inside one dictionary's arena.
pub type WordId = usize;

/// Everything known about one canonical word form.
#[derive(Debug, Clone)]
pub struct WordInfo {
    form: String,
    frequency: usize,
    /// Handles into the counterpart text's dictionary.
    synonyms: BTreeSet<WordId>,
}

impl WordInfo {
    fn new(form: String) -> Self {
        Self {
            form,
            frequency: 0,
            synonyms: BTreeSet::new(),
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    /// Occurrence count in the owning text.
    pub fn frequency(&self) -> usize {
        self.frequency
    }

    pub fn synonyms(&self) -> impl Iterator<Item = WordId> + '_ {
        self.synonyms.iter().copied()
    }

    pub fn has_synonyms(&self) -> bool {
        !self.synonyms.is_empty()
    }

    pub fn is_synonym(&self, target: WordId) -> bool {
        self.synonyms.contains(&target)
    }
}

/// Arena of word entries keyed by canonical form.
///
/// The form index is an ordered map so prefix scans and whole-dictionary
/// walks are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    forms: BTreeMap<String, WordId>,
    entries: Vec<WordInfo>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a canonical form, bumping its occurrence count.
    pub fn intern(&mut self, form: &str) -> WordId {
        let id = match self.forms.get(form) {
            Some(&id) => id,
            None => {
                let id = self.entries.len();
                self.entries.push(WordInfo::new(form.to_string()));
                self.forms.insert(form.to_string(), id);
                id
            }
        };
        self.entries[id].frequency += 1;
        id
    }

    pub fn get(&self, form: &str) -> Option<WordId> {
        self.forms.get(form).copied()
    }

    pub fn word(&self, id: WordId) -> &WordInfo {
        &self.entries[id]
    }

    /// Registers `target` (a counterpart-dictionary handle) as a synonym of
    /// `id`.
    pub fn add_synonym(&mut self, id: WordId, target: WordId) {
        self.entries[id].synonyms.insert(target);
    }

    /// All entries in canonical-form order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, WordId)> + '_ {
        self.forms.iter().map(|(form, &id)| (form.as_str(), id))
    }

    /// Entries whose form starts with `prefix`, in form order.
    pub fn words_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = WordId> + 'a {
        self.forms
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(form, _)| form.starts_with(prefix))
            .map(|(_, &id)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed text: word stream, sentence/paragraph/division structure and the
/// dictionary its words are interned in.
#[derive(Debug, Clone, Default)]
pub struct Text {
    words: Vec<WordId>,
    /// First word index of each sentence.
    sentence_starts: Vec<usize>,
    /// Character length of each sentence (canonical word lengths, no
    /// separators).
    sentence_lengths: Vec<usize>,
    sentence_ids: Vec<String>,
    /// First sentence index of each paragraph.
    paragraph_starts: Vec<usize>,
    /// First paragraph index of each division.
    division_starts: Vec<usize>,
    dictionary: Dictionary,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new sentence carrying the given identifier.
    pub fn push_sentence(&mut self, id: impl Into<String>) {
        self.sentence_starts.push(self.words.len());
        self.sentence_lengths.push(0);
        self.sentence_ids.push(id.into());
    }

    /// Appends a word to the current sentence, canonicalizing it first.
    ///
    /// A word arriving before any sentence opens an anonymous one.
    pub fn push_word(&mut self, raw: &str) {
        let canonical = canonicalize(raw);
        if canonical.is_empty() {
            return;
        }
        if self.sentence_starts.is_empty() {
            self.push_sentence("");
        }
        let id = self.dictionary.intern(&canonical);
        self.words.push(id);
        *self.sentence_lengths.last_mut().unwrap() += canonical.chars().count();
    }

    pub fn push_paragraph(&mut self) {
        self.paragraph_starts.push(self.sentence_starts.len());
    }

    pub fn push_division(&mut self) {
        self.division_starts.push(self.paragraph_starts.len());
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_starts.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_starts.len()
    }

    pub fn division_count(&self) -> usize {
        self.division_starts.len()
    }

    /// Dictionary handle of the word at stream position `index`.
    pub fn word(&self, index: usize) -> WordId {
        self.words[index]
    }

    pub fn word_info(&self, index: usize) -> &WordInfo {
        self.dictionary.word(self.words[index])
    }

    /// `[first, one-past-last)` word range of a sentence.
    pub fn sentence_bounds(&self, sentence: usize) -> (usize, usize) {
        let begin = self.sentence_starts[sentence];
        let end = if sentence + 1 < self.sentence_starts.len() {
            self.sentence_starts[sentence + 1]
        } else {
            self.words.len()
        };
        (begin, end)
    }

    /// Character length of a sentence; 0 when out of range.
    pub fn sentence_length(&self, sentence: usize) -> usize {
        self.sentence_lengths.get(sentence).copied().unwrap_or(0)
    }

    pub fn sentence_word_count(&self, sentence: usize) -> usize {
        let (begin, end) = self.sentence_bounds(sentence);
        end - begin
    }

    pub fn sentence_id(&self, sentence: usize) -> &str {
        &self.sentence_ids[sentence]
    }

    /// Index of the sentence containing the word at stream position
    /// `word_index`.
    pub fn sentence_of_word(&self, word_index: usize) -> usize {
        let p = self
            .sentence_starts
            .partition_point(|&start| start < word_index);
        if p < self.sentence_starts.len() && self.sentence_starts[p] == word_index {
            p
        } else {
            p.saturating_sub(1)
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn words_are_canonicalized_and_counted() {
        let text = text_from(&["été Été", "réponse"]);
        let dict = text.dictionary();
        let id = dict.get("ETE").expect("canonical form present");
        assert_eq!(dict.word(id).frequency(), 2);
        assert!(dict.get("REPONSE").is_some());
        assert!(dict.get("été").is_none());
    }

    #[test]
    fn sentence_lengths_exclude_separators() {
        let text = text_from(&["ab cde", "f"]);
        assert_eq!(text.sentence_length(0), 5);
        assert_eq!(text.sentence_length(1), 1);
        assert_eq!(text.sentence_length(7), 0);
    }

    #[test]
    fn sentence_bounds_and_word_counts() {
        let text = text_from(&["a b c", "d e"]);
        assert_eq!(text.sentence_bounds(0), (0, 3));
        assert_eq!(text.sentence_bounds(1), (3, 5));
        assert_eq!(text.sentence_word_count(0), 3);
        assert_eq!(text.sentence_word_count(1), 2);
        assert_eq!(text.word_count(), 5);
    }

    #[test]
    fn sentence_of_word_is_a_binary_search() {
        let text = text_from(&["a b c", "d e", "f"]);
        assert_eq!(text.sentence_of_word(0), 0);
        assert_eq!(text.sentence_of_word(2), 0);
        assert_eq!(text.sentence_of_word(3), 1);
        assert_eq!(text.sentence_of_word(4), 1);
        assert_eq!(text.sentence_of_word(5), 2);
    }

    #[test]
    fn sentence_ids_are_preserved() {
        let mut text = Text::new();
        text.push_sentence("s42");
        text.push_word("mot");
        assert_eq!(text.sentence_id(0), "s42");
    }

    #[test]
    fn word_before_sentence_opens_anonymous_sentence() {
        let mut text = Text::new();
        text.push_word("stray");
        assert_eq!(text.sentence_count(), 1);
        assert_eq!(text.sentence_id(0), "");
        assert_eq!(text.sentence_word_count(0), 1);
    }

    #[test]
    fn prefix_scan_is_ordered_and_bounded() {
        let mut dict = Dictionary::new();
        dict.intern("CHAT");
        dict.intern("CHATEAU");
        dict.intern("CHIEN");
        dict.intern("CHAT");
        let forms: Vec<&str> = dict
            .words_with_prefix("CHAT")
            .map(|id| dict.word(id).form())
            .collect();
        assert_eq!(forms, vec!["CHAT", "CHATEAU"]);
        assert_eq!(dict.word(dict.get("CHAT").unwrap()).frequency(), 2);
    }

    #[test]
    fn synonyms_are_directional_handles() {
        let mut src = Dictionary::new();
        let mut tgt = Dictionary::new();
        let a = src.intern("APPLE");
        let p = tgt.intern("POMME");
        src.add_synonym(a, p);
        assert!(src.word(a).is_synonym(p));
        assert!(src.word(a).has_synonyms());
        assert!(!tgt.word(p).has_synonyms());
    }
}
