//! Input-format parsers.
//!
//! Every parser consumes a whole input stream and produces the same abstract
//! [`Text`]: words canonicalized into the dictionary, sentence boundaries
//! and identifiers, paragraph and division structure. Four formats are
//! supported:
//!
//! - one sentence per line, whitespace-tokenized, sequential IDs;
//! - RALI/GLM token streams with `{sect}` `{para}` `{sent}` `{EOF}` markers;
//! - ARCADE SGML (`<text>`, `<div>`, `<p>`, `<s id="…">`);
//! - CESANA SGML (`<CHUNKLIST>`, `<CHUNK>`, `<PAR>`, `<S id="…">`) with
//!   punctuation-delimited words.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use sentalign_core::{AlignError, Text};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One sentence per line.
    Ospl,
    /// RALI/GLM marker stream.
    Rali,
    /// ARCADE SGML.
    Arcade,
    /// CESANA SGML.
    Cesana,
}

impl FromStr for InputFormat {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "ospl" => Ok(Self::Ospl),
            "rali" => Ok(Self::Rali),
            "arcade" => Ok(Self::Arcade),
            "cesana" => Ok(Self::Cesana),
            _ => Err(AlignError::UnknownSelector {
                what: "input format",
                value: s.to_string(),
            }),
        }
    }
}

/// Parses a whole input stream in the given format.
pub fn parse_text(format: InputFormat, input: &str) -> Result<Text, AlignError> {
    match format {
        InputFormat::Ospl => Ok(parse_ospl(input)),
        InputFormat::Rali => parse_rali(input),
        InputFormat::Arcade => parse_sgml(input, &ARCADE),
        InputFormat::Cesana => parse_sgml(input, &CESANA),
    }
}

fn parse_ospl(input: &str) -> Text {
    let mut text = Text::new();
    text.push_division();
    text.push_paragraph();

    for (i, line) in input.lines().enumerate() {
        text.push_sentence((i + 1).to_string());
        for word in line.split_whitespace() {
            text.push_word(word);
        }
    }

    text
}

const RALI_DIVISION: &str = "{sect}";
const RALI_PARAGRAPH: &str = "{para}";
const RALI_SENTENCE: &str = "{sent}";
const RALI_END: &str = "{EOF}";

fn parse_rali(input: &str) -> Result<Text, AlignError> {
    let mut tokens = input.lines().map(str::trim).filter(|l| !l.is_empty());

    // Everything before the first sentence marker is header material.
    let mut started = false;
    for token in tokens.by_ref() {
        match token {
            RALI_END => break,
            RALI_SENTENCE => {
                started = true;
                break;
            }
            _ => {}
        }
    }
    if !started {
        return Err(AlignError::MalformedInput(
            "stream ends before the first {sent} marker".into(),
        ));
    }

    let mut text = Text::new();
    let mut sentence_id = 0usize;
    text.push_division();
    text.push_paragraph();
    text.push_sentence(sentence_id.to_string());
    sentence_id += 1;

    for token in tokens {
        match token {
            RALI_END => break,
            RALI_SENTENCE => {
                text.push_sentence(sentence_id.to_string());
                sentence_id += 1;
            }
            RALI_PARAGRAPH => text.push_paragraph(),
            RALI_DIVISION => text.push_division(),
            word => text.push_word(word),
        }
    }

    Ok(text)
}

/// Tag vocabulary of one SGML-like dialect.
struct SgmlDialect {
    text: &'static str,
    division: &'static str,
    paragraph: &'static str,
    sentence: &'static str,
    /// Whether punctuation also delimits words inside content.
    punctuation_delimits: bool,
}

static ARCADE: SgmlDialect = SgmlDialect {
    text: "text",
    division: "div",
    paragraph: "p",
    sentence: "s",
    punctuation_delimits: false,
};

static CESANA: SgmlDialect = SgmlDialect {
    text: "chunklist",
    division: "chunk",
    paragraph: "par",
    sentence: "s",
    punctuation_delimits: true,
};

static ID_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)id\s*=\s*"([^"]*)""#).unwrap());

const WORD_DELIMITERS: &str = ",.;\"()[]:<>?!=/{}";

fn parse_sgml(input: &str, dialect: &SgmlDialect) -> Result<Text, AlignError> {
    let mut text = Text::new();
    let mut rest = input;
    let mut in_text = false;
    let mut sentence_ordinal = 0usize;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            if in_text {
                push_content(&mut text, rest, dialect);
            }
            break;
        };

        if in_text {
            push_content(&mut text, &rest[..open], dialect);
        }

        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            return Err(AlignError::MalformedInput("unterminated tag".into()));
        };
        let tag = &after[..close];
        rest = &after[close + 1..];

        let body = tag.trim_start();
        let (closing, body) = match body.strip_prefix('/') {
            Some(stripped) => (true, stripped),
            None => (false, body),
        };
        // Tag names compare case-insensitively; attributes don't matter here.
        let name: String = body
            .chars()
            .take_while(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if !in_text {
            if !closing && name == dialect.text {
                in_text = true;
            }
            continue;
        }

        if closing {
            if name == dialect.text {
                break;
            }
        } else if name == dialect.sentence {
            sentence_ordinal += 1;
            let id = ID_ATTRIBUTE
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| sentence_ordinal.to_string());
            text.push_sentence(id);
        } else if name == dialect.paragraph {
            text.push_paragraph();
        } else if name == dialect.division {
            text.push_division();
        }
    }

    if !in_text {
        return Err(AlignError::MalformedInput(format!(
            "no <{}> element found",
            dialect.text
        )));
    }

    Ok(text)
}

fn push_content(text: &mut Text, content: &str, dialect: &SgmlDialect) {
    if dialect.punctuation_delimits {
        for word in content
            .split(|c: char| c.is_whitespace() || WORD_DELIMITERS.contains(c))
            .filter(|w| !w.is_empty())
        {
            text.push_word(word);
        }
    } else {
        for word in content.split_whitespace() {
            text.push_word(word);
        }
    }
}
