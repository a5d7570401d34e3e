//! Output formatters.
//!
//! Pure functions from a bead sequence (plus the two texts where sentence
//! content or identifiers are needed) to a writer. Nothing here owns state;
//! the CLI decides where the bytes go.

use std::io::{self, Write};
use std::str::FromStr;

use sentalign_core::{AlignError, Bead, Text};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `<link>` element per bead, certainty = per-bead score increment.
    Links,
    /// `Links` wrapped in a cesAlign document envelope.
    CesAlign,
    /// One `srcLen-tgtLen cumulativeScore` line per bead.
    Beads,
    /// A single `sourcePath targetPath totalScore` line.
    Score,
    /// Human-readable blocks with the sentences spelled out.
    Readable,
}

impl FromStr for OutputFormat {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, AlignError> {
        match s {
            "links" => Ok(Self::Links),
            "cesalign" => Ok(Self::CesAlign),
            "beads" => Ok(Self::Beads),
            "score" => Ok(Self::Score),
            "readable" => Ok(Self::Readable),
            _ => Err(AlignError::UnknownSelector {
                what: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Serializes `beads` in the chosen format.
///
/// `source_name` / `target_name` only appear in the `CesAlign` and `Score`
/// outputs.
pub fn print_alignment(
    format: OutputFormat,
    out: &mut dyn Write,
    beads: &[Bead],
    source: &Text,
    target: &Text,
    source_name: &str,
    target_name: &str,
) -> io::Result<()> {
    match format {
        OutputFormat::Links => write_links(out, beads, source, target),
        OutputFormat::CesAlign => {
            write_cesalign(out, beads, source, target, source_name, target_name)
        }
        OutputFormat::Beads => write_beads(out, beads),
        OutputFormat::Score => write_score(out, beads, source_name, target_name),
        OutputFormat::Readable => write_readable(out, beads, source, target),
    }
}

/// `<link xtargets="srcIDs;tgtIDs" certainty="Δscore"></link>` per bead.
pub fn write_links(
    out: &mut dyn Write,
    beads: &[Bead],
    source: &Text,
    target: &Text,
) -> io::Result<()> {
    let mut isrc = 0usize;
    let mut itgt = 0usize;
    let mut previous = 0.0f64;

    for bead in beads {
        write!(out, "<link xtargets=\"")?;
        for i in 0..bead.source_len {
            if i != 0 {
                write!(out, " ")?;
            }
            write!(out, "{}", source.sentence_id(isrc))?;
            isrc += 1;
        }
        write!(out, ";")?;
        for j in 0..bead.target_len {
            if j != 0 {
                write!(out, " ")?;
            }
            write!(out, "{}", target.sentence_id(itgt))?;
            itgt += 1;
        }
        writeln!(out, "\" certainty=\"{}\"></link>", bead.score - previous)?;
        previous = bead.score;
    }

    Ok(())
}

/// The `Links` body inside a cesAlign envelope naming the two documents.
pub fn write_cesalign(
    out: &mut dyn Write,
    beads: &[Bead],
    source: &Text,
    target: &Text,
    source_name: &str,
    target_name: &str,
) -> io::Result<()> {
    writeln!(
        out,
        "<!DOCTYPE CESALIGN PUBLIC \"-//CES//DTD cesAlign//EN\" []>"
    )?;
    writeln!(
        out,
        "<cesAlign VERSION=\"1.14\"  type=\"sent\" fromDoc=\"{source_name}\" toDoc=\"{target_name}\">"
    )?;
    writeln!(out, "<linkList>")?;
    writeln!(out, "<linkGrp>")?;
    write_links(out, beads, source, target)?;
    writeln!(out, "</linkGrp>")?;
    writeln!(out, "</linkList>")?;
    writeln!(out, "</cesAlign>")
}

/// `srcLen-tgtLen cumulativeScore` per bead.
pub fn write_beads(out: &mut dyn Write, beads: &[Bead]) -> io::Result<()> {
    for bead in beads {
        writeln!(out, "{}-{} {}", bead.source_len, bead.target_len, bead.score)?;
    }
    Ok(())
}

/// `sourcePath targetPath totalScore` on a single line.
pub fn write_score(
    out: &mut dyn Write,
    beads: &[Bead],
    source_name: &str,
    target_name: &str,
) -> io::Result<()> {
    let total = beads.last().map(|b| b.score).unwrap_or(0.0);
    writeln!(out, "{source_name} {target_name} {total}")
}

const SOURCE_RULE: &str = "---------------------------------------------------";
const BEAD_RULE: &str = "***************************************************";

/// One block per bead: source sentences, a rule, target sentences, a rule.
pub fn write_readable(
    out: &mut dyn Write,
    beads: &[Bead],
    source: &Text,
    target: &Text,
) -> io::Result<()> {
    let mut isrc = 0usize;
    let mut itgt = 0usize;

    for bead in beads {
        for _ in 0..bead.source_len {
            write!(out, "{}({}):\t", isrc + 1, source.sentence_id(isrc))?;
            write_sentence(out, source, isrc)?;
            writeln!(out)?;
            isrc += 1;
        }
        writeln!(out, "{SOURCE_RULE}")?;
        for _ in 0..bead.target_len {
            write!(out, "{}({}):\t", itgt + 1, target.sentence_id(itgt))?;
            write_sentence(out, target, itgt)?;
            writeln!(out)?;
            itgt += 1;
        }
        writeln!(out, "{BEAD_RULE}")?;
    }

    Ok(())
}

fn write_sentence(out: &mut dyn Write, text: &Text, sentence: usize) -> io::Result<()> {
    let (begin, end) = text.sentence_bounds(sentence);
    for w in begin..end {
        write!(out, " {}", text.word_info(w).form())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Bead>, Text, Text) {
        let mut source = Text::new();
        source.push_sentence("s1");
        source.push_word("aaaa");
        source.push_sentence("s2");
        source.push_word("bbbb");

        let mut target = Text::new();
        target.push_sentence("t1");
        target.push_word("aaaa");

        let beads = vec![
            Bead {
                source_len: 1,
                target_len: 1,
                score: 1.5,
            },
            Bead {
                source_len: 1,
                target_len: 0,
                score: 4.0,
            },
        ];
        (beads, source, target)
    }

    fn render(format: OutputFormat) -> String {
        let (beads, source, target) = sample();
        let mut buf = Vec::new();
        print_alignment(format, &mut buf, &beads, &source, &target, "src.txt", "tgt.txt")
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn links_report_score_increments() {
        let out = render(OutputFormat::Links);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<link xtargets=\"s1;t1\" certainty=\"1.5\"></link>",
                "<link xtargets=\"s2;\" certainty=\"2.5\"></link>",
            ]
        );
    }

    #[test]
    fn cesalign_wraps_links_in_an_envelope() {
        let out = render(OutputFormat::CesAlign);
        assert!(out.starts_with("<!DOCTYPE CESALIGN PUBLIC"));
        assert!(out.contains("fromDoc=\"src.txt\" toDoc=\"tgt.txt\""));
        assert!(out.contains("<linkGrp>"));
        assert!(out.trim_end().ends_with("</cesAlign>"));
        assert!(out.contains("<link xtargets=\"s1;t1\""));
    }

    #[test]
    fn beads_print_cumulative_scores() {
        let out = render(OutputFormat::Beads);
        assert_eq!(out, "1-1 1.5\n1-0 4\n");
    }

    #[test]
    fn score_prints_file_names_and_total() {
        let out = render(OutputFormat::Score);
        assert_eq!(out, "src.txt tgt.txt 4\n");
    }

    #[test]
    fn score_of_empty_alignment_is_zero() {
        let source = Text::new();
        let target = Text::new();
        let mut buf = Vec::new();
        write_score(&mut buf, &[], "a", "b").unwrap();
        let _ = (source, target);
        assert_eq!(String::from_utf8(buf).unwrap(), "a b 0\n");
    }

    #[test]
    fn readable_blocks_separate_source_and_target() {
        let out = render(OutputFormat::Readable);
        let expected = concat!(
            "1(s1):\t AAAA\n",
            "---------------------------------------------------\n",
            "1(t1):\t AAAA\n",
            "***************************************************\n",
            "2(s2):\t BBBB\n",
            "---------------------------------------------------\n",
            "***************************************************\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn selector_parses_known_names_only() {
        assert!("links".parse::<OutputFormat>().is_ok());
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
