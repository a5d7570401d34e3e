//! sentalign
//!
//! Sentence aligner for parallel texts: wraps the alignment core with the
//! input-format parsers, output printers and file plumbing the command line
//! uses. Embeddings that already hold parsed [`Text`]s can call
//! [`sentalign_core::align`] directly.

pub mod formats;
pub use formats::{parse_text, InputFormat};

pub mod printers;
pub use printers::{print_alignment, OutputFormat};

pub use sentalign_core::{align, AlignError, Bead, Config, Text};

use std::path::Path;

/// Reads and parses one input file.
pub fn load_text(format: InputFormat, path: &Path) -> Result<Text, AlignError> {
    let content = std::fs::read_to_string(path).map_err(|e| AlignError::io(path, e))?;
    parse_text(format, &content)
}

/// Reads, parses and aligns a pair of files.
pub fn align_files(
    format: InputFormat,
    source_path: &Path,
    target_path: &Path,
    config: &Config,
) -> Result<(Vec<Bead>, Text, Text), AlignError> {
    let mut source = load_text(format, source_path)?;
    let target = load_text(format, target_path)?;
    let beads = align(&mut source, &target, config)?;
    Ok((beads, source, target))
}
