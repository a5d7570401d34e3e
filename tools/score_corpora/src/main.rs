//! Batch scoring of parallel corpora.
//!
//! Reads a manifest with one `source_path target_path` pair per line
//! (blank lines and `#` comments skipped), aligns each pair with a shared
//! configuration and prints one `source target totalScore` line per pair.
//! Pairs that fail to parse are reported on stderr and counted; the exit
//! status is nonzero when any pair failed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sentalign::{align_files, Config, InputFormat};

#[derive(Debug, Parser)]
#[command(name = "score_corpora", version, about)]
struct Cli {
    /// Manifest file: one `source target` path pair per line.
    manifest: PathBuf,

    /// Input format of every pair: ospl, rali, arcade or cesana.
    #[arg(short = 'i', long, default_value = "rali")]
    input_format: String,

    /// Alignment configuration as TOML; defaults apply otherwise.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(failed) if failed == 0 => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("score_corpora: {failed} pair(s) failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("score_corpora: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize> {
    let cli = Cli::parse();

    let format: InputFormat = cli.input_format.parse()?;
    let config = match &cli.config {
        Some(path) => Config::load_toml(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let manifest = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("can't read manifest {}", cli.manifest.display()))?;

    let mut failed = 0usize;
    for (number, line) in manifest.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(source), Some(target)) = (parts.next(), parts.next()) else {
            eprintln!(
                "{}:{}: expected two paths, got {line:?}",
                cli.manifest.display(),
                number + 1
            );
            failed += 1;
            continue;
        };

        match score_pair(format, Path::new(source), Path::new(target), &config) {
            Ok(total) => println!("{source} {target} {total}"),
            Err(e) => {
                eprintln!("{source} {target}: {e}");
                failed += 1;
            }
        }
    }

    Ok(failed)
}

fn score_pair(
    format: InputFormat,
    source: &Path,
    target: &Path,
    config: &Config,
) -> Result<f64> {
    let (beads, ..) = align_files(format, source, target, config)?;
    Ok(beads.last().map(|b| b.score).unwrap_or(0.0))
}
