use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sentalign::{align_files, print_alignment, AlignError, Config, InputFormat, OutputFormat};
use sentalign_core::CategorySpec;
use tracing_subscriber::EnvFilter;

/// Aligns two parallel texts at the sentence level.
#[derive(Debug, Parser)]
#[command(name = "sentalign", version, about)]
struct Cli {
    /// Source-language input file.
    source: PathBuf,

    /// Target-language input file.
    target: PathBuf,

    /// Input format: ospl, rali, arcade or cesana.
    #[arg(short = 'i', long, default_value = "rali")]
    input_format: String,

    /// Output format: links, cesalign, beads, score or readable.
    #[arg(short = 'o', long, default_value = "beads")]
    output_format: String,

    /// Write the alignment here instead of standard output.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Input decompression filter; only "none" is available.
    #[arg(short = 'z', long, default_value = "none")]
    decompress: String,

    /// Base configuration as a TOML file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cognate mode: none, identity or prefix.
    #[arg(short = 'c', long)]
    cognate_mode: Option<String>,

    /// Minimum length of an alphabetic cognate candidate.
    #[arg(short = 'l', long)]
    min_cognate_length: Option<usize>,

    /// Frequency cap on both sides of a cognate candidate link.
    #[arg(short = 'n', long)]
    max_cognate_frequency: Option<usize>,

    /// Frequency cap for passage-point words.
    #[arg(short = 'N', long)]
    max_passage_frequency: Option<usize>,

    /// Prefix length compared in prefix mode.
    #[arg(short = 'p', long)]
    prefix_length: Option<usize>,

    /// Search-space filler: beam or cognate.
    #[arg(short = 'e', long)]
    search_space: Option<String>,

    /// Beam half-width in sentences.
    #[arg(short = 'b', long)]
    beam_radius: Option<usize>,

    /// Sentence band half-width for word-level hits; 0 = unrestricted.
    #[arg(short = 'd', long)]
    word_radius: Option<usize>,

    /// Extra source rows the word path may reach back through.
    #[arg(short = 'r', long)]
    return_count: Option<usize>,

    /// Cost of each return.
    #[arg(short = 'R', long)]
    return_cost: Option<f64>,

    /// Score function: length or composite.
    #[arg(short = 's', long)]
    score_function: Option<String>,

    /// Extra alignment category as source-target-probability (repeatable).
    #[arg(short = 'a', long = "category")]
    categories: Vec<String>,

    /// Expected target characters per source character.
    #[arg(short = 'P', long)]
    production: Option<f64>,

    /// Variance of the standardized length difference.
    #[arg(short = 'S', long)]
    variance: Option<f64>,

    /// Weight of the length match.
    #[arg(short = 'm', long)]
    match_weight: Option<f64>,

    /// Weight of the category penalty.
    #[arg(short = 'M', long)]
    penalty_weight: Option<f64>,

    /// Weight of the length term in the composite score.
    #[arg(short = 'w', long)]
    length_weight: Option<f64>,

    /// Weight of the cognate term in the composite score.
    #[arg(short = 'W', long)]
    cognate_weight: Option<f64>,

    /// Probability of a cognate link inside a translation.
    #[arg(short = 't', long)]
    p_in: Option<f64>,

    /// Probability of a cognate link by chance.
    #[arg(short = 'T', long)]
    p_out: Option<f64>,

    /// Insertion/deletion correction: none, length, cognate or both.
    #[arg(short = 'f', long)]
    gap_correction: Option<String>,

    /// Divisor applied by the correction.
    #[arg(short = 'F', long)]
    correction: Option<f64>,

    /// Bilingual lexicon file (repeatable).
    #[arg(short = 'L', long = "lexicon")]
    lexicons: Vec<PathBuf>,

    /// Verbose progress on standard error; repeat for more detail.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sentalign: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), AlignError> {
    if cli.decompress != "none" {
        return Err(AlignError::UnknownSelector {
            what: "input compression",
            value: cli.decompress.clone(),
        });
    }

    let input_format: InputFormat = cli.input_format.parse()?;
    let output_format: OutputFormat = cli.output_format.parse()?;
    let config = build_config(cli)?;

    tracing::info!(
        source = %cli.source.display(),
        target = %cli.target.display(),
        "aligning"
    );
    let (beads, source, target) = align_files(input_format, &cli.source, &cli.target, &config)?;
    tracing::info!(beads = beads.len(), "printing solution");

    let source_name = cli.source.display().to_string();
    let target_name = cli.target.display().to_string();

    let write = |out: &mut dyn Write| {
        print_alignment(
            output_format,
            out,
            &beads,
            &source,
            &target,
            &source_name,
            &target_name,
        )
    };

    let result = match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| AlignError::io(path, e))?;
            let mut out = BufWriter::new(file);
            write(&mut out).and_then(|_| out.flush())
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write(&mut out).and_then(|_| out.flush())
        }
    };

    result.map_err(|e| AlignError::MalformedInput(format!("can't write solution: {e}")))
}

fn build_config(cli: &Cli) -> Result<Config, AlignError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_toml(path)?,
        None => Config::default(),
    };

    if let Some(mode) = &cli.cognate_mode {
        config.cognate_mode = mode.parse()?;
    }
    if let Some(v) = cli.min_cognate_length {
        config.min_cognate_length = v;
    }
    if let Some(v) = cli.max_cognate_frequency {
        config.max_cognate_frequency = v;
    }
    if let Some(v) = cli.max_passage_frequency {
        config.max_passage_frequency = v;
    }
    if let Some(v) = cli.prefix_length {
        config.prefix_length = v;
    }
    if let Some(filler) = &cli.search_space {
        config.filler = filler.parse()?;
    }
    if let Some(v) = cli.beam_radius {
        config.beam_radius = v;
    }
    if let Some(v) = cli.word_radius {
        config.word_radius = v;
    }
    if let Some(v) = cli.return_count {
        config.return_count = v;
    }
    if let Some(v) = cli.return_cost {
        config.return_cost = v;
    }
    if let Some(score) = &cli.score_function {
        config.score = score.parse()?;
    }
    if let Some(v) = cli.production {
        config.production = v;
    }
    if let Some(v) = cli.variance {
        config.variance = v;
    }
    if let Some(v) = cli.match_weight {
        config.match_weight = v;
    }
    if let Some(v) = cli.penalty_weight {
        config.penalty_weight = v;
    }
    if let Some(v) = cli.length_weight {
        config.length_weight = v;
    }
    if let Some(v) = cli.cognate_weight {
        config.cognate_weight = v;
    }
    if let Some(v) = cli.p_in {
        config.p_in = v;
    }
    if let Some(v) = cli.p_out {
        config.p_out = v;
    }
    if let Some(mode) = &cli.gap_correction {
        config.gap_correction = mode.parse()?;
    }
    if let Some(v) = cli.correction {
        config.correction = v;
    }

    // Extra categories land on top of the defaults; re-registering a shape
    // replaces its probability.
    for spec in &cli.categories {
        let spec: CategorySpec = spec.parse()?;
        match config
            .categories
            .iter_mut()
            .find(|c| c.source_len == spec.source_len && c.target_len == spec.target_len)
        {
            Some(existing) => existing.probability = spec.probability,
            None => config.categories.push(spec),
        }
    }

    config.lexicons.extend(cli.lexicons.iter().cloned());

    config.validate()?;
    Ok(config)
}
