//! Classification experiment CLI.
//!
//! Runs a cross-validated experiment (or a backend comparison) and writes
//! JSON / Markdown reports.
//!
//! # Usage
//!
//! ```bash
//! # 5-fold cross-validation on a CSV file, reports to results/survey.{json,md}
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --data survey.csv --k-folds 5 --output results/survey
//!
//! # Ordered training-size sweep with the keyword backend
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --data survey.csv --model keywords --train-sizes 20,40,80 --ordered
//!
//! # Backend comparison on a synthetic corpus
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --synthetic 300 --compare -v
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use sdr_text_benchmark::config::{ExperimentConfig, SplitPolicy};
use sdr_text_benchmark::datasets::{load_csv, CorpusGenerator, GeneratorConfig, LabeledDataset};
use sdr_text_benchmark::reports::{ExperimentReport, ReportFormat};
use sdr_text_benchmark::runners::{ComparisonRunner, ExperimentRunner};
use sdr_text_core::{LoggingConfig, ModelKind};

#[derive(Parser, Debug)]
#[command(name = "sdr-text-bench")]
#[command(version)]
#[command(about = "Cross-validated evaluation of sparse-pattern text classifiers")]
struct Cli {
    /// TOML experiment configuration (defaults to config/ layering and SDR_TEXT__ env vars)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Labeled CSV input
    #[arg(short, long, conflicts_with = "synthetic")]
    data: Option<PathBuf>,

    /// Generate a synthetic corpus with this many samples
    #[arg(long)]
    synthetic: Option<usize>,

    /// Encoder backend: random_sdr, fingerprint or keywords
    #[arg(short, long)]
    model: Option<ModelKind>,

    /// Number of cross-validation folds
    #[arg(short, long, conflicts_with = "train_sizes")]
    k_folds: Option<usize>,

    /// Comma-separated training-set sizes, one trial each
    #[arg(long, value_delimiter = ',')]
    train_sizes: Option<Vec<usize>>,

    /// Train on the first samples instead of a random draw (with --train-sizes)
    #[arg(long)]
    ordered: bool,

    /// Keep input order when cutting k-fold blocks
    #[arg(long)]
    no_shuffle: bool,

    /// Maximum winning labels per sample
    #[arg(long)]
    num_labels: Option<usize>,

    /// Pattern size n
    #[arg(long)]
    bits: Option<usize>,

    /// Active bits per pattern w
    #[arg(long)]
    active_bits: Option<usize>,

    /// Seed for splits, tie-breaking and synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// JSON fingerprint cache for the fingerprint backend
    #[arg(long)]
    fingerprint_cache: Option<PathBuf>,

    /// Run every backend on the same folds
    #[arg(long)]
    compare: bool,

    /// Report format: json, markdown or both
    #[arg(short, long, default_value = "both")]
    format: ReportFormat,

    /// Base path for report files (extension added per format); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the encoding log and classification CSVs
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Write encoding_log.json
    #[arg(long)]
    write_encodings: bool,

    /// Write one classifications CSV per fold
    #[arg(long)]
    write_classifications: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.init(),
    }
}

fn apply_overrides(cli: &Cli, mut config: ExperimentConfig) -> ExperimentConfig {
    if let Some(kind) = cli.model {
        config.model = config.model.switch_kind(kind);
    }
    if let Some(num_labels) = cli.num_labels {
        config.model = config.model.with_num_labels(num_labels);
    }
    if let Some(n) = cli.bits {
        config.model.n = n;
    }
    if let Some(w) = cli.active_bits {
        config.model.w = w;
    }
    if let Some(path) = &cli.fingerprint_cache {
        config.model.fingerprint_cache = Some(path.clone());
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
        config.model.tiebreak_seed = Some(seed);
    }
    if let Some(k) = cli.k_folds {
        config.split = SplitPolicy::KFold {
            k,
            shuffle: !cli.no_shuffle,
        };
    } else if let Some(sizes) = &cli.train_sizes {
        config.split = SplitPolicy::TrainSizes {
            sizes: sizes.clone(),
            ordered: cli.ordered,
        };
    }
    if let Some(data) = &cli.data {
        config.data_path = Some(data.clone());
    }
    if let Some(dir) = &cli.results_dir {
        config.results_dir = dir.clone();
    }
    config.write_encodings |= cli.write_encodings;
    config.write_classifications |= cli.write_classifications;
    config
}

fn load_dataset(cli: &Cli, config: &ExperimentConfig) -> Result<LabeledDataset> {
    if let Some(samples) = cli.synthetic {
        return Ok(CorpusGenerator::with_config(GeneratorConfig {
            seed: config.seed,
            num_samples: samples,
            ..Default::default()
        })
        .generate());
    }
    match &config.data_path {
        Some(path) => load_csv(path, &config.layout)
            .with_context(|| format!("loading dataset {}", path.display())),
        None => bail!("no input: pass --data <csv>, --synthetic <n>, or set data_path in the config"),
    }
}

fn emit(report: &ExperimentReport, format: ReportFormat, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            report
                .write_to_file(format, path)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let out = report.generate(format);
            if let Some(json) = out.json {
                println!("{}", json);
            }
            if let Some(md) = out.markdown {
                println!("{}", md);
            }
        }
    }
    Ok(())
}

fn write_classifications(report: &ExperimentReport, dir: &Path) -> Result<()> {
    let paths = report
        .write_classifications(dir)
        .with_context(|| format!("writing classifications to {}", dir.display()))?;
    info!(files = paths.len(), dir = %dir.display(), "classifications written");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => ExperimentConfig::from_file(path)?,
        None => ExperimentConfig::load()?,
    };
    let config = apply_overrides(&cli, base);
    config.validate()?;

    init_logging(cli.verbose, &config.logging);
    info!(experiment = %config.name, split = ?config.split, model = %config.model.kind, "configuration loaded");

    let dataset = load_dataset(&cli, &config)?;

    if cli.compare {
        let runner = ComparisonRunner::new(config.clone());
        let comparison = runner.run(&dataset)?;
        for (kind, results) in comparison.runs {
            eprintln!("{}", results.summary_text());
            let report = ExperimentReport::new(results);
            if config.write_classifications {
                write_classifications(&report, &runner.results_dir_for(kind))?;
            }
            let output = cli
                .output
                .as_ref()
                .map(|base| PathBuf::from(format!("{}_{}", base.display(), kind)));
            emit(&report, cli.format, output.as_ref())?;
        }
        return Ok(());
    }

    let results = ExperimentRunner::new(config.clone())?.run(&dataset)?;
    eprintln!("{}", results.summary_text());

    let report = ExperimentReport::new(results);
    if config.write_classifications {
        write_classifications(&report, &config.results_dir)?;
    }
    emit(&report, cli.format, cli.output.as_ref())
}
