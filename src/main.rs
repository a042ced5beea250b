use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use slidetrack::batch::{self, ConversionSummary};
use slidetrack::config::{Config, ConfigStore, FileConfigStore};
use slidetrack::split::{self, DEFAULT_EVAL_FRACTION, DEFAULT_SEED};
use slidetrack::stats::TrajectorySummary;
use slidetrack::{decode, prompt, TrainingRecord};

/// build slider-trajectory training corpora and repair generated trajectories
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    /// config file to use instead of the per-user one
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// convert a directory of capture files into a JSONL corpus
    Convert {
        /// directory holding one *.json capture per session
        #[clap(long)]
        input_dir: PathBuf,

        /// JSONL file to write
        #[clap(long)]
        output_file: PathBuf,

        /// minimum total duration in milliseconds
        #[clap(long)]
        min_time: Option<i64>,

        /// maximum total duration in milliseconds
        #[clap(long)]
        max_time: Option<i64>,

        /// minimum number of track points
        #[clap(long)]
        min_points: Option<usize>,

        /// worker threads (0 = one per core)
        #[clap(long)]
        workers: Option<usize>,

        /// write the per-file report as CSV
        #[clap(long)]
        report_csv: Option<PathBuf>,

        /// write a JSON run summary
        #[clap(long)]
        summary_json: Option<PathBuf>,
    },

    /// repair raw generated text into a trajectory (reads stdin without --text)
    Decode {
        /// target drag distance in pixels
        #[clap(long)]
        distance: i64,

        /// generated text
        #[clap(long)]
        text: Option<String>,
    },

    /// print the generation prompt for a target distance
    Prompt {
        #[clap(long)]
        distance: i64,

        #[clap(long)]
        canvas: Option<i64>,
    },

    /// split a corpus into train and eval files
    Split {
        #[clap(long)]
        input: PathBuf,

        #[clap(long)]
        train: PathBuf,

        #[clap(long)]
        eval: PathBuf,

        #[clap(long, default_value_t = DEFAULT_EVAL_FRACTION)]
        eval_fraction: f64,

        #[clap(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// print the persisted configuration
    Config {
        /// overwrite the config file with defaults before printing it
        #[clap(long)]
        reset: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slidetrack=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let cfg = store.load();

    match cli.command {
        Command::Convert {
            input_dir,
            output_file,
            min_time,
            max_time,
            min_points,
            workers,
            report_csv,
            summary_json,
        } => {
            let cfg = Config {
                min_time_ms: min_time.unwrap_or(cfg.min_time_ms),
                max_time_ms: max_time.unwrap_or(cfg.max_time_ms),
                min_points: min_points.unwrap_or(cfg.min_points),
                workers: workers.unwrap_or(cfg.workers),
                ..cfg
            };
            run_convert(&cfg, input_dir, output_file, report_csv, summary_json)
        }
        Command::Decode { distance, text } => run_decode(distance, text),
        Command::Prompt { distance, canvas } => {
            println!("{}", prompt(distance, canvas.unwrap_or(cfg.canvas_length)));
            Ok(())
        }
        Command::Split {
            input,
            train,
            eval,
            eval_fraction,
            seed,
        } => run_split(input, train, eval, eval_fraction, seed),
        Command::Config { reset } => {
            let cfg = if reset {
                let cfg = Config::default();
                store
                    .save(&cfg)
                    .with_context(|| format!("writing {}", store.path().display()))?;
                cfg
            } else {
                cfg
            };
            println!("# {}", store.path().display());
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
    }
}

fn run_convert(
    cfg: &Config,
    input_dir: PathBuf,
    output_file: PathBuf,
    report_csv: Option<PathBuf>,
    summary_json: Option<PathBuf>,
) -> Result<()> {
    let gate = cfg.quality_gate();
    println!("input:  {}", input_dir.display());
    println!("output: {}", output_file.display());
    println!(
        "filter: duration {}-{}ms, at least {} points",
        gate.min_time_ms, gate.max_time_ms, gate.min_points
    );

    let started_at = chrono::Local::now();
    let report = batch::convert_dir(&input_dir, &output_file, &gate, cfg.workers)?;
    let finished_at = chrono::Local::now();

    for entry in &report.entries {
        let status = entry.status.to_string();
        match &entry.reason {
            Some(reason) => println!("{status:<4} {}: {reason}", entry.file),
            None => println!("{status:<4} {}", entry.file),
        }
    }
    println!(
        "total: {}, valid: {}, invalid: {}",
        report.total, report.valid, report.invalid
    );

    if let Some(path) = report_csv {
        let file =
            fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        report
            .write_csv(file)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(path) = summary_json {
        let summary = ConversionSummary {
            input_dir,
            output_file,
            started_at,
            finished_at,
            min_time_ms: gate.min_time_ms,
            max_time_ms: gate.max_time_ms,
            min_points: gate.min_points,
            total: report.total,
            valid: report.valid,
            invalid: report.invalid,
        };
        fs::write(&path, serde_json::to_vec_pretty(&summary)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

fn run_decode(distance: i64, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading generated text from stdin")?;
            buf
        }
    };

    let session = decode(&text, distance);
    println!("{}", serde_json::to_string(&session.points)?);
    eprintln!("{}", TrajectorySummary::of(&session));
    Ok(())
}

fn run_split(
    input: PathBuf,
    train: PathBuf,
    eval: PathBuf,
    eval_fraction: f64,
    seed: u64,
) -> Result<()> {
    let records = split::read_corpus(&input)?;
    let split = split::split_corpus(records, eval_fraction, seed);

    let lines = |records: &[TrainingRecord]| -> Vec<String> {
        records.iter().map(TrainingRecord::to_json_line).collect()
    };
    batch::write_lines(&train, &lines(&split.train))?;
    batch::write_lines(&eval, &lines(&split.eval))?;

    println!("train: {}, eval: {}", split.train.len(), split.eval.len());
    Ok(())
}
