//! Directory-to-corpus conversion.
//!
//! Every capture file is validated and encoded independently. Failures are
//! recorded per file and never stop the batch; only structural problems with
//! the input directory or the output file are returned as errors.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info};

use crate::error::{CorpusError, FileError};
use crate::protocol::TrainingRecord;
use crate::quality::QualityGate;
use crate::track::RawSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Ok,
    Skip,
}

/// One row of the per-file report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub file: String,
    pub status: Status,
    pub reason: Option<String>,
}

/// Accumulated outcome of a batch, built by folding per-file results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub entries: Vec<ReportEntry>,
}

impl BatchReport {
    pub fn record(mut self, file: String, outcome: &Result<TrainingRecord, FileError>) -> Self {
        self.total += 1;
        let entry = match outcome {
            Ok(_) => {
                self.valid += 1;
                ReportEntry {
                    file,
                    status: Status::Ok,
                    reason: None,
                }
            }
            Err(e) => {
                self.invalid += 1;
                ReportEntry {
                    file,
                    status: Status::Skip,
                    reason: Some(e.to_string()),
                }
            }
        };
        self.entries.push(entry);
        self
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.status == Status::Skip)
    }

    /// Write the per-file table as `file,status,reason` CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Run-level summary suitable for archiving next to the corpus.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub min_time_ms: i64,
    pub max_time_ms: i64,
    pub min_points: usize,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Validate and encode a single capture file.
pub fn process_file(path: &Path, gate: &QualityGate) -> Result<TrainingRecord, FileError> {
    let bytes = fs::read(path)?;
    let raw = RawSession::from_json(&bytes)?;
    let session = gate.validate(&raw)?;
    Ok(TrainingRecord::from(&session))
}

/// `*.json` files directly inside `input_dir`, sorted by name.
pub fn list_inputs(input_dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !input_dir.exists() {
        return Err(CorpusError::MissingInputDir {
            path: input_dir.to_path_buf(),
        });
    }
    if !input_dir.is_dir() {
        return Err(CorpusError::NotADirectory {
            path: input_dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(input_dir)
        .map_err(|e| CorpusError::io(format!("reading {}", input_dir.display()), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| CorpusError::io(format!("reading {}", input_dir.display()), e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(CorpusError::NoInputFiles {
            path: input_dir.to_path_buf(),
        });
    }
    Ok(files)
}

fn resolve_workers(requested: usize, jobs: usize) -> usize {
    let wanted = if requested == 0 {
        thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        requested
    };
    wanted.clamp(1, jobs.max(1))
}

/// Process `files` on up to `workers` threads and return the corpus lines in
/// input order together with the report.
pub fn convert_files(
    files: &[PathBuf],
    gate: &QualityGate,
    workers: usize,
) -> (Vec<String>, BatchReport) {
    let workers = resolve_workers(workers, files.len());
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            scope.spawn(move || {
                for index in (worker..files.len()).step_by(workers) {
                    let outcome = process_file(&files[index], gate);
                    if tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<_> = rx.into_iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);

    let mut lines = Vec::new();
    let report = outcomes
        .into_iter()
        .fold(BatchReport::default(), |report, (index, outcome)| {
            let name = display_name(&files[index]);
            match &outcome {
                Ok(record) => {
                    debug!(file = %name, "accepted");
                    lines.push(record.to_json_line());
                }
                Err(e) => debug!(file = %name, reason = %e, "rejected"),
            }
            report.record(name, &outcome)
        });

    (lines, report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert every capture in `input_dir` into `output_file`, one JSONL record
/// per accepted session. The output is written even if nothing passes.
pub fn convert_dir(
    input_dir: &Path,
    output_file: &Path,
    gate: &QualityGate,
    workers: usize,
) -> Result<BatchReport, CorpusError> {
    let files = list_inputs(input_dir)?;
    info!(files = files.len(), input = %input_dir.display(), "converting captures");

    let (lines, report) = convert_files(&files, gate, workers);
    write_lines(output_file, &lines)?;

    info!(
        total = report.total,
        valid = report.valid,
        invalid = report.invalid,
        "conversion finished"
    );
    Ok(report)
}

/// Write `lines` to `path`, newline-terminated, creating parent directories.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), CorpusError> {
    let ctx = || format!("writing {}", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CorpusError::io(ctx(), e))?;
    }
    let file = fs::File::create(path).map_err(|e| CorpusError::io(ctx(), e))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{line}").map_err(|e| CorpusError::io(ctx(), e))?;
    }
    out.flush().map_err(|e| CorpusError::io(ctx(), e))
}
