//! Seeded train/eval split of a finished corpus.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use crate::error::CorpusError;
use crate::protocol::TrainingRecord;

pub const DEFAULT_EVAL_FRACTION: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSplit {
    pub train: Vec<TrainingRecord>,
    pub eval: Vec<TrainingRecord>,
}

/// Number of records held out for evaluation: `ceil(n * fraction)`, never
/// more than `n`.
pub fn eval_size(n: usize, eval_fraction: f64) -> usize {
    let fraction = eval_fraction.clamp(0.0, 1.0);
    ((n as f64 * fraction).ceil() as usize).min(n)
}

/// Shuffle with a fixed seed, then take the eval slice off the front.
pub fn split_corpus(mut records: Vec<TrainingRecord>, eval_fraction: f64, seed: u64) -> CorpusSplit {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);
    let train = records.split_off(eval_size(records.len(), eval_fraction));
    CorpusSplit {
        train,
        eval: records,
    }
}

/// Parse corpus text; blank lines are skipped, anything else must be a record.
pub fn parse_corpus(text: &str) -> Result<Vec<TrainingRecord>, CorpusError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            TrainingRecord::from_json_line(line).map_err(|e| CorpusError::InvalidRecord {
                line: i + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn read_corpus(path: &Path) -> Result<Vec<TrainingRecord>, CorpusError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CorpusError::io(format!("reading {}", path.display()), e))?;
    parse_corpus(&text)
}
