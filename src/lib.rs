// Library surface shared by the CLI and the integration tests.
pub mod app_dirs;
pub mod batch;
pub mod config;
pub mod error;
pub mod protocol;
pub mod quality;
pub mod split;
pub mod stats;
pub mod track;

pub use error::{CorpusError, FileError, ValidationError};
pub use protocol::{decode, encode, prompt, TrainingRecord};
pub use quality::QualityGate;
pub use track::{RawSession, TrackPoint, TrajectorySession};
