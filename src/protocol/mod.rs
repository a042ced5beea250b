//! The line protocol shared by the training corpus and the generator.
//!
//! ```text
//! <|input|>distance:{D},canvas:{C}<|output|>{dx},{dy},{dt};...<|end|>
//! ```

pub mod decoder;
pub mod encoder;

pub use decoder::{decode, parse_point, Clamp};
pub use encoder::{encode, TrainingRecord};

pub const INPUT_MARKER: &str = "<|input|>";
pub const OUTPUT_MARKER: &str = "<|output|>";
pub const END_MARKER: &str = "<|end|>";
pub const POINT_SEPARATOR: char = ';';
pub const FIELD_SEPARATOR: char = ',';

/// Canvas width used for generation requests when none is given.
pub const DEFAULT_CANVAS_LENGTH: i64 = 280;

/// The prefix handed to the generator: everything up to and including the
/// output marker.
pub fn prompt(target_distance: i64, canvas_length: i64) -> String {
    format!("{INPUT_MARKER}distance:{target_distance},canvas:{canvas_length}{OUTPUT_MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_matches_generation_prefix() {
        assert_eq!(
            prompt(120, DEFAULT_CANVAS_LENGTH),
            "<|input|>distance:120,canvas:280<|output|>"
        );
    }
}
