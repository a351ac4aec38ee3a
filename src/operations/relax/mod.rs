mod racing_line;

pub use racing_line::{lateral_offset, RacingLine, RelaxRacingLine, DEFAULT_CORRECTION_GAIN};
