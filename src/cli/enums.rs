//! CLI enum types for output and timing options.

use clap::ValueEnum;

use crate::run_loop::Timing;

/// Where emitted actions are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Move the real pointer and press real keys
    #[default]
    System,
    /// Print one JSON action per line to stdout
    Json,
}

/// Frame timestamp source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimingSource {
    /// Arrival time of each frame
    #[default]
    Wall,
    /// The `t` field of each frame
    Stream,
}

impl From<TimingSource> for Timing {
    fn from(t: TimingSource) -> Self {
        match t {
            TimingSource::Wall => Timing::Wall,
            TimingSource::Stream => Timing::Stream,
        }
    }
}
