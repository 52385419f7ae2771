//! Command-line argument surface.
//!
//! Mirrors the reference driver's `ArgumentParser` block in
//! `dmd.py::__main__`: positional channels, a broadcastable `--modes`, a
//! pattern-index subset, repeat/padding/blanking controls, and an
//! illumination time used when the sequence isn't externally triggered.

use clap::Parser;

/// Program a DLPC900 pattern sequence from a saved channel/mode preset
/// table.
#[derive(Parser, Debug)]
#[command(name = "dlpc900")]
#[command(about = "Set a DLPC900 DMD pattern sequence from the command line")]
#[command(version)]
pub struct Args {
    /// Channels to program, e.g. `red green`. Each must be a key in the
    /// saved configuration's channel map.
    #[arg(required = true)]
    pub channels: Vec<String>,

    /// Mode to use for each channel. A single value is broadcast to every
    /// channel; otherwise supply one per channel.
    #[arg(short = 'm', long = "modes", default_value = "default")]
    pub modes: Vec<String>,

    /// Among the patterns in the resolved channel/mode preset, only use
    /// these indices (0-based), in the order given. Omit to use the whole
    /// preset in its stored order.
    #[arg(short = 'i', long = "pattern_indices")]
    pub pattern_indices: Option<Vec<usize>>,

    /// Number of times to repeat the (possibly subset) pattern list for
    /// each channel.
    #[arg(short = 'r', long, default_value_t = 1)]
    pub nrepeats: u32,

    /// Number of "off" frames to prepend to each channel's sequence.
    #[arg(long = "noff_before", default_value_t = 0)]
    pub noff_before: u32,

    /// Number of "off" frames to append to each channel's sequence.
    #[arg(long = "noff_after", default_value_t = 0)]
    pub noff_after: u32,

    /// Insert an "off" frame after every pattern, to blank an attached
    /// light source between exposures.
    #[arg(short = 'b', long, default_value_t = false)]
    pub blank: bool,

    /// Wait for an external trigger before advancing to each pattern,
    /// instead of free-running.
    #[arg(short = 't', long, default_value_t = false)]
    pub triggered: bool,

    /// Illumination time in microseconds. Ignored if `triggered` is set.
    #[arg(long = "illumination_time", default_value_t = dlpc900_upload::MIN_EXPOSURE_US)]
    pub illumination_time: u32,

    /// Number of times the whole LUT sequence should repeat once
    /// programmed, or 0 to repeat indefinitely.
    #[arg(long = "num_repeats", default_value_t = 0)]
    pub num_repeats: u32,

    /// Path to the saved JSON configuration document.
    #[arg(short = 'c', long, default_value = "dlpc900_config.json")]
    pub config: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print more verbose DMD programming information.
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}
