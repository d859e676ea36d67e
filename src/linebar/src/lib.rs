//! Single-line terminal progress bar redrawn in place with `\r`.
//!
//! * [`tracker`]: progress state, updates and rate/ETA bookkeeping.
//! * [`render`]: layout of one line for a given terminal width.
//! * [`format`]: duration and byte-size helpers.
//! * [`terminal`], [`resize`], [`clock`]: the injected collaborators.
//! * [`io`]: reader/writer adapters that drive a tracker.

pub mod clock;
pub mod error;
pub mod format;
pub mod io;
pub mod render;
pub mod resize;
pub mod terminal;
pub mod tracker;
pub mod types;

pub use error::TrackerError;
pub use tracker::{ProgressTracker, TrackerBuilder};
pub use types::{DisplayOptions, Unit};

use std::{io::Stdout, sync::Arc};

/// A stdout tracker that follows the terminal's width, resizes included.
///
/// Must be called from within a tokio runtime.
#[cfg(not(tarpaulin_include))]
pub fn terminal_tracker(
    total: u64,
    options: DisplayOptions,
    unit: Unit,
) -> Result<ProgressTracker<Stdout>, TrackerError> {
    ProgressTracker::builder(total)
        .options(options)
        .unit(unit)
        .width_provider(Arc::new(terminal::ConsoleWidth))
        .resize_source(resize::window_changes())
        .build(std::io::stdout())
}
