use anyhow::{Context, Result};
use linebar::{terminal_tracker, DisplayOptions, ProgressTracker, Unit};
use std::io::Stdout;
use tracing::debug;

/// A stdout bar that follows terminal resizes until [`ProgressTracker::shutdown`].
pub fn terminal_bar(
    total: u64,
    options: DisplayOptions,
    unit: Unit,
) -> Result<ProgressTracker<Stdout>> {
    let bar = terminal_tracker(total, options, unit).context("Failed to start progress bar")?;
    debug!(
        total,
        %unit,
        columns = bar.width(),
        ?options,
        "Progress bar ready"
    );
    Ok(bar)
}
