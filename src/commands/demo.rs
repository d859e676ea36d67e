use anyhow::Result;
use linebar::ProgressTracker;
use std::{io::Write, time::Duration};
use tokio::time::sleep;
use tracing::info;

use crate::{cli::DemoArgs, ux::progress::terminal_bar, AppCtx};

pub async fn handle(args: DemoArgs, ctx: &AppCtx) -> Result<()> {
    let settings = ctx.settings_store.load()?;
    let options = args.display.apply(settings.display);
    let unit = args.unit.unwrap_or(settings.unit);
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(settings.delay_ms));

    info!(total = args.total, %unit, "Starting demo ...");

    let mut bar = terminal_bar(args.total, options, unit)?;
    walk(&mut bar, delay).await;
    bar.shutdown();

    info!("Done ✅");
    Ok(())
}

/// Walks `0..=total` one step at a time, redrawing after every step.
pub async fn walk<W: Write>(bar: &mut ProgressTracker<W>, delay: Duration) {
    for step in 0..=bar.total() {
        bar.update(step);
        sleep(delay).await;
    }
}
