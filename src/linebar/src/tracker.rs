//! The progress state machine.
//!
//! A [`ProgressTracker`] owns the counters, the timing data and the display options
//! of one bar. Every mutation ends with a render, so the line on screen always
//! reflects the latest state (including elapsed time when the value itself did not
//! move). Invalid updates are ignored rather than reported: a progress display must
//! never get in the way of the work it is displaying.

use std::{
    io::{self, stdout, Stdout, Write},
    sync::Arc,
};

use futures_util::{stream::BoxStream, Stream, StreamExt};
use tracing::{debug, warn};

use crate::{
    clock::{Clock, SystemClock},
    error::TrackerError,
    format::format_magnitude,
    render::{render_line, Frame},
    resize::ResizeListener,
    terminal::{cached_width, resolve_width, CachedWidth, ConsoleWidth, WidthProvider},
    types::{DisplayOptions, Unit},
};

/// Value and time of the previous speed-enabled render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    value: u64,
    at_ms: u64,
}

pub struct ProgressTracker<W: Write = Stdout> {
    current: u64,
    total: u64,
    start_ms: u64,
    last_sample: Option<Sample>,
    width: CachedWidth,
    unit: Unit,
    total_display: String,
    options: DisplayOptions,
    clock: Arc<dyn Clock>,
    sink: W,
    /// A line was drawn without its final line break.
    line_open: bool,
    listener: Option<ResizeListener>,
}

/// Configures a [`ProgressTracker`] before it starts.
pub struct TrackerBuilder {
    total: u64,
    options: DisplayOptions,
    unit: Unit,
    clock: Option<Arc<dyn Clock>>,
    width_provider: Option<Arc<dyn WidthProvider>>,
    resize_source: Option<BoxStream<'static, ()>>,
}

impl TrackerBuilder {
    fn new(total: u64) -> Self {
        Self {
            total,
            options: DisplayOptions::default(),
            unit: Unit::default(),
            clock: None,
            width_provider: None,
            resize_source: None,
        }
    }

    pub fn options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`ConsoleWidth`].
    pub fn width_provider(mut self, provider: Arc<dyn WidthProvider>) -> Self {
        self.width_provider = Some(provider);
        self
    }

    /// Re-reads the width each time `source` yields. Requires a tokio runtime at
    /// [`build`](Self::build) time.
    pub fn resize_source<S>(mut self, source: S) -> Self
    where
        S: Stream<Item = ()> + Send + 'static,
    {
        self.resize_source = Some(source.boxed());
        self
    }

    pub fn build<W: Write>(mut self, sink: W) -> Result<ProgressTracker<W>, TrackerError> {
        let provider = self
            .width_provider
            .take()
            .unwrap_or_else(|| Arc::new(ConsoleWidth));
        let (publisher, width) = cached_width(resolve_width(provider.as_ref()));

        let listener = match self.resize_source.take() {
            Some(source) => Some(ResizeListener::spawn(provider, source, publisher)?),
            None => None,
        };

        Ok(self.assemble(sink, width, listener))
    }

    fn assemble<W: Write>(
        self,
        sink: W,
        width: CachedWidth,
        listener: Option<ResizeListener>,
    ) -> ProgressTracker<W> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let start_ms = clock.now_millis();
        debug!(total = self.total, columns = width.get(), "Progress tracker created");

        ProgressTracker {
            current: 0,
            total: self.total,
            start_ms,
            last_sample: None,
            width,
            unit: self.unit,
            total_display: display_total(self.total, self.unit),
            options: self.options,
            clock,
            sink,
            line_open: false,
            listener,
        }
    }
}

impl ProgressTracker<Stdout> {
    /// A tracker drawing to stdout with the console's width at creation time.
    ///
    /// Nothing follows terminal resizes; use [`ProgressTracker::builder`] with a
    /// resize source for that.
    pub fn new(total: u64) -> Self {
        let builder = TrackerBuilder::new(total);
        let width = CachedWidth::fixed(resolve_width(&ConsoleWidth));
        builder.assemble(stdout(), width, None)
    }

    pub fn builder(total: u64) -> TrackerBuilder {
        TrackerBuilder::new(total)
    }
}

impl<W: Write> ProgressTracker<W> {
    // ========================================================================
    // Configuration
    // ========================================================================

    /// Switches the unit. Lines already written keep their old formatting.
    pub fn set_unit(&mut self, unit: Unit) -> &mut Self {
        self.unit = unit;
        self.total_display = display_total(self.total, unit);
        self
    }

    pub fn reconfigure(&mut self, options: DisplayOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn show_progress(&mut self, flag: bool) -> &mut Self {
        self.options.progress = flag;
        self
    }

    pub fn show_percent(&mut self, flag: bool) -> &mut Self {
        self.options.percent = flag;
        self
    }

    pub fn show_speed(&mut self, flag: bool) -> &mut Self {
        self.options.speed = flag;
        self
    }

    pub fn show_used_time(&mut self, flag: bool) -> &mut Self {
        self.options.used_time = flag;
        self
    }

    pub fn show_remaining_time(&mut self, flag: bool) -> &mut Self {
        self.options.remaining_time = flag;
        self
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Moves to `value` if it is ahead of the current position and within the total,
    /// then redraws.
    pub fn update(&mut self, value: u64) {
        if value > self.current && value <= self.total {
            self.current = value;
        } else {
            debug!(
                value,
                current = self.current,
                total = self.total,
                "Ignoring progress update"
            );
        }
        self.render();
    }

    /// Advances by one unless already complete, then redraws.
    pub fn increment(&mut self) {
        if self.current < self.total {
            self.current += 1;
        }
        self.render();
    }

    /// Draws the current state.
    pub fn render(&mut self) {
        let now = self.clock.now_millis();
        let rate = if self.options.speed {
            self.rate_since_sample(now)
        } else {
            None
        };

        let line = {
            let frame = self.frame(now, rate);
            render_line(&frame, self.width.get())
        };
        match self.write_line(&line) {
            Ok(()) => self.line_open = !line.ends_with('\n'),
            Err(e) => warn!(error = %e, "Failed to draw progress bar"),
        }

        if self.options.speed {
            self.last_sample = Some(Sample {
                value: self.current,
                at_ms: now,
            });
        }
    }

    /// Terminates an unfinished line so that later output starts on a fresh one.
    /// Does nothing when no line is open.
    pub fn end_line(&mut self) {
        if !self.line_open {
            return;
        }
        match self.write_line("\n") {
            Ok(()) => self.line_open = false,
            Err(e) => warn!(error = %e, "Failed to end progress line"),
        }
    }

    /// Stops following terminal resizes. The last known width stays in use.
    pub fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completion between 0.0 and 100.0; 0.0 when the total is zero.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The total as printed in the `current/total` annotation.
    pub fn total_display(&self) -> &str {
        &self.total_display
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    /// Width the next render will lay out for.
    pub fn width(&self) -> usize {
        self.width.get()
    }

    /// A reader following the same width as this tracker.
    pub fn watch_width(&self) -> CachedWidth {
        self.width.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    pub fn is_following_resizes(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    fn frame(&self, now: u64, rate: Option<f64>) -> Frame<'_> {
        let elapsed_ms = now.saturating_sub(self.start_ms);
        let percent = self.percent();
        let remaining_ms = (percent > 0.0).then(|| {
            let elapsed = elapsed_ms as f64;
            (elapsed * (100.0 / percent) - elapsed) as u64
        });

        Frame {
            current: self.current,
            total: self.total,
            unit: self.unit,
            total_display: &self.total_display,
            percent,
            elapsed_ms,
            remaining_ms,
            rate,
            options: self.options,
        }
    }

    fn rate_since_sample(&self, now: u64) -> Option<f64> {
        let sample = self.last_sample?;
        let interval_ms = now.checked_sub(sample.at_ms).filter(|ms| *ms > 0)?;
        let moved = self.current.saturating_sub(sample.value) as f64;
        Some(moved / (interval_ms as f64 / 1000.0))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.sink.write_all(line.as_bytes())?;
        self.sink.flush()
    }
}

fn display_total(total: u64, unit: Unit) -> String {
    match unit {
        Unit::Raw => total.to_string(),
        Unit::Bytes => format_magnitude(total),
    }
}
