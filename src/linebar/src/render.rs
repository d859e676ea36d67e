//! Turns one [`Frame`] into one output line.
//!
//! Layout: `\r[<bar>]<annotations>`. The annotations are assembled first, in the
//! order percent, `current/total`, speed, time; the bar then takes whatever columns
//! are left (minus its two brackets). A finished frame ends with a line break so the
//! final state stays on screen.

use std::fmt::Write as _;

use crate::{
    format::{format_duration, format_magnitude},
    types::{DisplayOptions, Unit},
};

/// Scale applied to a byte rate before formatting; the sampled rate is read as KiB/s.
pub const BYTE_RATE_SCALE: f64 = 1024.0;

pub const FILL: char = '=';
pub const HEAD: char = '>';
pub const EMPTY: char = ' ';

/// Everything the renderer needs from the tracker for a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub current: u64,
    pub total: u64,
    pub unit: Unit,
    /// `total` already formatted for `unit`.
    pub total_display: &'a str,
    /// 0.0 ..= 100.0
    pub percent: f64,
    pub elapsed_ms: u64,
    /// Only known once some progress was made.
    pub remaining_ms: Option<u64>,
    /// Units per second since the previous sample.
    pub rate: Option<f64>,
    pub options: DisplayOptions,
}

impl Frame<'_> {
    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }
}

/// Renders `frame` for a terminal `width` columns wide.
pub fn render_line(frame: &Frame<'_>, width: usize) -> String {
    let annotations = annotations(frame);
    let bar_width = bar_width(width, &annotations);

    let mut line = String::with_capacity(width + 4);
    line.push_str("\r[");
    line.push_str(&bar(bar_width, frame.percent));
    line.push(']');
    line.push_str(&annotations);
    if frame.is_finished() {
        line.push('\n');
    }
    line
}

/// Columns left for the bar glyphs once annotations and brackets are placed.
pub fn bar_width(width: usize, annotations: &str) -> usize {
    width.saturating_sub(annotations.chars().count() + 2)
}

/// Number of fill glyphs for `percent` on a bar `bar_width` wide.
pub fn filled_len(bar_width: usize, percent: f64) -> usize {
    let filled = (bar_width as f64 * percent / 100.0).floor();
    (filled.max(0.0) as usize).min(bar_width)
}

pub fn bar(bar_width: usize, percent: f64) -> String {
    let filled = filled_len(bar_width, percent);
    (0..bar_width)
        .map(|i| {
            if i < filled {
                FILL
            } else if i == filled {
                HEAD
            } else {
                EMPTY
            }
        })
        .collect()
}

/// The text that follows the closing bracket.
pub fn annotations(frame: &Frame<'_>) -> String {
    let options = &frame.options;
    let mut out = String::new();

    if options.percent {
        let _ = write!(out, " {:.1}%", frame.percent);
    }

    if options.progress {
        let current = current_display(frame);
        if options.percent {
            let _ = write!(out, " ({}/{})", current, frame.total_display);
        } else {
            let _ = write!(out, " {}/{}", current, frame.total_display);
        }
    }

    if options.speed {
        if let Some(rate) = frame.rate {
            match frame.unit {
                Unit::Bytes => {
                    let bytes = (rate * BYTE_RATE_SCALE) as u64;
                    let _ = write!(out, " ({}/s)", format_magnitude(bytes));
                }
                Unit::Raw => {
                    let _ = write!(out, " ({:7.2} items/s)", rate);
                }
            }
        }
    }

    let used = format_duration(frame.elapsed_ms);
    match (options.used_time, options.remaining_time, frame.remaining_ms) {
        (true, true, Some(remaining)) => {
            let _ = write!(out, " [{}/{}]", used, format_duration(remaining));
        }
        (used_time, remaining_time, remaining) => {
            if used_time {
                let _ = write!(out, " [used:{}]", used);
            }
            if let (true, Some(remaining)) = (remaining_time, remaining) {
                let _ = write!(out, " [left:{}]", format_duration(remaining));
            }
        }
    }

    out
}

/// `current` formatted like the total so the fraction keeps a stable width.
fn current_display(frame: &Frame<'_>) -> String {
    match frame.unit {
        Unit::Bytes => format_magnitude(frame.current),
        Unit::Raw => format!(
            "{:>width$}",
            frame.current,
            width = frame.total_display.len()
        ),
    }
}
