//! Reader/writer wrappers that advance a tracker by the bytes they move.
//!
//! Each successful non-empty `read`/`write` results in one tracker update (and so one
//! redraw). Counts beyond the tracker's total are clamped to the total.

use std::io::{self, Read, Write};

use crate::tracker::ProgressTracker;

/// Wraps a [`Read`] and reports bytes read to a [`ProgressTracker`].
pub struct ProgressReader<'a, R, S: Write> {
    inner: R,
    tracker: &'a mut ProgressTracker<S>,
}

impl<'a, R, S: Write> ProgressReader<'a, R, S> {
    pub fn new(inner: R, tracker: &'a mut ProgressTracker<S>) -> Self {
        Self { inner, tracker }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, S: Write> Read for ProgressReader<'_, R, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            advance(self.tracker, n);
        }
        Ok(n)
    }
}

/// Wraps a [`Write`] and reports bytes written to a [`ProgressTracker`].
pub struct ProgressWriter<'a, W, S: Write> {
    inner: W,
    tracker: &'a mut ProgressTracker<S>,
}

impl<'a, W, S: Write> ProgressWriter<'a, W, S> {
    pub fn new(inner: W, tracker: &'a mut ProgressTracker<S>) -> Self {
        Self { inner, tracker }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, S: Write> Write for ProgressWriter<'_, W, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            advance(self.tracker, n);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn advance<S: Write>(tracker: &mut ProgressTracker<S>, bytes: usize) {
    let target = tracker
        .current()
        .saturating_add(bytes as u64)
        .min(tracker.total());
    tracker.update(target);
}
