//! Terminal width: where it comes from and where the renderer reads it.
//!
//! The renderer never asks the terminal directly. A [`WidthProvider`] is queried at
//! construction and again on every resize notification, and the result is published
//! through a [`WidthPublisher`]. Readers hold a [`CachedWidth`] and only ever see the
//! most recently published value.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use console::Term;
use tokio::sync::watch;

/// Columns assumed when the provider cannot report a width.
pub const DEFAULT_WIDTH: usize = 100;

pub trait WidthProvider: Send + Sync {
    /// Current column count, `None` when it cannot be determined.
    fn columns(&self) -> Option<usize>;
}

impl<F> WidthProvider for F
where
    F: Fn() -> Option<usize> + Send + Sync,
{
    fn columns(&self) -> Option<usize> {
        self()
    }
}

/// Queries the provider, falling back to [`DEFAULT_WIDTH`].
pub fn resolve_width(provider: &dyn WidthProvider) -> usize {
    provider.columns().unwrap_or(DEFAULT_WIDTH)
}

/// Width of the process' stdout terminal.
#[derive(Clone, Copy, Default)]
pub struct ConsoleWidth;

impl WidthProvider for ConsoleWidth {
    fn columns(&self) -> Option<usize> {
        Term::stdout()
            .size_checked()
            .map(|(_rows, columns)| columns as usize)
    }
}

/// Always reports the same width.
#[derive(Clone, Copy, Debug)]
pub struct FixedWidth(pub usize);

impl WidthProvider for FixedWidth {
    fn columns(&self) -> Option<usize> {
        Some(self.0)
    }
}

/// Width that can be changed from the outside. Clones share the value.
#[derive(Clone, Debug)]
pub struct ManualWidth {
    columns: Arc<AtomicUsize>,
}

impl ManualWidth {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: Arc::new(AtomicUsize::new(columns)),
        }
    }

    pub fn set(&self, columns: usize) {
        self.columns.store(columns, Ordering::Relaxed);
    }
}

impl WidthProvider for ManualWidth {
    fn columns(&self) -> Option<usize> {
        Some(self.columns.load(Ordering::Relaxed))
    }
}

/// Creates a publisher/reader pair seeded with `initial`.
pub fn cached_width(initial: usize) -> (WidthPublisher, CachedWidth) {
    let (tx, rx) = watch::channel(initial);
    (WidthPublisher { tx }, CachedWidth { rx })
}

/// Write side of the cached width.
#[derive(Debug)]
pub struct WidthPublisher {
    tx: watch::Sender<usize>,
}

impl WidthPublisher {
    /// Stores `columns`; returns whether the value changed.
    pub fn publish(&self, columns: usize) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == columns {
                false
            } else {
                *current = columns;
                true
            }
        })
    }

    pub fn subscribe(&self) -> CachedWidth {
        CachedWidth {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the cached width. Reads never block.
#[derive(Clone, Debug)]
pub struct CachedWidth {
    rx: watch::Receiver<usize>,
}

impl CachedWidth {
    /// A reader that nothing will ever update.
    pub fn fixed(columns: usize) -> Self {
        let (publisher, reader) = cached_width(columns);
        drop(publisher);
        reader
    }

    pub fn get(&self) -> usize {
        *self.rx.borrow()
    }

    /// Waits until a new width is published. Returns `false` once the publisher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
