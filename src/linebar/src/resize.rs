//! Resize notifications and the task that turns them into fresh widths.

use std::sync::Arc;

use async_stream::stream;
use futures_util::{pin_mut, stream::BoxStream, Stream, StreamExt};
use tokio::{
    runtime::Handle,
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    error::TrackerError,
    terminal::{resolve_width, WidthProvider, WidthPublisher},
};

/// One item per terminal size change of the controlling terminal (SIGWINCH).
#[cfg(unix)]
pub fn window_changes() -> BoxStream<'static, ()> {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::warn;

    Box::pin(stream! {
        let mut signals = match signal(SignalKind::window_change()) {
            Ok(signals) => signals,
            Err(e) => {
                warn!(error = %e, "Could not listen for terminal resizes");
                return;
            }
        };
        while signals.recv().await.is_some() {
            yield ();
        }
    })
}

/// Terminal resizes are not observable here; the stream ends immediately.
#[cfg(not(unix))]
pub fn window_changes() -> BoxStream<'static, ()> {
    Box::pin(futures_util::stream::empty())
}

/// Sending half of a hand-driven resize source, see [`channel`].
#[derive(Clone, Debug)]
pub struct ResizeNotifier {
    tx: UnboundedSender<()>,
}

impl ResizeNotifier {
    /// Fires one notification. Returns `false` when nobody listens anymore.
    pub fn notify(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// A resize source driven by [`ResizeNotifier::notify`] instead of the terminal.
pub fn channel() -> (ResizeNotifier, BoxStream<'static, ()>) {
    let (tx, mut rx) = unbounded_channel();
    let source = stream! {
        while rx.recv().await.is_some() {
            yield ();
        }
    };
    (ResizeNotifier { tx }, Box::pin(source))
}

/// Background task re-reading the width on every notification.
///
/// The task stops when the source ends, when [`shutdown`](Self::shutdown) is called
/// or when the handle is dropped.
#[derive(Debug)]
pub struct ResizeListener {
    task: JoinHandle<()>,
}

impl ResizeListener {
    pub fn spawn<S>(
        provider: Arc<dyn WidthProvider>,
        source: S,
        publisher: WidthPublisher,
    ) -> Result<Self, TrackerError>
    where
        S: Stream<Item = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| TrackerError::NoRuntime)?;
        let task = runtime.spawn(async move {
            pin_mut!(source);
            debug!("Resize listener started");
            while source.next().await.is_some() {
                let columns = resolve_width(provider.as_ref());
                if publisher.publish(columns) {
                    debug!(columns, "Terminal width changed");
                }
            }
            debug!("Resize source ended");
        });
        Ok(Self { task })
    }

    pub fn shutdown(&self) {
        if !self.task.is_finished() {
            debug!("Stopping resize listener");
        }
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
