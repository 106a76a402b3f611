use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::error::{TokenError, TokenResult};
use crate::persist::store::{PersistenceStore, save_doc};
use crate::scene::model::CanvasDoc;

/// Timing for [`DebouncedWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceOpts {
    /// How long the document must stay unchanged before it is written.
    pub quiet_period: Duration,
}

impl Default for DebounceOpts {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(500),
        }
    }
}

enum Msg {
    Schedule(Box<CanvasDoc>),
    Flush(mpsc::Sender<()>),
    Cancel,
    Shutdown,
}

/// Coalesces rapid document edits into one write per quiet period.
///
/// The store lives on a background thread. Write failures are logged there and never reach
/// the caller. Dropping the writer flushes whatever is still pending.
pub struct DebouncedWriter {
    tx: mpsc::Sender<Msg>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for DebouncedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedWriter")
            .field("running", &self.worker.is_some())
            .finish()
    }
}

impl DebouncedWriter {
    pub fn new<S>(store: S, opts: DebounceOpts) -> TokenResult<Self>
    where
        S: PersistenceStore + 'static,
    {
        let (tx, rx) = mpsc::channel::<Msg>();
        let worker = std::thread::Builder::new()
            .name("tokensmith-persist".into())
            .spawn(move || run(store, rx, opts.quiet_period))
            .map_err(|e| TokenError::validation(format!("spawn persistence thread: {e}")))?;
        Ok(Self {
            tx,
            worker: Some(worker),
        })
    }

    /// Replace any pending write with `doc` and restart the quiet period.
    pub fn schedule(&self, doc: &CanvasDoc) {
        self.send(Msg::Schedule(Box::new(doc.clone())));
    }

    /// Write the pending document now and wait for it to land.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.send(Msg::Flush(ack_tx)) {
            let _ = ack_rx.recv();
        }
    }

    /// Drop the pending document without writing it.
    pub fn cancel(&self) {
        self.send(Msg::Cancel);
    }

    fn send(&self, msg: Msg) -> bool {
        if self.tx.send(msg).is_err() {
            tracing::warn!("persistence thread is gone; dropping request");
            return false;
        }
        true
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(Msg::Shutdown);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::error!("persistence thread panicked");
        }
    }
}

fn run<S: PersistenceStore>(mut store: S, rx: mpsc::Receiver<Msg>, quiet: Duration) {
    let mut pending: Option<(Box<CanvasDoc>, Instant)> = None;
    loop {
        let deadline = pending.as_ref().map(|(_, d)| *d);
        let msg = match deadline {
            None => match rx.recv() {
                Ok(m) => m,
                Err(_) => return,
            },
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(m) => m,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        write_pending(&mut store, &mut pending);
                        continue;
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        write_pending(&mut store, &mut pending);
                        return;
                    }
                }
            }
        };
        match msg {
            Msg::Schedule(doc) => pending = Some((doc, Instant::now() + quiet)),
            Msg::Flush(ack) => {
                write_pending(&mut store, &mut pending);
                let _ = ack.send(());
            }
            Msg::Cancel => pending = None,
            Msg::Shutdown => {
                write_pending(&mut store, &mut pending);
                return;
            }
        }
    }
}

fn write_pending<S: PersistenceStore>(
    store: &mut S,
    pending: &mut Option<(Box<CanvasDoc>, Instant)>,
) {
    if let Some((doc, _)) = pending.take() {
        match save_doc(store, &doc) {
            Ok(()) => tracing::debug!("canvas persisted"),
            Err(e) => tracing::warn!(error = %e, "failed to persist canvas"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/debounce.rs"]
mod tests;
