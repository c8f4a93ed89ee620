use crate::drive::Drive;
use crate::enumerator::DeviceEnumerator;
use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Passes a drive list on only when it differs from the last one seen.
#[derive(Debug, Clone, Default)]
pub struct DriveListDebouncer {
    last: Vec<Drive>,
}

impl DriveListDebouncer {
    pub fn new(initial: Vec<Drive>) -> Self {
        DriveListDebouncer { last: initial }
    }

    pub fn observe(&mut self, fresh: Vec<Drive>) -> Option<Vec<Drive>> {
        if fresh == self.last {
            return None;
        }
        self.last = fresh.clone();
        Some(fresh)
    }
}

/// Background timer that polls a [`DeviceEnumerator`] and queues changed drive lists.
///
/// The timer lives exactly as long as this value: dropping it (or calling
/// [`DrivePoller::stop`]) stops the thread and waits for it, so no tick runs
/// after teardown.
pub struct DrivePoller {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    updates: Receiver<Vec<Drive>>,
}

impl DrivePoller {
    pub fn start<E>(enumerator: Arc<E>, initial: Vec<Drive>, interval: Duration) -> io::Result<Self>
    where
        E: DeviceEnumerator + Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (update_tx, updates) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("drive-poller".to_string())
            .spawn(move || poll_loop(enumerator.as_ref(), initial, interval, stop_rx, update_tx))?;
        info!("drive poller started ({} ms)", interval.as_millis());
        Ok(DrivePoller {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            updates,
        })
    }

    /// Next queued drive list, without blocking.
    pub fn try_next(&self) -> Option<Vec<Drive>> {
        self.updates.try_recv().ok()
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the loop with `Disconnected`.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("drive poller thread panicked");
            }
            debug!("drive poller stopped");
        }
    }
}

impl Drop for DrivePoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn poll_loop<E: DeviceEnumerator + ?Sized>(
    enumerator: &E,
    initial: Vec<Drive>,
    interval: Duration,
    stop_rx: Receiver<()>,
    update_tx: Sender<Vec<Drive>>,
) {
    let mut debouncer = DriveListDebouncer::new(initial);
    let mut failing = false;
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        let fresh = match enumerator.list_available_drives() {
            Ok(drives) => {
                failing = false;
                drives
            }
            Err(err) => {
                if !failing {
                    warn!("{}", err);
                    failing = true;
                }
                Vec::new()
            }
        };
        if let Some(changed) = debouncer.observe(fresh) {
            debug!("drive list changed ({} drives)", changed.len());
            if update_tx.send(changed).is_err() {
                break;
            }
        }
    }
}
