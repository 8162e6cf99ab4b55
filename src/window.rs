/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Resolve-once response windows for threaded presenters.
//!
//! A [`ResponseWindow`] races a timeout against a one-shot response channel.
//! Whichever side first wins the compare-and-swap on the shared `resolved`
//! flag closes the window; the other side becomes a no-op. A response that
//! arrives after the window closed is dropped and reported as such, so it can
//! never be counted against the next trial.
//!
//! [`ResponseSlot`] holds the handle of the currently open window so an input
//! thread can route answers without knowing which trial is running.
//!
//! Requires the `std` feature.

use std::string::String;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, warn};

use crate::sequencer::Response;

/// The waiting side of a response window.
#[derive(Debug)]
pub struct ResponseWindow {
    rx: Receiver<String>,
    // Keeps the channel connected so `recv_timeout` only ends on data or expiry.
    _keepalive: SyncSender<String>,
    resolved: Arc<AtomicBool>,
}

/// The answering side of a response window. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ResponseHandle {
    tx: SyncSender<String>,
    resolved: Arc<AtomicBool>,
}

impl ResponseWindow {
    /// Open a window and the handle that can answer it.
    pub fn open() -> (ResponseWindow, ResponseHandle) {
        let (tx, rx) = mpsc::sync_channel(1);
        let resolved = Arc::new(AtomicBool::new(false));
        let handle = ResponseHandle {
            tx: tx.clone(),
            resolved: Arc::clone(&resolved),
        };
        let window = ResponseWindow {
            rx,
            _keepalive: tx,
            resolved,
        };
        (window, handle)
    }

    /// Block until a response is submitted or `timeout` expires.
    pub fn wait(self, timeout: Duration) -> Response {
        match self.rx.recv_timeout(timeout) {
            Ok(id) => Response::Chosen(id),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                if self.claim() {
                    debug!("response window expired after {:?}", timeout);
                    Response::Timeout
                } else {
                    // A submitter won the race and its send is already under way.
                    match self.rx.recv() {
                        Ok(id) => Response::Chosen(id),
                        Err(_) => Response::Timeout,
                    }
                }
            }
        }
    }

    /// Whether either side has closed the window.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }

    fn claim(&self) -> bool {
        self.resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl ResponseHandle {
    /// Answer the window. Returns `false`, dropping the answer, if it already closed.
    pub fn submit(&self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self
            .resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("late response {:?} ignored; window already closed", id);
            return false;
        }
        // Capacity 1 and a single winner: this cannot be full.
        self.tx.try_send(id).is_ok()
    }

    /// Whether the window still accepts an answer.
    pub fn is_open(&self) -> bool {
        !self.resolved.load(Ordering::Acquire)
    }
}

/// Shared mailbox pointing at the window of the current trial.
#[derive(Clone, Debug, Default)]
pub struct ResponseSlot {
    current: Arc<Mutex<Option<ResponseHandle>>>,
}

impl ResponseSlot {
    /// Empty slot; submissions are dropped until a window is opened.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh window and make it the target of [`ResponseSlot::submit`].
    pub fn open_window(&self) -> ResponseWindow {
        let (window, handle) = ResponseWindow::open();
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        window
    }

    /// Route an answer to the current window. `false` if none is open.
    pub fn submit(&self, id: impl Into<String>) -> bool {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(handle) => handle.submit(id),
            None => false,
        }
    }

    /// Open a window and wait on it: the body of a threaded `Presenter::await_response`.
    pub fn await_response(&self, timeout: Duration) -> Response {
        self.open_window().wait(timeout)
    }
}
