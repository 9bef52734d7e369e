//! Process-wide COM apartment shared by every handle.
//!
//! The apartment is brought up by a keeper thread when the first handle is
//! constructed and torn down when the last one is closed. While the keeper
//! holds the multithreaded apartment, any thread that has not initialized
//! COM itself runs in the implicit MTA and may call into handles freely.

use std::sync::mpsc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::com_guard::ComGuard;
use crate::error::{AdsiError, AdsiResult};

static GLOBAL: ComRuntime = ComRuntime::new();

/// Reference-counted owner of the process-wide COM apartment.
///
/// Each live handle holds one [`RuntimeToken`]. The count never goes
/// negative, and the apartment is only torn down once it is back at zero.
pub struct ComRuntime {
    state: Mutex<RuntimeState>,
}

struct RuntimeState {
    live: usize,
    keeper: Option<Keeper>,
}

impl ComRuntime {
    /// Creates an idle runtime. Most callers want [`ComRuntime::global`].
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RuntimeState {
                live: 0,
                keeper: None,
            }),
        }
    }

    /// The runtime used by handle constructors that do not take one.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers one more live handle, starting the apartment on 0 -> 1.
    ///
    /// Never fails. If the apartment cannot be started the failure is
    /// logged and the token still counts, so acquire/release stay paired.
    pub fn acquire(&'static self) -> RuntimeToken {
        let mut state = self.state.lock();
        if state.live == 0 {
            match Keeper::start() {
                Ok(keeper) => {
                    tracing::debug!("COM runtime started");
                    state.keeper = Some(keeper);
                }
                Err(e) => {
                    tracing::error!(error = %e, "COM runtime failed to start");
                }
            }
        }
        state.live += 1;
        tracing::trace!(live = state.live, "COM runtime acquired");
        RuntimeToken { runtime: self }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        let Some(live) = state.live.checked_sub(1) else {
            tracing::error!("COM runtime released more often than acquired");
            return;
        };
        state.live = live;
        tracing::trace!(live, "COM runtime released");
        if live == 0 {
            if let Some(keeper) = state.keeper.take() {
                keeper.stop();
                tracing::debug!("COM runtime stopped");
            }
        }
    }

    /// Number of tokens currently outstanding.
    pub fn live_handles(&self) -> usize {
        self.state.lock().live
    }

    /// `true` while the keeper thread holds the apartment open.
    pub fn is_active(&self) -> bool {
        self.state.lock().keeper.is_some()
    }
}

impl Default for ComRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ComRuntime")
            .field("live", &state.live)
            .field("active", &state.keeper.is_some())
            .finish()
    }
}

/// One counted reference on a [`ComRuntime`].
///
/// Dropping the token releases the reference; cloning acquires another
/// one on the same runtime.
#[must_use = "dropping the token releases the COM runtime reference"]
pub struct RuntimeToken {
    runtime: &'static ComRuntime,
}

impl RuntimeToken {
    /// The runtime this token counts against.
    pub fn runtime(&self) -> &'static ComRuntime {
        self.runtime
    }
}

impl Clone for RuntimeToken {
    fn clone(&self) -> Self {
        self.runtime.acquire()
    }
}

impl Drop for RuntimeToken {
    fn drop(&mut self) {
        self.runtime.release();
    }
}

impl std::fmt::Debug for RuntimeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeToken").finish_non_exhaustive()
    }
}

/// Thread that holds the MTA open until told to stop.
struct Keeper {
    shutdown: mpsc::Sender<()>,
    thread: JoinHandle<()>,
}

impl Keeper {
    fn start() -> AdsiResult<Self> {
        let (init_tx, init_rx) = mpsc::sync_channel::<AdsiResult<()>>(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("adsi-com-runtime".into())
            .spawn(move || {
                let _guard = match ComGuard::new() {
                    Ok(guard) => {
                        let _ = init_tx.send(Ok(()));
                        guard
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                };

                // Returns on an explicit stop or when the sender is dropped.
                let _ = shutdown_rx.recv();
                tracing::debug!("COM runtime keeper exiting cleanly");
            })
            .map_err(|e| AdsiError::Runtime(format!("failed to spawn keeper thread: {e}")))?;

        init_rx
            .recv()
            .map_err(|_| AdsiError::Runtime("keeper thread exited during init".into()))??;

        Ok(Self {
            shutdown: shutdown_tx,
            thread,
        })
    }

    fn stop(self) {
        let _ = self.shutdown.send(());
        if self.thread.join().is_err() {
            tracing::error!("COM runtime keeper thread panicked");
        }
    }
}
