//! Open/closed lifecycle shared by every wrapper type.

use parking_lot::Mutex;

use crate::error::{AdsiError, AdsiResult, format_hresult};
use crate::runtime::{ComRuntime, RuntimeToken};

/// Exclusive owner of one native interface plus its runtime token.
///
/// `Some` is open, `None` is closed. Every operation, including
/// [`Handle::close`], runs under the same lock, so a call either sees a
/// live interface for its whole duration or fails with
/// [`AdsiError::Closed`] without touching native code.
pub(crate) struct Handle<N> {
    kind: &'static str,
    state: Mutex<Option<Live<N>>>,
}

struct Live<N> {
    native: N,
    token: RuntimeToken,
}

impl<N> Handle<N> {
    pub(crate) fn new(kind: &'static str, native: N) -> Self {
        Self::with_runtime(kind, native, ComRuntime::global())
    }

    pub(crate) fn with_runtime(kind: &'static str, native: N, runtime: &'static ComRuntime) -> Self {
        Self::with_token(kind, native, runtime.acquire())
    }

    /// Takes a token on `runtime` before running `factory`, so the
    /// apartment is up while the native object is created. The token is
    /// released again if `factory` fails.
    pub(crate) fn activate(
        kind: &'static str,
        runtime: &'static ComRuntime,
        factory: impl FnOnce() -> AdsiResult<N>,
    ) -> AdsiResult<Self> {
        let token = runtime.acquire();
        let native = factory()?;
        Ok(Self::with_token(kind, native, token))
    }

    pub(crate) fn with_token(kind: &'static str, native: N, token: RuntimeToken) -> Self {
        tracing::trace!(kind, "handle opened");
        Self {
            kind,
            state: Mutex::new(Some(Live { native, token })),
        }
    }

    /// Runs `op` against the live interface.
    pub(crate) fn call<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&N) -> AdsiResult<R>,
    ) -> AdsiResult<R> {
        let state = self.state.lock();
        let live = state.as_ref().ok_or(AdsiError::Closed)?;
        f(&live.native).inspect_err(|e| self.log_failure(op, e))
    }

    /// Runs `op` and wraps its result in a new handle on the same runtime.
    pub(crate) fn derive<M>(
        &self,
        op: &'static str,
        kind: &'static str,
        f: impl FnOnce(&N) -> AdsiResult<M>,
    ) -> AdsiResult<Handle<M>> {
        let state = self.state.lock();
        let live = state.as_ref().ok_or(AdsiError::Closed)?;
        let native = f(&live.native).inspect_err(|e| self.log_failure(op, e))?;
        Ok(Handle::with_token(kind, native, live.token.clone()))
    }

    /// [`Handle::derive`] for operations that advance native state.
    pub(crate) fn derive_mut<M>(
        &self,
        op: &'static str,
        kind: &'static str,
        f: impl FnOnce(&mut N) -> AdsiResult<Option<M>>,
    ) -> AdsiResult<Option<Handle<M>>> {
        let mut state = self.state.lock();
        let live = state.as_mut().ok_or(AdsiError::Closed)?;
        let next = f(&mut live.native).inspect_err(|e| self.log_failure(op, e))?;
        Ok(next.map(|native| Handle::with_token(kind, native, live.token.clone())))
    }

    /// Releases the interface and then the runtime token. Idempotent.
    ///
    /// Returns `true` if this call performed the transition.
    pub(crate) fn close(&self) -> bool {
        let mut state = self.state.lock();
        let Some(Live { native, token }) = state.take() else {
            return false;
        };
        // Interface first: its Release must run while the apartment is up.
        drop(native);
        drop(token);
        tracing::trace!(kind = self.kind, "handle closed");
        true
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().is_none()
    }

    fn log_failure(&self, op: &'static str, error: &AdsiError) {
        match error.code() {
            Some(hr) => tracing::debug!(kind = self.kind, op, hresult = %format_hresult(hr), "native call failed"),
            None => tracing::debug!(kind = self.kind, op, error = %error, "operation failed"),
        }
    }
}

impl<N> Drop for Handle<N> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<N> std::fmt::Debug for Handle<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.kind)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, Tracked};

    #[test]
    fn close_is_idempotent() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let handle = Handle::with_runtime("Test", probe.native(), &RUNTIME);
        assert_eq!(RUNTIME.live_handles(), 1);

        assert!(handle.close());
        assert!(!handle.close());
        assert!(handle.is_closed());
        assert_eq!(probe.releases(), 1);
        assert_eq!(RUNTIME.live_handles(), 0);
    }

    #[test]
    fn call_after_close_never_reaches_native() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let handle = Handle::with_runtime("Test", probe.native(), &RUNTIME);
        handle.call("touch", |n| n.touch()).expect("open handle");
        handle.close();

        let err = handle.call("touch", |n| n.touch()).unwrap_err();
        assert!(err.is_closed());
        assert_eq!(probe.calls(), 1);
    }

    #[test]
    fn failed_call_keeps_handle_open() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let handle = Handle::with_runtime("Test", probe.native(), &RUNTIME);
        let err = handle
            .call("fail", |_| -> AdsiResult<()> {
                Err(AdsiError::Conversion("boom".into()))
            })
            .unwrap_err();
        assert!(matches!(err, AdsiError::Conversion(_)));
        assert!(!handle.is_closed());
        assert_eq!(RUNTIME.live_handles(), 1);
    }

    #[test]
    fn derived_handles_count_on_the_same_runtime() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let parent_probe = Probe::default();
        let child_probe = Probe::default();
        let parent = Handle::with_runtime("Parent", parent_probe.native(), &RUNTIME);
        let child = parent
            .derive("child", "Child", |_| Ok(child_probe.native()))
            .expect("derive");
        assert_eq!(RUNTIME.live_handles(), 2);

        // Closing the parent leaves the child usable.
        parent.close();
        assert_eq!(parent_probe.releases(), 1);
        assert_eq!(RUNTIME.live_handles(), 1);
        assert!(RUNTIME.is_active());
        child.call("touch", |n| n.touch()).expect("child stays open");

        drop(child);
        assert_eq!(child_probe.releases(), 1);
        assert_eq!(RUNTIME.live_handles(), 0);
        assert!(!RUNTIME.is_active());
    }

    #[test]
    fn derive_mut_none_opens_nothing() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let parent = Handle::with_runtime("Parent", probe.native(), &RUNTIME);
        let child = parent
            .derive_mut("next", "Child", |_| Ok(None::<()>))
            .expect("derive");
        assert!(child.is_none());
        assert_eq!(RUNTIME.live_handles(), 1);
    }

    #[test]
    fn activation_runs_with_the_apartment_up() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let handle = Handle::activate("Test", &RUNTIME, || {
            assert!(RUNTIME.is_active());
            assert_eq!(RUNTIME.live_handles(), 1);
            Ok(probe.native())
        })
        .expect("activate");
        assert_eq!(RUNTIME.live_handles(), 1);

        drop(handle);
        assert_eq!(probe.releases(), 1);
        assert!(!RUNTIME.is_active());
    }

    #[test]
    fn failed_activation_releases_its_token() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let err = Handle::<Tracked>::activate("Test", &RUNTIME, || {
            Err(AdsiError::Runtime("provider missing".into()))
        })
        .unwrap_err();
        assert!(matches!(err, AdsiError::Runtime(_)));
        assert_eq!(RUNTIME.live_handles(), 0);
        assert!(!RUNTIME.is_active());
    }

    #[test]
    fn drop_closes() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        drop(Handle::with_runtime("Test", probe.native(), &RUNTIME));
        assert_eq!(probe.releases(), 1);
        assert_eq!(RUNTIME.live_handles(), 0);
    }

    #[test]
    fn racing_close_never_uses_released_native() {
        static RUNTIME: ComRuntime = ComRuntime::new();
        let probe = Probe::default();
        let handle = std::sync::Arc::new(Handle::with_runtime("Test", probe.native(), &RUNTIME));

        let callers: Vec<_> = (0..4)
            .map(|_| {
                let handle = std::sync::Arc::clone(&handle);
                std::thread::spawn(move || {
                    let mut closed_seen = false;
                    for _ in 0..200 {
                        match handle.call("touch", |n| n.touch()) {
                            Ok(()) => assert!(!closed_seen, "handle reopened"),
                            Err(e) => {
                                assert!(e.is_closed(), "unexpected error: {e}");
                                closed_seen = true;
                            }
                        }
                    }
                })
            })
            .collect();

        std::thread::yield_now();
        handle.close();
        for caller in callers {
            caller.join().expect("caller panicked");
        }

        assert_eq!(probe.releases(), 1);
        assert_eq!(probe.calls_after_release(), 0);
        assert_eq!(RUNTIME.live_handles(), 0);
    }
}
