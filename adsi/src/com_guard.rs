//! Per-thread COM apartment membership.

use std::marker::PhantomData;

use windows::Win32::Foundation::S_FALSE;
use windows::Win32::System::Com::{COINIT_MULTITHREADED, CoInitializeEx, CoUninitialize};

use crate::error::{AdsiError, AdsiResult};

/// Membership of the calling thread in the multithreaded apartment.
///
/// The [`ComRuntime`](crate::ComRuntime) keeper thread holds one of these
/// for as long as any handle is alive. Callers that make raw COM calls of
/// their own on a thread may hold one too; nested guards on one thread
/// are balanced individually.
///
/// The guard is `!Send`: it must be dropped on the thread that created it.
///
/// # Examples
///
/// ```no_run
/// # use adsi::{AdsiResult, ComGuard};
/// # fn main() -> AdsiResult<()> {
/// let guard = ComGuard::new()?;
/// if guard.is_nested() {
///     println!("this thread was already in the MTA");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ComGuard {
    nested: bool,
    _thread_bound: PhantomData<*mut ()>,
}

impl ComGuard {
    /// Joins the MTA on the calling thread.
    ///
    /// Fails with `RPC_E_CHANGED_MODE` on a thread that is already a
    /// single-threaded apartment.
    pub fn new() -> AdsiResult<Self> {
        // SAFETY: no reserved pointer is passed; a successful call is
        // balanced by CoUninitialize in Drop on this same thread.
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if let Err(e) = hr.ok() {
            tracing::error!(error = ?e, "CoInitializeEx(MTA) failed");
            return Err(AdsiError::from(e));
        }

        let nested = hr == S_FALSE;
        tracing::trace!(nested, "joined MTA");
        Ok(Self {
            nested,
            _thread_bound: PhantomData,
        })
    }

    /// `true` if the thread was already initialized when the guard was
    /// created.
    pub fn is_nested(&self) -> bool {
        self.nested
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        // SAFETY: `new` succeeded on this thread (the guard is !Send), so
        // this call balances it.
        unsafe { CoUninitialize() };
        tracing::trace!(nested = self.nested, "left MTA");
    }
}
