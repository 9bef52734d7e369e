use crate::backend::NativeGroup;
use crate::backend::com::ComGroup;
use crate::error::AdsiResult;
use crate::handle::Handle;
use crate::members::Members;
use crate::runtime::ComRuntime;

/// A security or distribution group (`IADsGroup`).
///
/// Members are addressed by their full ADsPath.
pub struct Group<N: NativeGroup = ComGroup> {
    handle: Handle<N>,
}

impl<N: NativeGroup> Group<N> {
    pub fn new(native: N) -> Self {
        Self::from_handle(Handle::new("Group", native))
    }

    pub fn with_runtime(native: N, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("Group", native, runtime))
    }

    pub(crate) fn from_handle(handle: Handle<N>) -> Self {
        Self { handle }
    }

    pub fn description(&self) -> AdsiResult<String> {
        self.handle.call("description", N::description)
    }

    pub fn members(&self) -> AdsiResult<Members<N::Members>> {
        self.handle
            .derive("members", "Members", N::members)
            .map(Members::from_handle)
    }

    pub fn is_member(&self, path: &str) -> AdsiResult<bool> {
        self.handle.call("is_member", |native| native.is_member(path))
    }

    pub fn add(&self, path: &str) -> AdsiResult<()> {
        self.handle.call("add", |native| native.add(path))?;
        tracing::debug!(member = path, "group member added");
        Ok(())
    }

    pub fn remove(&self, path: &str) -> AdsiResult<()> {
        self.handle.call("remove", |native| native.remove(path))?;
        tracing::debug!(member = path, "group member removed");
        Ok(())
    }

    /// Releases the group. Idempotent.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<N: NativeGroup> std::fmt::Debug for Group<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.handle, f)
    }
}
