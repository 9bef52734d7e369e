use crate::backend::com::ComMembers;
use crate::backend::NativeMembers;
use crate::error::AdsiResult;
use crate::handle::Handle;
use crate::iter::ObjectIter;
use crate::runtime::ComRuntime;

/// The member list of a group (`IADsMembers`).
pub struct Members<N: NativeMembers = ComMembers> {
    handle: Handle<N>,
}

impl<N: NativeMembers> Members<N> {
    pub fn new(native: N) -> Self {
        Self::from_handle(Handle::new("Members", native))
    }

    pub fn with_runtime(native: N, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("Members", native, runtime))
    }

    pub(crate) fn from_handle(handle: Handle<N>) -> Self {
        Self { handle }
    }

    /// Number of members, ignoring the filter.
    pub fn count(&self) -> AdsiResult<usize> {
        self.handle.call("count", N::count)
    }

    /// Opens a new cursor over the members that pass the current filter.
    pub fn iter(&self) -> AdsiResult<ObjectIter<N::Cursor>> {
        self.handle
            .derive("iter", "ObjectIter", N::new_enum)
            .map(ObjectIter::from_handle)
    }

    pub fn filter(&self) -> AdsiResult<Vec<String>> {
        self.handle.call("filter", N::filter)
    }

    pub fn set_filter<I, S>(&self, classes: I) -> AdsiResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        self.handle
            .call("set_filter", |native| native.set_filter(&classes))
    }

    /// Releases the member list. Idempotent.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<N: NativeMembers> std::fmt::Debug for Members<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.handle, f)
    }
}
