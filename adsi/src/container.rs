use windows::core::GUID;

use crate::backend::com::ComContainer;
use crate::backend::{CollectionObject, NativeContainer};
use crate::error::AdsiResult;
use crate::handle::Handle;
use crate::iter::ObjectIter;
use crate::object::Object;
use crate::runtime::ComRuntime;

/// A directory container (`IADsContainer`).
///
/// Children are enumerated through [`Container::children`], narrowed by
/// the object-class filter set with [`Container::set_filter`].
///
/// # Examples
///
/// ```no_run
/// use adsi::{AdsiResult, Container};
///
/// fn providers() -> AdsiResult<Vec<String>> {
///     let namespaces = Container::namespaces(None)?;
///     namespaces.children()?.map(|child| child?.name()).collect()
/// }
/// ```
pub struct Container<N: NativeContainer = ComContainer> {
    handle: Handle<N>,
}

impl Container<ComContainer> {
    /// Activates `clsid` on the local machine or on `server`.
    pub fn activate(server: Option<&str>, clsid: &GUID) -> AdsiResult<Self> {
        Self::activate_on(ComRuntime::global(), || ComContainer::activate(server, clsid)).inspect_err(|e| {
            tracing::error!(error = %e, server = server.unwrap_or("localhost"), "container activation failed");
        })
    }

    /// The `ADs:` container, whose children are the installed providers.
    pub fn namespaces(server: Option<&str>) -> AdsiResult<Self> {
        Self::activate_on(ComRuntime::global(), || ComContainer::namespaces(server)).inspect_err(|e| {
            tracing::error!(error = %e, server = server.unwrap_or("localhost"), "ADs: namespaces activation failed");
        })
    }
}

impl<N: NativeContainer> Container<N> {
    pub fn new(native: N) -> Self {
        Self::from_handle(Handle::new("Container", native))
    }

    pub fn with_runtime(native: N, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("Container", native, runtime))
    }

    /// Builds the native container with a token on `runtime` already held.
    pub(crate) fn activate_on(
        runtime: &'static ComRuntime,
        factory: impl FnOnce() -> AdsiResult<N>,
    ) -> AdsiResult<Self> {
        Handle::activate("Container", runtime, factory).map(Self::from_handle)
    }

    pub(crate) fn from_handle(handle: Handle<N>) -> Self {
        Self { handle }
    }

    /// Opens a new cursor over the children that pass the current filter.
    pub fn children(&self) -> AdsiResult<ObjectIter<N::Cursor>> {
        self.handle
            .derive("children", "ObjectIter", N::new_enum)
            .map(ObjectIter::from_handle)
    }

    /// Current object-class filter. Empty when unset.
    pub fn filter(&self) -> AdsiResult<Vec<String>> {
        self.handle.call("filter", N::filter)
    }

    /// Restricts enumeration to the given object classes. An empty list
    /// clears the filter.
    pub fn set_filter<I, S>(&self, classes: I) -> AdsiResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        self.handle
            .call("set_filter", |native| native.set_filter(&classes))
    }

    /// Binds a direct child by class and relative name, e.g.
    /// `object("user", "CN=Jane Doe")`.
    pub fn object(&self, class: &str, relative_name: &str) -> AdsiResult<Object<CollectionObject<N>>> {
        self.handle
            .derive("object", "Object", |native| {
                native.get_object(class, relative_name)
            })
            .map(Object::from_handle)
    }

    /// Releases the container. Idempotent.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<N: NativeContainer> std::fmt::Debug for Container<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.handle, f)
    }
}
