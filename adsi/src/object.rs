use crate::backend::NativeObject;
use crate::backend::com::ComObject;
use crate::container::Container;
use crate::error::AdsiResult;
use crate::group::Group;
use crate::handle::Handle;
use crate::runtime::ComRuntime;

/// A bound directory object (`IADs`).
pub struct Object<N: NativeObject = ComObject> {
    handle: Handle<N>,
}

impl<N: NativeObject> Object<N> {
    pub fn new(native: N) -> Self {
        Self::from_handle(Handle::new("Object", native))
    }

    pub fn with_runtime(native: N, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("Object", native, runtime))
    }

    pub(crate) fn from_handle(handle: Handle<N>) -> Self {
        Self { handle }
    }

    /// Relative name, e.g. `CN=Jane Doe`.
    pub fn name(&self) -> AdsiResult<String> {
        self.handle.call("name", N::name)
    }

    /// Schema class name, e.g. `user`.
    pub fn class(&self) -> AdsiResult<String> {
        self.handle.call("class", N::class)
    }

    pub fn guid(&self) -> AdsiResult<String> {
        self.handle.call("guid", N::guid)
    }

    /// Full ADsPath, e.g. `LDAP://CN=Jane Doe,DC=example,DC=com`.
    pub fn path(&self) -> AdsiResult<String> {
        self.handle.call("path", N::path)
    }

    pub fn parent(&self) -> AdsiResult<String> {
        self.handle.call("parent", N::parent)
    }

    pub fn schema(&self) -> AdsiResult<String> {
        self.handle.call("schema", N::schema)
    }

    /// Reads `property` as text. Multi-valued attributes yield one entry
    /// per value.
    pub fn get(&self, property: &str) -> AdsiResult<Vec<String>> {
        self.handle.call("get", |native| native.get(property))
    }

    /// Reopens this object as a container. Fails with `E_NOINTERFACE` for
    /// leaf objects.
    pub fn to_container(&self) -> AdsiResult<Container<N::Container>> {
        self.handle
            .derive("to_container", "Container", N::to_container)
            .map(Container::from_handle)
    }

    /// Reopens this object as a group.
    pub fn to_group(&self) -> AdsiResult<Group<N::Group>> {
        self.handle
            .derive("to_group", "Group", N::to_group)
            .map(Group::from_handle)
    }

    /// Releases the object. Idempotent.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<N: NativeObject> std::fmt::Debug for Object<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.handle, f)
    }
}
