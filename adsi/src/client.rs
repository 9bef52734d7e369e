use windows::core::GUID;

use crate::backend::com::ComDirectory;
use crate::backend::{NativeDirectory, NativeObject};
use crate::container::Container;
use crate::credentials::Credentials;
use crate::error::AdsiResult;
use crate::group::Group;
use crate::handle::Handle;
use crate::object::Object;
use crate::runtime::ComRuntime;

type DirObject<N> = <N as NativeDirectory>::Object;

/// Binds directory objects by ADsPath (`IADsOpenDSObject`).
///
/// # Examples
///
/// ```no_run
/// use adsi::{AdsiResult, Client};
///
/// fn users(domain: &str) -> AdsiResult<Vec<String>> {
///     let client = Client::connect(None)?;
///     let users = client.open_container(&format!("LDAP://CN=Users,{domain}"))?;
///     users.set_filter(["user"])?;
///     users.children()?.map(|user| user?.path()).collect()
/// }
/// ```
pub struct Client<N: NativeDirectory = ComDirectory> {
    handle: Handle<N>,
    credentials: Credentials,
}

impl Client<ComDirectory> {
    /// Activates the LDAP provider on the local machine or on `server`.
    pub fn connect(server: Option<&str>) -> AdsiResult<Self> {
        let client = Self::activate_on(ComRuntime::global(), || ComDirectory::connect(server))
            .inspect_err(|e| {
                tracing::error!(error = %e, server = server.unwrap_or("localhost"), "LDAP provider activation failed");
            })?;
        tracing::debug!(server = server.unwrap_or("localhost"), "LDAP provider activated");
        Ok(client)
    }

    /// Activates any provider class that implements `IADsOpenDSObject`.
    pub fn activate(server: Option<&str>, clsid: &GUID) -> AdsiResult<Self> {
        Self::activate_on(ComRuntime::global(), || ComDirectory::activate(server, clsid)).inspect_err(|e| {
            tracing::error!(error = %e, server = server.unwrap_or("localhost"), clsid = ?clsid, "provider activation failed");
        })
    }
}

impl<N: NativeDirectory> Client<N> {
    pub fn new(native: N) -> Self {
        Self::from_handle(Handle::new("Client", native))
    }

    pub fn with_runtime(native: N, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("Client", native, runtime))
    }

    /// Builds the native directory with a token on `runtime` already held.
    pub(crate) fn activate_on(
        runtime: &'static ComRuntime,
        factory: impl FnOnce() -> AdsiResult<N>,
    ) -> AdsiResult<Self> {
        Handle::activate("Client", runtime, factory).map(Self::from_handle)
    }

    fn from_handle(handle: Handle<N>) -> Self {
        Self {
            handle,
            credentials: Credentials::current_user(),
        }
    }

    /// Credentials used by [`Client::open`] and friends.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Binds `path` with this client's credentials.
    pub fn open(&self, path: &str) -> AdsiResult<Object<DirObject<N>>> {
        self.open_with(path, &self.credentials)
    }

    /// Binds `path` with explicit credentials.
    pub fn open_with(&self, path: &str, credentials: &Credentials) -> AdsiResult<Object<DirObject<N>>> {
        self.handle
            .derive("open", "Object", |native| native.open(path, credentials))
            .map(Object::from_handle)
    }

    /// Binds `path` and returns its container view.
    pub fn open_container(
        &self,
        path: &str,
    ) -> AdsiResult<Container<<DirObject<N> as NativeObject>::Container>> {
        self.handle
            .derive("open_container", "Container", |native| {
                native.open(path, &self.credentials)?.to_container()
            })
            .map(Container::from_handle)
    }

    /// Binds `path` and returns its group view.
    pub fn open_group(&self, path: &str) -> AdsiResult<Group<<DirObject<N> as NativeObject>::Group>> {
        self.handle
            .derive("open_group", "Group", |native| {
                native.open(path, &self.credentials)?.to_group()
            })
            .map(Group::from_handle)
    }

    /// Releases the provider. Objects already opened stay usable.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<N: NativeDirectory> std::fmt::Debug for Client<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("closed", &self.is_closed())
            .field("credentials", &self.credentials)
            .finish()
    }
}
