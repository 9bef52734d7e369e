//! Native seam between the handle types and COM.
//!
//! The handle types are generic over these traits. [`com`] implements
//! them on the windows-rs ADSI interfaces; tests implement them on
//! in-memory fakes.

pub mod com;

use crate::credentials::Credentials;
use crate::error::AdsiResult;

/// Object type produced by enumerating a collection.
pub type CollectionObject<N> = <<N as NativeCollection>::Cursor as NativeCursor>::Object;

/// Enumerable, filterable ADSI collection (`IADsContainer`, `IADsMembers`).
pub trait NativeCollection: Send + 'static {
    type Cursor: NativeCursor;

    /// Opens a fresh enumerator over the collection.
    fn new_enum(&self) -> AdsiResult<Self::Cursor>;

    /// Current object-class filter.
    fn filter(&self) -> AdsiResult<Vec<String>>;

    /// Replaces the object-class filter.
    fn set_filter(&self, filter: &[String]) -> AdsiResult<()>;
}

/// `IADsContainer` beyond the shared collection surface.
pub trait NativeContainer: NativeCollection {
    /// Binds a direct child by class and relative name (`CN=...`).
    fn get_object(&self, class: &str, relative_name: &str) -> AdsiResult<CollectionObject<Self>>;
}

/// `IADsMembers` beyond the shared collection surface.
pub trait NativeMembers: NativeCollection {
    fn count(&self) -> AdsiResult<usize>;
}

/// Forward-only enumerator (`IEnumVARIANT`).
pub trait NativeCursor: Send + 'static {
    type Object: NativeObject;

    /// Fetches exactly one element. `Ok(None)` means the provider has no
    /// more elements.
    fn next(&mut self) -> AdsiResult<Option<Self::Object>>;
}

/// A bound directory object (`IADs`).
pub trait NativeObject: Send + 'static {
    type Container: NativeContainer;
    type Group: NativeGroup;

    fn name(&self) -> AdsiResult<String>;
    fn class(&self) -> AdsiResult<String>;
    fn guid(&self) -> AdsiResult<String>;
    fn path(&self) -> AdsiResult<String>;
    fn parent(&self) -> AdsiResult<String>;
    fn schema(&self) -> AdsiResult<String>;

    /// Reads a property from the object's cache, as text.
    fn get(&self, property: &str) -> AdsiResult<Vec<String>>;

    /// Queries the object for its container view.
    fn to_container(&self) -> AdsiResult<Self::Container>;

    /// Queries the object for its group view.
    fn to_group(&self) -> AdsiResult<Self::Group>;
}

/// A security or distribution group (`IADsGroup`).
pub trait NativeGroup: Send + 'static {
    type Members: NativeMembers;

    fn description(&self) -> AdsiResult<String>;
    fn members(&self) -> AdsiResult<Self::Members>;
    fn is_member(&self, path: &str) -> AdsiResult<bool>;
    fn add(&self, path: &str) -> AdsiResult<()>;
    fn remove(&self, path: &str) -> AdsiResult<()>;
}

/// Entry point that binds objects by ADsPath (`IADsOpenDSObject`).
pub trait NativeDirectory: Send + 'static {
    type Object: NativeObject;

    fn open(&self, path: &str, credentials: &Credentials) -> AdsiResult<Self::Object>;
}
