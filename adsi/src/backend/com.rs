//! Seam implementations over the windows-rs ADSI interfaces.

use windows::Win32::Networking::ActiveDirectory::{
    IADs, IADsContainer, IADsGroup, IADsMembers, IADsOpenDSObject,
};
use windows::Win32::System::Ole::IEnumVARIANT;
use windows::core::{BSTR, GUID};
use windows_core::Interface as _;

use super::{
    NativeCollection, NativeContainer, NativeCursor, NativeDirectory, NativeGroup, NativeMembers,
    NativeObject,
};
use crate::api::guid::{CLSID_ADS_NAMESPACES, CLSID_LDAP};
use crate::api::{AdsCollection, OwnedVariant, create_instance, next_element};
use crate::credentials::Credentials;
use crate::error::AdsiResult;

pub struct ComContainer(IADsContainer);
pub struct ComMembers(IADsMembers);
pub struct ComCursor(IEnumVARIANT);
#[derive(Debug)]
pub struct ComObject(IADs);
pub struct ComGroup(IADsGroup);
pub struct ComDirectory(IADsOpenDSObject);

// SAFETY: ADSI providers are registered free-threaded or both-threaded, and
// the process-wide runtime keeps the multithreaded apartment alive for as
// long as any of these is owned by a handle. Handles serialize access.
unsafe impl Send for ComContainer {}
// SAFETY: see `ComContainer`.
unsafe impl Send for ComMembers {}
// SAFETY: see `ComContainer`.
unsafe impl Send for ComCursor {}
// SAFETY: see `ComContainer`.
unsafe impl Send for ComObject {}
// SAFETY: see `ComContainer`.
unsafe impl Send for ComGroup {}
// SAFETY: see `ComContainer`.
unsafe impl Send for ComDirectory {}

impl ComContainer {
    pub fn new(container: IADsContainer) -> Self {
        Self(container)
    }

    /// The `ADs:` namespaces object, locally or on `server`.
    pub fn namespaces(server: Option<&str>) -> AdsiResult<Self> {
        Self::activate(server, &CLSID_ADS_NAMESPACES)
    }

    /// Activates `clsid` and queries it for `IADsContainer`.
    pub fn activate(server: Option<&str>, clsid: &GUID) -> AdsiResult<Self> {
        create_instance(server, clsid).map(Self)
    }

    pub fn interface(&self) -> &IADsContainer {
        &self.0
    }
}

impl ComMembers {
    pub fn new(members: IADsMembers) -> Self {
        Self(members)
    }
}

impl ComCursor {
    pub fn new(cursor: IEnumVARIANT) -> Self {
        Self(cursor)
    }
}

impl ComObject {
    pub fn new(object: IADs) -> Self {
        Self(object)
    }
}

impl ComDirectory {
    pub fn new(directory: IADsOpenDSObject) -> Self {
        Self(directory)
    }

    /// The LDAP provider, locally or on `server`.
    pub fn connect(server: Option<&str>) -> AdsiResult<Self> {
        Self::activate(server, &CLSID_LDAP)
    }

    /// Activates a provider `clsid` and queries it for `IADsOpenDSObject`.
    pub fn activate(server: Option<&str>, clsid: &GUID) -> AdsiResult<Self> {
        create_instance(server, clsid).map(Self)
    }
}

fn new_cursor<C: AdsCollection>(collection: &C) -> AdsiResult<ComCursor> {
    collection.new_enum().map(ComCursor)
}

fn read_filter<C: AdsCollection>(collection: &C) -> AdsiResult<Vec<String>> {
    collection.filter()?.to_strings()
}

fn write_filter<C: AdsCollection>(collection: &C, filter: &[String]) -> AdsiResult<()> {
    let value = OwnedVariant::string_array(filter)?;
    collection.set_filter(value.as_raw())
}

impl NativeCollection for ComContainer {
    type Cursor = ComCursor;

    fn new_enum(&self) -> AdsiResult<ComCursor> {
        new_cursor(&self.0)
    }

    fn filter(&self) -> AdsiResult<Vec<String>> {
        read_filter(&self.0)
    }

    fn set_filter(&self, filter: &[String]) -> AdsiResult<()> {
        write_filter(&self.0, filter)
    }
}

impl NativeContainer for ComContainer {
    fn get_object(&self, class: &str, relative_name: &str) -> AdsiResult<ComObject> {
        // SAFETY: both BSTRs outlive the call; the object is returned owned.
        let dispatch = unsafe {
            self.0
                .GetObject(&BSTR::from(class), &BSTR::from(relative_name))?
        };
        Ok(ComObject(dispatch.cast()?))
    }
}

impl NativeCollection for ComMembers {
    type Cursor = ComCursor;

    fn new_enum(&self) -> AdsiResult<ComCursor> {
        new_cursor(&self.0)
    }

    fn filter(&self) -> AdsiResult<Vec<String>> {
        read_filter(&self.0)
    }

    fn set_filter(&self, filter: &[String]) -> AdsiResult<()> {
        write_filter(&self.0, filter)
    }
}

impl NativeMembers for ComMembers {
    fn count(&self) -> AdsiResult<usize> {
        // SAFETY: `self.0` is a live interface.
        let count = unsafe { self.0.Count()? };
        Ok(usize::try_from(count)?)
    }
}

impl NativeCursor for ComCursor {
    type Object = ComObject;

    fn next(&mut self) -> AdsiResult<Option<ComObject>> {
        let Some(element) = next_element(&self.0)? else {
            return Ok(None);
        };
        let object: IADs = element.to_dispatch()?.cast()?;
        Ok(Some(ComObject(object)))
    }
}

impl NativeObject for ComObject {
    type Container = ComContainer;
    type Group = ComGroup;

    fn name(&self) -> AdsiResult<String> {
        // SAFETY: property getters on a live interface return owned BSTRs.
        Ok(unsafe { self.0.Name()? }.to_string())
    }

    fn class(&self) -> AdsiResult<String> {
        // SAFETY: see `name`.
        Ok(unsafe { self.0.Class()? }.to_string())
    }

    fn guid(&self) -> AdsiResult<String> {
        // SAFETY: see `name`.
        Ok(unsafe { self.0.GUID()? }.to_string())
    }

    fn path(&self) -> AdsiResult<String> {
        // SAFETY: see `name`.
        Ok(unsafe { self.0.ADsPath()? }.to_string())
    }

    fn parent(&self) -> AdsiResult<String> {
        // SAFETY: see `name`.
        Ok(unsafe { self.0.Parent()? }.to_string())
    }

    fn schema(&self) -> AdsiResult<String> {
        // SAFETY: see `name`.
        Ok(unsafe { self.0.Schema()? }.to_string())
    }

    fn get(&self, property: &str) -> AdsiResult<Vec<String>> {
        // SAFETY: the property name outlives the call; the value is owned
        // by the returned wrapper.
        let value = unsafe { self.0.Get(&BSTR::from(property))? };
        OwnedVariant::from_raw(value).to_strings()
    }

    fn to_container(&self) -> AdsiResult<ComContainer> {
        Ok(ComContainer(self.0.cast()?))
    }

    fn to_group(&self) -> AdsiResult<ComGroup> {
        Ok(ComGroup(self.0.cast()?))
    }
}

impl NativeGroup for ComGroup {
    type Members = ComMembers;

    fn description(&self) -> AdsiResult<String> {
        // SAFETY: `self.0` is a live interface.
        Ok(unsafe { self.0.Description()? }.to_string())
    }

    fn members(&self) -> AdsiResult<ComMembers> {
        // SAFETY: `self.0` is a live interface.
        Ok(ComMembers(unsafe { self.0.Members()? }))
    }

    fn is_member(&self, path: &str) -> AdsiResult<bool> {
        // SAFETY: the path outlives the call.
        let result = unsafe { self.0.IsMember(&BSTR::from(path))? };
        Ok(result.0 != 0)
    }

    fn add(&self, path: &str) -> AdsiResult<()> {
        // SAFETY: the path outlives the call.
        unsafe { self.0.Add(&BSTR::from(path))? };
        Ok(())
    }

    fn remove(&self, path: &str) -> AdsiResult<()> {
        // SAFETY: the path outlives the call.
        unsafe { self.0.Remove(&BSTR::from(path))? };
        Ok(())
    }
}

impl NativeDirectory for ComDirectory {
    type Object = ComObject;

    fn open(&self, path: &str, credentials: &Credentials) -> AdsiResult<ComObject> {
        let username = credentials.username.as_deref().map(BSTR::from).unwrap_or_default();
        let password = credentials.password.as_deref().map(BSTR::from).unwrap_or_default();
        let flags = i32::try_from(credentials.flags.0)?;
        // SAFETY: all BSTRs outlive the call; the object is returned owned.
        let dispatch = unsafe {
            self.0
                .OpenDSObject(&BSTR::from(path), &username, &password, flags)?
        };
        Ok(ComObject(dispatch.cast()?))
    }
}
