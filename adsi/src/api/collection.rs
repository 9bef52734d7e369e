use windows::Win32::Networking::ActiveDirectory::{IADsContainer, IADsMembers};
use windows::Win32::System::Ole::IEnumVARIANT;
use windows::Win32::System::Variant::VARIANT;
use windows_core::Interface as _;

use crate::api::variant::OwnedVariant;
use crate::error::AdsiResult;

/// Enumeration and filtering shared by `IADsContainer` and `IADsMembers`.
///
/// Both interfaces expose the same `_NewEnum`/`Filter` trio under
/// different vtables.
pub trait AdsCollection {
    /// Opens a new `IEnumVARIANT` over the collection.
    fn new_enum(&self) -> AdsiResult<IEnumVARIANT>;

    /// Reads the current filter. The result is cleared when dropped.
    fn filter(&self) -> AdsiResult<OwnedVariant>;

    /// Writes a filter. The caller keeps ownership of `filter`.
    fn set_filter(&self, filter: &VARIANT) -> AdsiResult<()>;
}

impl AdsCollection for IADsContainer {
    fn new_enum(&self) -> AdsiResult<IEnumVARIANT> {
        // SAFETY: `self` is a live interface; the enumerator is returned owned.
        let unknown = unsafe { self._NewEnum()? };
        Ok(unknown.cast()?)
    }

    fn filter(&self) -> AdsiResult<OwnedVariant> {
        // SAFETY: the returned VARIANT is handed straight to its owner.
        Ok(OwnedVariant::from_raw(unsafe { self.Filter()? }))
    }

    fn set_filter(&self, filter: &VARIANT) -> AdsiResult<()> {
        // SAFETY: the provider copies `filter`; it is not retained.
        unsafe { self.SetFilter(filter)? };
        Ok(())
    }
}

impl AdsCollection for IADsMembers {
    fn new_enum(&self) -> AdsiResult<IEnumVARIANT> {
        // SAFETY: `self` is a live interface; the enumerator is returned owned.
        let unknown = unsafe { self._NewEnum()? };
        Ok(unknown.cast()?)
    }

    fn filter(&self) -> AdsiResult<OwnedVariant> {
        // SAFETY: the returned VARIANT is handed straight to its owner.
        Ok(OwnedVariant::from_raw(unsafe { self.Filter()? }))
    }

    fn set_filter(&self, filter: &VARIANT) -> AdsiResult<()> {
        // SAFETY: the provider copies `filter`; it is not retained.
        unsafe { self.SetFilter(filter)? };
        Ok(())
    }
}
