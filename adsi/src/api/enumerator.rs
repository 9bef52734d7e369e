use windows::Win32::System::Ole::IEnumVARIANT;
use windows_core::Interface;

use crate::api::variant::OwnedVariant;
use crate::error::AdsiResult;

/// Fetches a single element from `enumerator`.
///
/// Returns `Ok(None)` once the provider reports no more elements
/// (`S_FALSE` with nothing fetched). A failing HRESULT is an error, even
/// if the provider also claims to have fetched something.
pub fn next_element(enumerator: &IEnumVARIANT) -> AdsiResult<Option<OwnedVariant>> {
    let mut element = OwnedVariant::empty();
    let mut fetched = 0u32;
    // SAFETY: asks for exactly one element into a single initialized
    // VARIANT slot; `fetched` receives the count.
    let hr = unsafe {
        (Interface::vtable(enumerator).Next)(
            Interface::as_raw(enumerator),
            1,
            element.as_mut_ptr(),
            &mut fetched,
        )
    };
    hr.ok()?;

    if fetched == 0 {
        return Ok(None);
    }
    Ok(Some(element))
}
