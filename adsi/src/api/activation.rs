use std::mem::ManuallyDrop;

use windows::Win32::Foundation::E_POINTER;
use windows::Win32::System::Com::{
    CLSCTX_ALL, CLSCTX_REMOTE_SERVER, COSERVERINFO, CoCreateInstance, CoCreateInstanceEx,
    MULTI_QI,
};
use windows::core::{GUID, HRESULT, IUnknown, PWSTR};
use windows_core::Interface;

use crate::error::AdsiResult;

/// Activates `clsid` and queries it for `T`.
///
/// With `server` set the object is created on that machine through
/// DCOM; otherwise in-process or local.
pub fn create_instance<T: Interface>(server: Option<&str>, clsid: &GUID) -> AdsiResult<T> {
    let Some(server) = server else {
        // SAFETY: plain activation; the result is an owned interface.
        return Ok(unsafe { CoCreateInstance(clsid, None, CLSCTX_ALL)? });
    };

    let mut name: Vec<u16> = server.encode_utf16().chain(std::iter::once(0)).collect();
    let info = COSERVERINFO {
        pwszName: PWSTR(name.as_mut_ptr()),
        ..Default::default()
    };
    let iid = T::IID;
    let mut results = [MULTI_QI {
        pIID: &iid,
        pItf: ManuallyDrop::new(None),
        hr: HRESULT(0),
    }];

    // SAFETY: `info`, `name` and `iid` outlive the call, and `results` has one
    // slot for the single requested interface.
    unsafe {
        CoCreateInstanceEx(
            clsid,
            None,
            CLSCTX_REMOTE_SERVER,
            Some(&raw const info),
            &mut results,
        )?;
    }

    results[0].hr.ok()?;
    // SAFETY: the slot is read once and ownership moves to `unknown`.
    let unknown: Option<IUnknown> = unsafe { ManuallyDrop::take(&mut results[0].pItf) };
    let unknown = unknown.ok_or_else(|| windows::core::Error::from(E_POINTER))?;
    Ok(unknown.cast()?)
}
