//! VARIANT and SAFEARRAY marshaling.
//!
//! Filters travel as `VT_ARRAY | VT_BSTR`. Providers answer with either
//! that shape or `VT_ARRAY | VT_VARIANT` whose elements are BSTRs, a single
//! `VT_BSTR`, or `VT_EMPTY` when no filter is set.

use windows::Win32::Foundation::E_OUTOFMEMORY;
use windows::Win32::System::Com::{IDispatch, SAFEARRAY};
use windows::Win32::System::Ole::{
    SafeArrayCreateVector, SafeArrayGetDim, SafeArrayGetElement, SafeArrayGetLBound,
    SafeArrayGetUBound, SafeArrayPutElement,
};
use windows::Win32::System::Variant::{
    VARENUM, VARIANT, VT_ARRAY, VT_BOOL, VT_BSTR, VT_BYREF, VT_DISPATCH, VT_EMPTY, VT_I2, VT_I4,
    VT_I8, VT_NULL, VT_VARIANT, VariantClear,
};
use windows::core::BSTR;

use crate::error::{AdsiError, AdsiResult};

/// A VARIANT that is cleared with `VariantClear` when dropped.
///
/// Every VARIANT the bindings receive from, or build for, a provider goes
/// through this type so that BSTRs, arrays and interface references are
/// released on all exit paths.
pub struct OwnedVariant(VARIANT);

impl OwnedVariant {
    /// A `VT_EMPTY` value, suitable as an out-parameter.
    pub fn empty() -> Self {
        Self(VARIANT::default())
    }

    /// Takes ownership of a VARIANT returned by a provider.
    pub fn from_raw(variant: VARIANT) -> Self {
        Self(variant)
    }

    /// Encodes `values` as a one-dimensional `VT_ARRAY | VT_BSTR`.
    pub fn string_array(values: &[String]) -> AdsiResult<Self> {
        let len = u32::try_from(values.len())?;
        // SAFETY: creates a fresh zero-based vector; null is checked below.
        let array = unsafe { SafeArrayCreateVector(VT_BSTR, 0, len) };
        if array.is_null() {
            return Err(E_OUTOFMEMORY.into());
        }

        let mut variant = Self::empty();
        // SAFETY: tag and payload are written together. From here on the
        // array belongs to `variant` and is destroyed by its Drop.
        unsafe {
            let inner = &mut *variant.0.Anonymous.Anonymous;
            inner.vt = VARENUM(VT_ARRAY.0 | VT_BSTR.0);
            inner.Anonymous.parray = array;
        }

        for (index, value) in values.iter().enumerate() {
            let index = i32::try_from(index)?;
            let element = BSTR::from(value.as_str());
            // SAFETY: `BSTR` is a transparent wrapper over its string pointer.
            let raw: *const u16 = unsafe { std::mem::transmute_copy(&element) };
            // SAFETY: `index` lies inside the bounds allocated above.
            // SafeArrayPutElement copies the string; `element` frees ours.
            unsafe { SafeArrayPutElement(array, &index, raw.cast())? };
        }

        Ok(variant)
    }

    pub fn vt(&self) -> VARENUM {
        // SAFETY: the tag is valid for every VARIANT.
        unsafe { self.0.Anonymous.Anonymous.vt }
    }

    pub fn as_raw(&self) -> &VARIANT {
        &self.0
    }

    pub fn as_mut_ptr(&mut self) -> *mut VARIANT {
        &mut self.0
    }

    pub fn to_strings(&self) -> AdsiResult<Vec<String>> {
        variant_to_strings(&self.0)
    }

    pub fn to_dispatch(&self) -> AdsiResult<IDispatch> {
        variant_to_dispatch(&self.0)
    }
}

impl Default for OwnedVariant {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for OwnedVariant {
    fn drop(&mut self) {
        // SAFETY: the VARIANT is either VT_EMPTY or was filled by COM or
        // by `string_array`, so its tag describes its payload.
        if let Err(e) = unsafe { VariantClear(&mut self.0) } {
            tracing::warn!(error = ?e, "VariantClear failed");
        }
    }
}

impl std::fmt::Debug for OwnedVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OwnedVariant(VT {:#06X})", self.vt().0)
    }
}

/// Decodes a filter or property value into strings.
pub fn variant_to_strings(variant: &VARIANT) -> AdsiResult<Vec<String>> {
    // SAFETY: union arms are read only after checking the tag.
    unsafe {
        let inner = &variant.Anonymous.Anonymous;
        let vt = inner.vt;

        if vt == VT_EMPTY || vt == VT_NULL {
            return Ok(Vec::new());
        }
        if vt.0 & VT_BYREF.0 != 0 {
            return Err(AdsiError::Conversion(format!(
                "by-reference VARIANT (VT {:#06X}) is not supported",
                vt.0
            )));
        }
        if vt.0 & VT_ARRAY.0 != 0 {
            return array_to_strings(inner.Anonymous.parray, VARENUM(vt.0 & !VT_ARRAY.0));
        }
    }

    scalar_to_string(variant).map(|value| vec![value])
}

/// Extracts the directory object carried by an enumerated element.
pub fn variant_to_dispatch(variant: &VARIANT) -> AdsiResult<IDispatch> {
    // SAFETY: `pdispVal` is read only when the tag says VT_DISPATCH.
    unsafe {
        let inner = &variant.Anonymous.Anonymous;
        if inner.vt != VT_DISPATCH {
            return Err(AdsiError::NonDispatchVariant { vt: inner.vt.0 });
        }
        let dispatch: &Option<IDispatch> = &inner.Anonymous.pdispVal;
        // Clone adds a reference; VariantClear on the caller's value releases its own.
        dispatch
            .clone()
            .ok_or(AdsiError::NonDispatchVariant { vt: inner.vt.0 })
    }
}

fn scalar_to_string(variant: &VARIANT) -> AdsiResult<String> {
    // SAFETY: each arm reads the union field named by the tag.
    unsafe {
        let inner = &variant.Anonymous.Anonymous;
        match inner.vt {
            VT_BSTR => Ok(inner.Anonymous.bstrVal.to_string()),
            VT_I2 => Ok(inner.Anonymous.iVal.to_string()),
            VT_I4 => Ok(inner.Anonymous.lVal.to_string()),
            VT_I8 => Ok(inner.Anonymous.llVal.to_string()),
            VT_BOOL => Ok((inner.Anonymous.boolVal.0 != 0).to_string()),
            vt => Err(AdsiError::Conversion(format!(
                "VT {:#06X} cannot be represented as a string",
                vt.0
            ))),
        }
    }
}

fn array_to_strings(array: *const SAFEARRAY, element_vt: VARENUM) -> AdsiResult<Vec<String>> {
    if array.is_null() {
        return Ok(Vec::new());
    }

    // SAFETY: `array` is the non-null parray of a VT_ARRAY VARIANT that
    // outlives this call. Elements are copied out before use.
    unsafe {
        let dims = SafeArrayGetDim(array);
        if dims != 1 {
            return Err(AdsiError::Conversion(format!(
                "expected a one-dimensional array, got {dims} dimensions"
            )));
        }

        let lower = SafeArrayGetLBound(array, 1)?;
        let upper = SafeArrayGetUBound(array, 1)?;
        let mut values = Vec::with_capacity(usize::try_from(upper - lower + 1).unwrap_or(0));

        for index in lower..=upper {
            match element_vt {
                VT_BSTR => {
                    let mut element = BSTR::new();
                    SafeArrayGetElement(array, &index, (&raw mut element).cast())?;
                    values.push(element.to_string());
                }
                VT_VARIANT => {
                    let mut element = OwnedVariant::empty();
                    SafeArrayGetElement(array, &index, element.as_mut_ptr().cast())?;
                    values.push(scalar_to_string(element.as_raw())?);
                }
                other => {
                    return Err(AdsiError::Conversion(format!(
                        "array of VT {:#06X} cannot be represented as strings",
                        other.0
                    )));
                }
            }
        }

        Ok(values)
    }
}
