use thiserror::Error;
use windows::Win32::Foundation::{
    E_ACCESSDENIED, E_NOINTERFACE, E_NOTIMPL, E_POINTER, REGDB_E_CLASSNOTREG,
};
use windows::core::HRESULT;

/// Result type alias for ADSI operations.
pub type AdsiResult<T> = Result<T, AdsiError>;

/// Centralized error enum for the ADSI bindings.
///
/// Running out of elements while enumerating is not an error; see
/// [`ObjectIter::next_object`](crate::ObjectIter::next_object).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdsiError {
    /// A native COM method returned a failing HRESULT.
    ///
    /// This variant wraps a [`windows::core::Error`] and provides a friendly
    /// hint for common ADSI-related HRESULT codes.
    #[error("COM error: {source} ({})", friendly_hresult_hint(.source.code()).unwrap_or("No hint available"))]
    Com {
        #[from]
        source: windows::core::Error,
    },

    /// The handle was closed before the operation was attempted.
    #[error("Handle is closed")]
    Closed,

    /// An enumerated element did not carry a directory object.
    #[error("Enumerated element is not a dispatch object (VT {vt:#06X})")]
    NonDispatchVariant { vt: u16 },

    /// A VARIANT could not be converted to or from strings.
    #[error("Data conversion failed: {0}")]
    Conversion(String),

    /// The background COM apartment could not be started or stopped.
    #[error("COM runtime error: {0}")]
    Runtime(String),
}

impl AdsiError {
    /// The HRESULT carried by a native call failure.
    pub fn code(&self) -> Option<HRESULT> {
        match self {
            Self::Com { source } => Some(source.code()),
            _ => None,
        }
    }

    /// A friendly hint for the carried HRESULT, if one is known.
    pub fn hint(&self) -> Option<&'static str> {
        self.code().and_then(friendly_hresult_hint)
    }

    /// `true` for [`AdsiError::Closed`].
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<HRESULT> for AdsiError {
    fn from(hr: HRESULT) -> Self {
        Self::Com { source: hr.into() }
    }
}

impl From<std::num::TryFromIntError> for AdsiError {
    fn from(err: std::num::TryFromIntError) -> Self {
        Self::Conversion(format!("Integer conversion error: {err}"))
    }
}

/// Helper to format HRESULT with friendly hints.
#[allow(clippy::cast_sign_loss)]
pub fn format_hresult(hr: HRESULT) -> String {
    let hex = format!("0x{:08X}", hr.0 as u32);
    match friendly_hresult_hint(hr) {
        Some(hint) => format!("{hex}: {hint}"),
        None => hex,
    }
}

/// Named HRESULTs returned by the ADSI providers.
#[allow(clippy::cast_possible_wrap)]
pub mod codes {
    use windows::core::HRESULT;

    /// `E_ADS_BAD_PATHNAME`
    pub const BAD_PATHNAME: HRESULT = HRESULT(0x8000_5000_u32 as i32);
    /// `E_ADS_UNKNOWN_OBJECT`
    pub const UNKNOWN_OBJECT: HRESULT = HRESULT(0x8000_5004_u32 as i32);
    /// `E_ADS_PROPERTY_NOT_FOUND`: the property has no value in the cache.
    pub const PROPERTY_NOT_FOUND: HRESULT = HRESULT(0x8000_500D_u32 as i32);
    /// `ERROR_DS_NO_SUCH_OBJECT`
    pub const NO_SUCH_OBJECT: HRESULT = HRESULT(0x8007_2030_u32 as i32);
    /// `ERROR_DS_SERVER_DOWN`
    pub const SERVER_DOWN: HRESULT = HRESULT(0x8007_203A_u32 as i32);
    /// `ERROR_LOGON_FAILURE`
    pub const LOGON_FAILURE: HRESULT = HRESULT(0x8007_052E_u32 as i32);
    /// `ERROR_OBJECT_ALREADY_EXISTS`, e.g. adding an existing group member.
    pub const ALREADY_EXISTS: HRESULT = HRESULT(0x8007_1392_u32 as i32);
    /// `RPC_S_SERVER_UNAVAILABLE`
    pub const RPC_SERVER_UNAVAILABLE: HRESULT = HRESULT(0x8007_06BA_u32 as i32);
}

/// Maps known ADSI and COM error codes to actionable user hints.
pub fn friendly_hresult_hint(hr: HRESULT) -> Option<&'static str> {
    match hr {
        codes::NO_SUCH_OBJECT => Some("No such object on the directory server — check the ADsPath"),
        codes::LOGON_FAILURE => Some("Logon failure — unknown user name or bad password"),
        codes::SERVER_DOWN => Some("The directory server is not operational or cannot be reached"),
        codes::BAD_PATHNAME => Some("Invalid ADsPath syntax (E_ADS_BAD_PATHNAME)"),
        codes::UNKNOWN_OBJECT => Some("Unknown directory object (E_ADS_UNKNOWN_OBJECT)"),
        codes::PROPERTY_NOT_FOUND => Some("Property not found in the cache (E_ADS_PROPERTY_NOT_FOUND)"),
        codes::ALREADY_EXISTS => Some("The object or group member already exists"),
        E_NOINTERFACE => Some("Object does not support the requested interface (E_NOINTERFACE)"),
        E_NOTIMPL => Some("The provider does not implement this method (E_NOTIMPL)"),
        E_ACCESSDENIED => Some("Access denied — the bound account lacks rights on this object"),
        REGDB_E_CLASSNOTREG => Some("ADSI provider class is not registered on this machine"),
        codes::RPC_SERVER_UNAVAILABLE => {
            Some("RPC server unavailable — the target host may be offline or blocking RPC")
        }
        E_POINTER => Some("Invalid pointer (E_POINTER)"),
        _ => None,
    }
}
