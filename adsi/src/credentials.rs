//! Bind credentials and authentication flags.

use std::ops::{BitOr, BitOrAssign};

/// ADSI authentication flags (`ADS_AUTHENTICATION_ENUM`).
///
/// # Examples
///
/// ```
/// use adsi::AuthFlags;
/// let flags = AuthFlags::SECURE | AuthFlags::SIGNING;
/// assert!(flags.contains(AuthFlags::SIGNING));
/// assert!(!flags.contains(AuthFlags::FAST_BIND));
/// assert_eq!(flags.0, 0x41);
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthFlags(pub u32);

impl AuthFlags {
    pub const NONE: Self = Self(0);
    /// Kerberos/NTLM negotiated bind (`ADS_SECURE_AUTHENTICATION`).
    pub const SECURE: Self = Self(0x1);
    /// SSL/TLS on the LDAP channel (`ADS_USE_ENCRYPTION`, alias `ADS_USE_SSL`).
    pub const ENCRYPTION: Self = Self(0x2);
    pub const READONLY_SERVER: Self = Self(0x4);
    /// Anonymous bind (`ADS_NO_AUTHENTICATION`).
    pub const NO_AUTHENTICATION: Self = Self(0x10);
    /// Skip objectClass retrieval on open (`ADS_FAST_BIND`).
    pub const FAST_BIND: Self = Self(0x20);
    pub const SIGNING: Self = Self(0x40);
    pub const SEALING: Self = Self(0x80);
    /// The path names a specific server (`ADS_SERVER_BIND`).
    pub const SERVER_BIND: Self = Self(0x200);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for AuthFlags {
    fn default() -> Self {
        Self::SECURE
    }
}

impl BitOr for AuthFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AuthFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Who to bind as when opening a directory object.
///
/// The default binds as the calling thread's security context with
/// [`AuthFlags::SECURE`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub flags: AuthFlags,
}

impl Credentials {
    /// Bind as the current user.
    pub fn current_user() -> Self {
        Self::default()
    }

    /// Bind with an explicit account.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            flags: AuthFlags::default(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: AuthFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_secure_current_user() {
        let creds = Credentials::current_user();
        assert_eq!(creds.username, None);
        assert_eq!(creds.flags, AuthFlags::SECURE);
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("EXAMPLE\\svc", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("EXAMPLE\\\\svc"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn flags_combine() {
        let mut flags = AuthFlags::SECURE;
        flags |= AuthFlags::SEALING;
        assert_eq!(flags, AuthFlags(0x81));
        assert!(flags.contains(AuthFlags::SECURE | AuthFlags::SEALING));
        assert!(AuthFlags::NONE.contains(AuthFlags::NONE));
    }
}
