//! Manual trigger password verification.
//!
//! The manual route is protected by a single shared-secret password
//! configured at startup. The comparison is constant-time; the source of
//! the supplied password (header vs. query parameter) is the HTTP layer's
//! concern.

use hookrun_types::error::AuthError;

use crate::signature::constant_time_eq;

/// Check a manual trigger password against the configured secret.
///
/// - No password configured server-side: the route cannot authenticate
///   anyone, so this fails with [`AuthError::PasswordNotConfigured`]
///   regardless of what was supplied.
/// - Password absent or not equal to the configured secret:
///   [`AuthError::InvalidPassword`].
pub fn verify_password(
    configured: Option<&str>,
    provided: Option<&str>,
) -> Result<(), AuthError> {
    let Some(expected) = configured else {
        return Err(AuthError::PasswordNotConfigured);
    };

    match provided {
        Some(password) if constant_time_eq(expected.as_bytes(), password.as_bytes()) => Ok(()),
        _ => Err(AuthError::InvalidPassword),
    }
}
