//! Eligibility checks run before any planning or outbound traffic.

use subtle::ConstantTimeEq;

use crate::errors::{RelayError, RelayResult};
use crate::misskey::Note;

/// Constant-time comparison of the configured and presented secrets.
pub fn secret_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Check the presented secret. A missing header counts as the empty string,
/// so an empty configured secret admits header-less requests.
pub fn authenticate(expected: &str, provided: Option<&str>) -> RelayResult<()> {
    if secret_matches(expected, provided.unwrap_or_default()) {
        Ok(())
    } else {
        Err(RelayError::WrongSecret)
    }
}

/// Only public and home notes that are not local-only may be relayed.
pub fn check_visibility(note: &Note) -> RelayResult<()> {
    if note.is_local_only() {
        return Err(RelayError::LocalOnly);
    }
    if !note.visibility.is_relayable() {
        return Err(RelayError::Visibility(note.visibility.to_string()));
    }
    Ok(())
}
