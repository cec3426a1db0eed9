//! Input-time name checks for workspaces, documents and uploads.
//!
//! These run before any request is built, so a rejected name never
//! reaches the network.

use crate::error::{Error, Result};

/// Characters that may not appear in user-supplied names.
pub const ILLEGAL_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `false` iff `name` contains any character of [`ILLEGAL_NAME_CHARS`].
pub fn is_name_valid(name: &str) -> bool {
    !name.contains(&ILLEGAL_NAME_CHARS[..])
}

/// The forbidden characters present in `name`, in [`ILLEGAL_NAME_CHARS`] order.
///
/// ```
/// use kbank_core::illegal_chars_found;
///
/// assert_eq!(illegal_chars_found("a/b:c"), vec!['/', ':']);
/// ```
pub fn illegal_chars_found(name: &str) -> Vec<char> {
    ILLEGAL_NAME_CHARS
        .iter()
        .copied()
        .filter(|c| name.contains(*c))
        .collect()
}

/// Reject `name` with [`Error::NameRejected`] if it has forbidden characters.
pub fn check_name(name: &str) -> Result<()> {
    let illegal = illegal_chars_found(name);
    if illegal.is_empty() {
        Ok(())
    } else {
        Err(Error::NameRejected {
            name: name.to_string(),
            illegal,
        })
    }
}
