//! Slug validation shared by group identifiers.
//!
//! A slug is a trimmed, non-empty string of lowercase ASCII letters, digits,
//! and hyphens.

/// Return `true` when `value` is a well-formed slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}
