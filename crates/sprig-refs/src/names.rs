//! Ref name validation following git-style conventions.
//!
//! Valid branch and tag names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot) or `@{`, and must not be `@`
//! - Must not start or end with `.` or `/`
//! - Must not end with `.lock`
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, Result};

/// Characters that are forbidden anywhere in a branch or tag name.
const FORBIDDEN_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', '\0', '~', '^', ':', '?', '*', '[', '\\',
];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidRefName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use sprig_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }
    if name == "@" || name == "HEAD" {
        return Err(invalid(name, "name is reserved"));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }
    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }
    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid(name, "must not start or end with '.'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "must not start or end with '/'"));
    }
    if name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.lock'"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
    }
    Ok(())
}

/// Validate a tag name. Same rules as branch names.
pub fn validate_tag_name(name: &str) -> Result<()> {
    validate_branch_name(name)
}

/// Check that a full ref name (e.g. `refs/heads/main`, `HEAD`) maps to a
/// path inside the repository directory.
///
/// This is looser than [`validate_branch_name`]: it only rejects names that
/// would escape the ref namespace on disk.
pub fn validate_ref_path(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }
    if name.contains('\0') || name.contains('\\') {
        return Err(invalid(name, "contains a path separator or NUL"));
    }
    for component in name.split('/') {
        if component.is_empty() || component == "." || component == ".." {
            return Err(invalid(name, format!("bad path component: {component:?}")));
        }
    }
    Ok(())
}
