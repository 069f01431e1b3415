//! Validation for modal form fields.
//!
//! Each validator returns an error message if validation fails, `None` if the
//! value is acceptable.

/// Characters git refuses anywhere in a ref name.
const FORBIDDEN_REF_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a new branch name against git's ref-name rules.
pub fn validate_branch_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Branch name required".to_string());
    }
    if name.starts_with('-') {
        return Some("Branch name cannot start with '-'".to_string());
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Some("Branch name cannot start or end with '/'".to_string());
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return Some("Branch name cannot end with '.' or '.lock'".to_string());
    }
    if name == "@" || name.contains("@{") {
        return Some("Branch name cannot contain '@{'".to_string());
    }
    if name.contains("..") || name.contains("//") {
        return Some("Branch name cannot contain '..' or '//'".to_string());
    }
    if name.split('/').any(|part| part.starts_with('.')) {
        return Some("Path components cannot start with '.'".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_control() || FORBIDDEN_REF_CHARS.contains(c))
    {
        let shown = if c == ' ' {
            "space".to_string()
        } else if c.is_control() {
            "control characters".to_string()
        } else {
            format!("'{c}'")
        };
        return Some(format!("Branch name cannot contain {shown}"));
    }
    None
}

/// Validate the base branch a worktree is cut from.
pub fn validate_base_branch(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Base branch required".to_string());
    }
    validate_branch_name(name.trim())
}
