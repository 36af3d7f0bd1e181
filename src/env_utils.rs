//! Environment variable helpers for host configuration.
//!
//! Defaults for wait windows and similar knobs read the process
//! environment once at construction time; unset, empty, and unparsable
//! values all fall back rather than erroring.

/// Read an environment variable, treating unset and whitespace-only
/// values as absent.
pub fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Read an environment variable with a default.
pub fn env_var_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

/// Read an integer environment variable; unset or unparsable values fall
/// back to the default.
pub fn env_u64_or(name: &str, default: u64) -> u64 {
    env_var(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
