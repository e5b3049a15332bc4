//! Input validation utilities
//!
//! Domain-specific checks applied to configuration values after they have
//! been merged from flags, environment variables and the config file.

use std::time::Duration;

/// Validation errors for configuration inputs
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required input was not provided
    MissingRequired { argument: String, reason: String },
    /// Invalid input value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequired { argument, reason } => {
                write!(f, "{} is required: {}", argument, reason)
            }
            ValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn invalid(argument: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        argument: argument.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate a git branch name
///
/// Covers the `git check-ref-format` rules that matter for user input.
pub fn validate_branch_name(argument: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid(
            argument,
            name,
            "branch name cannot be empty or whitespace only",
        ));
    }

    let bad_char = name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c));
    if name.starts_with('-')
        || name.starts_with('/')
        || name.ends_with('.')
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("..")
        || name.contains("//")
        || name.contains("@{")
        || bad_char
    {
        return Err(invalid(argument, name, "invalid Git branch name format"));
    }

    Ok(())
}

/// Validate a commit message
pub fn validate_commit_message(message: Option<&str>) -> Result<(), ValidationError> {
    match message {
        None => Err(ValidationError::MissingRequired {
            argument: "commit message".to_string(),
            reason: "committing on behalf of the caller needs a message".to_string(),
        }),
        Some(msg) if msg.trim().is_empty() => Err(invalid(
            "commit message",
            msg,
            "commit message cannot be empty or whitespace only",
        )),
        Some(_) => Ok(()),
    }
}

/// Validate an e-mail address used for commit identity
pub fn validate_email(argument: &str, email: &str) -> Result<(), ValidationError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !email.chars().any(char::is_whitespace);
    if !valid {
        return Err(invalid(argument, email, "not a valid e-mail address"));
    }
    Ok(())
}

/// Parse a whole number of seconds
///
/// Accepts non-negative integers only; surrounding whitespace is ignored.
pub fn parse_seconds(argument: &str, value: &str) -> Result<Duration, ValidationError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid(argument, value, "must be a non-negative whole number of seconds"))
}

/// Parse a boolean input the way CI runners spell them
pub fn parse_bool(argument: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(argument, value, "expected true or false")),
    }
}
