//! Utility modules for common functionality

pub mod exit_codes;
pub mod validators;

// Re-export commonly used functions
pub use exit_codes::{exit_code, get_exit_code_description};
