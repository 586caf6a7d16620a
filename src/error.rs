//! Error types for the `kinship` class runtime.
//!
//! This module defines the error taxonomy used throughout the crate. A
//! capability-lookup miss is **not** represented here: `cast` and the
//! interface chain surface misses as `None`, which callers must check. Errors
//! are reserved for conditions that genuinely have no value to return, such
//! as cloning a class that does not support it.

use std::fmt;

/// Errors that can occur in the `kinship` runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `clone_instance` was invoked on a class that does not override the
    /// default clone behavior. Identifies the concrete class that failed.
    CloneNotSupported {
        /// Name of the class whose clone was requested.
        class: &'static str,
    },

    /// A class or interface name was registered twice with distinct
    /// definitions.
    DuplicateName {
        /// The colliding name.
        name: &'static str,
    },

    /// A class declared more interfaces than the chain can hold.
    InterfaceLimitExceeded {
        /// Name of the offending class.
        class: &'static str,
        /// Number of interfaces the class tried to declare.
        declared: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CloneNotSupported { class } => {
                write!(f, "class '{class}' does not support clone")
            }
            Error::DuplicateName { name } => {
                write!(f, "name '{name}' is already registered")
            }
            Error::InterfaceLimitExceeded { class, declared } => {
                write!(
                    f,
                    "class '{class}' declares {declared} interfaces, maximum is 16"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for kinship runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", Error::CloneNotSupported { class: "Point" }),
            "class 'Point' does not support clone"
        );
        assert_eq!(
            format!("{}", Error::DuplicateName { name: "Point" }),
            "name 'Point' is already registered"
        );
        assert_eq!(
            format!(
                "{}",
                Error::InterfaceLimitExceeded { class: "Point", declared: 17 }
            ),
            "class 'Point' declares 17 interfaces, maximum is 16"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::CloneNotSupported { class: "A" },
            Error::CloneNotSupported { class: "A" }
        );
        assert_ne!(
            Error::CloneNotSupported { class: "A" },
            Error::CloneNotSupported { class: "B" }
        );
    }
}
