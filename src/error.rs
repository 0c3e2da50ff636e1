//! Errors raised while synthesizing fixtures.
//!
//! None of these are retried by the engine. Constructor probing swallows a
//! failed candidate only to try the next one; once every candidate is spent
//! the last failure is surfaced, wrapped in `NoUsableConstructor`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixtureError {
    /// A size or length constraint derived from the configuration can't be met
    #[error("Invalid fixture configuration: {0}")]
    InvalidConfiguration(String),

    /// Every constructor candidate of `class` failed
    #[error("Couldn't create instance of type={class}{}", last_failure(.source))]
    NoUsableConstructor {
        class: String,
        #[source]
        source: Option<Box<FixtureError>>,
    },

    /// A formal type parameter was still symbolic where a concrete type was needed
    #[error("Type parameter could not be resolved: {0}")]
    TypeResolution(String),

    /// A value didn't have the shape its consumer expected
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Raised by user constructors and custom creators
    #[error("Construction failed: {0}")]
    ConstructionFailed(String),
}

fn last_failure(source: &Option<Box<FixtureError>>) -> String {
    match source {
        Some(inner) => format!(", last failure: {}", inner),
        None => String::new(),
    }
}

impl FixtureError {
    pub fn construction(message: impl Into<String>) -> Self {
        FixtureError::ConstructionFailed(message.into())
    }

    pub fn mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        FixtureError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Innermost failure of a chain of `NoUsableConstructor` errors.
    pub fn root_cause(&self) -> &FixtureError {
        let mut current = self;
        while let FixtureError::NoUsableConstructor {
            source: Some(inner),
            ..
        } = current
        {
            current = inner.as_ref();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_root_cause_walks_nested_constructor_failures() {
        let err = FixtureError::NoUsableConstructor {
            class: "Outer".to_string(),
            source: Some(Box::new(FixtureError::NoUsableConstructor {
                class: "Inner".to_string(),
                source: Some(Box::new(FixtureError::construction("boom"))),
            })),
        };

        assert_eq!(err.root_cause(), &FixtureError::construction("boom"));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Couldn't create instance of type=Outer, last failure: \
             Couldn't create instance of type=Inner, last failure: Construction failed: boom"
        );
    }

    #[test]
    fn test_constructor_failure_without_source() {
        let err = FixtureError::NoUsableConstructor {
            class: "Empty".to_string(),
            source: None,
        };
        assert_eq!(err.root_cause(), &err);
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "Couldn't create instance of type=Empty");
    }
}
