//! implementation for [`SerdeError`]
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// The stage at which something went wrong. The host producer pipeline only needs to know a
/// record could not be serialized, but for configuring and for codec failures it's useful to be
/// able to tell them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Serialization,
    Deserialization,
    Codec,
}

/// Error struct which makes it easy to know at which stage the error occurred, and whether trying
/// it again might not cause an error.
#[derive(Clone, Debug, PartialEq)]
pub struct SerdeError {
    pub kind: ErrorKind,
    pub error: String,
    pub cause: Option<String>,
    pub retriable: bool,
}

/// Implements standard error so error handling can be simplified
impl Error for SerdeError {}

/// Gives the information from the error in a readable format.
impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(
                f,
                "{:?} error: {}, was caused by {}, it's retriable: {}",
                self.kind, self.error, &cause, self.retriable
            ),
            None => write!(
                f,
                "{:?} error: {} had no other cause, it's retriable: {}",
                self.kind, self.error, self.retriable
            ),
        }
    }
}

impl SerdeError {
    pub fn new(kind: ErrorKind, error: &str, cause: Option<String>, retriable: bool) -> SerdeError {
        SerdeError {
            kind,
            error: error.to_owned(),
            cause,
            retriable,
        }
    }
    pub fn configuration_without_cause(error: &str) -> SerdeError {
        SerdeError::new(ErrorKind::Configuration, error, None, false)
    }
    pub fn configuration_with_cause<T: Display>(cause: T, error: &str) -> SerdeError {
        SerdeError::new(
            ErrorKind::Configuration,
            error,
            Some(format!("{}", cause)),
            false,
        )
    }
    pub fn deserialization_with_cause<T: Display>(cause: T, error: &str) -> SerdeError {
        SerdeError::new(
            ErrorKind::Deserialization,
            error,
            Some(format!("{}", cause)),
            false,
        )
    }
    pub fn codec_retryable_with_cause<T: Display>(cause: T, error: &str) -> SerdeError {
        SerdeError::new(ErrorKind::Codec, error, Some(format!("{}", cause)), true)
    }
    pub fn codec_non_retryable_with_cause<T: Display>(cause: T, error: &str) -> SerdeError {
        SerdeError::new(ErrorKind::Codec, error, Some(format!("{}", cause)), false)
    }
    pub fn codec_non_retryable_without_cause(error: &str) -> SerdeError {
        SerdeError::new(ErrorKind::Codec, error, None, false)
    }
    /// Wraps any error coming out of the codec into the error the producer expects when a record
    /// could not be serialized. Whether a retry makes sense is taken over from the cause.
    pub fn into_serialization(self, error: &str) -> SerdeError {
        let retriable = self.retriable;
        SerdeError::new(
            ErrorKind::Serialization,
            error,
            Some(format!("{}", self)),
            retriable,
        )
    }
}
