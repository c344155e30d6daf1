//! Error types for the mime-registry crate.

use std::io;
use thiserror::Error;

/// The main error type for the mime-registry crate.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A string that does not match the `media/sub` identifier grammar.
    #[error("invalid Content-Type provided ({0:?})")]
    InvalidContentType(String),

    /// An encoding token outside the fixed vocabulary.
    #[error("invalid encoding {0:?}: must be default, base64, 7bit, 8bit, or quoted-printable")]
    InvalidEncoding(String),

    /// A platform matcher that fails to compile as a regular expression.
    #[error("invalid system matcher: {0}")]
    InvalidSystem(#[from] regex::Error),

    /// A definition line that could not be parsed. Carries the source
    /// location so corpus errors are reportable at build time.
    #[error("{file}:{line}: parsing error in MIME type definitions: {reason} => {text}")]
    DefinitionParse {
        /// Name of the definition file.
        file: String,
        /// Zero-based line index within the file.
        line: usize,
        /// The raw line text.
        text: String,
        /// What went wrong.
        reason: String,
    },
}

/// Specialized Result type for mime-registry operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidContentType("bogus".to_string());
        assert_eq!(err.to_string(), "invalid Content-Type provided (\"bogus\")");

        let err = Error::InvalidEncoding("zstd".to_string());
        assert!(err.to_string().contains("zstd"));
        assert!(err.to_string().contains("quoted-printable"));

        let err = Error::DefinitionParse {
            file: "extra.types".to_string(),
            line: 7,
            text: "!?garbage".to_string(),
            reason: "no media/sub group".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "extra.types:7: parsing error in MIME type definitions: no media/sub group => !?garbage"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_regex_error_conversion() {
        let re_err = regex::Regex::new("(").unwrap_err();
        let err: Error = re_err.into();
        assert!(matches!(err, Error::InvalidSystem(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = Error::InvalidContentType("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InvalidContentType"));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: Result<i32> = Err(Error::InvalidContentType("error".to_string()));
        assert!(err_result.is_err());
    }
}
