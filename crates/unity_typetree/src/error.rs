//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// Transparent wrapper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    /// The stream ended before a declared count or length was satisfied
    #[error("type tree data is truncated")]
    #[diagnostic(help("the byte range handed to the decoder is shorter than the type tree it declares"))]
    Truncated,

    /// A string offset could not be found in the local or the common string table
    #[error("unable to resolve string at offset {offset:#010x}")]
    UnresolvedString {
        /// The offset that was looked up
        offset: u32,
    },

    /// Encoding was requested for a format this library cannot write
    #[error("writing type trees for asset format version {version} is not supported")]
    UnsupportedFormat {
        /// The asset format version of the tree
        version: i32,
    },

    /// A null terminated string did not end within its length limit
    #[error("string is longer than {limit} bytes")]
    StringTooLong {
        /// The maximum number of bytes allowed before the terminator
        limit: usize,
    },

    /// A count or length read from the stream is negative
    #[error("invalid {what} count {count}")]
    InvalidCount {
        /// What was being counted
        what: &'static str,
        /// The value read from the stream
        count: i32,
    },

    /// A string to be written contains a null byte and would end early
    #[error("{what} {value:?} contains a null byte")]
    NulInString {
        /// What the string is used as
        what: &'static str,
        /// The offending string
        value: String,
    },

    /// A deserialized field tree has links that do not form a tree
    #[error("field tree node {node} is not linked into the tree")]
    InvalidFieldTree {
        /// Index of the first node found inconsistent
        node: usize,
    },

    /// A legacy class has no field tree to write
    #[error("class {class_id} has no field tree")]
    MissingFieldTree {
        /// Identifier of the offending class
        class_id: i32,
    },
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        if value.kind() == std::io::ErrorKind::UnexpectedEof {
            return Error::Truncated;
        }
        Error::IOError(value)
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        if value.is_eof() {
            return Error::Truncated;
        }
        match value {
            binrw::Error::Io(e) => Error::from(e),
            e => Error::BinRWError(e),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
