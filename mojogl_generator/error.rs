////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Errors and warnings produced while generating bindings.
//!
//! Every variant of [`Error`] is fatal: generation stops before any artifact is written.
//! [`Warning`]s are collected alongside successful output and left to the caller.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// A position inside the registry document, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: u64,
    pub column: u64,
}

impl Location {
    pub fn new(line: u64, column: u64) -> Location {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The input is not well-formed markup.
    #[error("{source_name}:{location}: malformed registry document: {message}")]
    RegistryParse {
        source_name: String,
        location: Location,
        message: String,
    },

    /// The registry is internally inconsistent, e.g. a feature requires a command that is never
    ///  defined.
    #[error("{source_name}:{location}: `{name}`: {message}")]
    SchemaIntegrity {
        source_name: String,
        location: Location,
        name: String,
        message: String,
    },

    #[error("unknown {api} version `{requested}`; valid versions: {}", .valid.join(", "))]
    UnknownVersion {
        api: String,
        requested: String,
        valid: Vec<String>,
    },

    #[error("unknown extension `{requested}`; valid extensions: {}", .valid.join(", "))]
    UnknownExtension { requested: String, valid: Vec<String> },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse failure category, one per [`Error`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RegistryParse,
    SchemaIntegrity,
    UnknownVersion,
    UnknownExtension,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RegistryParse { .. } => ErrorKind::RegistryParse,
            Error::SchemaIntegrity { .. } => ErrorKind::SchemaIntegrity,
            Error::UnknownVersion { .. } => ErrorKind::UnknownVersion,
            Error::UnknownExtension { .. } => ErrorKind::UnknownExtension,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal problem found during generation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Warning {
    /// A type the mapper does not know. It is emitted as `OpaquePointer`.
    UnmappedType { type_name: String, used_by: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::UnmappedType { type_name, used_by } => write!(
                f,
                "type `{}` has no host mapping, emitted as OpaquePointer (used by {})",
                type_name,
                used_by.join(", ")
            ),
        }
    }
}
