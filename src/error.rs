//! Error types for schema conversion

use thiserror::Error;

use crate::xml::Location;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Conversion failures. All variants are fatal: the whole document
/// conversion aborts with no partial output, and the `path` names the
/// failing node.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// A structural shape with no defined mapping: unions, tuple items,
    /// multi-branch compositions, schema imports or redefines.
    #[error("unsupported construct at {path}: {detail}")]
    UnsupportedConstruct {
        path: String,
        detail: String,
        location: Option<Location>,
    },

    /// A required sub-element is missing or a value is invalid.
    #[error("malformed input at {path}: {detail}")]
    MalformedInput {
        path: String,
        detail: String,
        location: Option<Location>,
    },

    /// A type name not present in the shared built-in mapping table.
    #[error("unknown built-in type at {path}: '{name}'")]
    UnknownType { path: String, name: String },

    /// Keywords left unclaimed after a full pass (strict mode only).
    #[error("unclaimed keywords at {path}: {keywords:?}")]
    UnclaimedKeywords { path: String, keywords: Vec<String> },
}

/// A non-fatal notice surfaced to the caller, e.g. data dropped in
/// lenient mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}
