use thiserror::Error;

/// Validated index query failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexQueryError {
    /// `inheriting` asked about a protocol
    #[error("'{0}' is a protocol; class inheritance queries need a class name")]
    NotAClass(String),

    /// `implementing` asked about a class
    #[error("'{0}' is a class; conformance queries need a protocol name")]
    NotAProtocol(String),

    #[error("'{0}' names no declaration and appears in no inheritance clause")]
    UnknownType(String),
}
