//! Declaration access levels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Public => "public",
            AccessLevel::Open => "open",
        }
    }

    /// Visible outside the declaring module
    pub fn is_exported(&self) -> bool {
        matches!(self, AccessLevel::Public | AccessLevel::Open)
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Internal
    }
}
