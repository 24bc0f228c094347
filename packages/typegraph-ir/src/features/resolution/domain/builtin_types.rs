//! Built-in language types
//!
//! Names that are never reported as unresolved unless the caller asks
//! for it (`ResolutionConfig::report_builtin_references`). A declaration
//! in the scanned set with the same name still wins the lookup.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    pub static ref BUILTIN_TYPES: HashSet<&'static str> = {
        let mut s = HashSet::with_capacity(96);

        // ═══════════════════════════════════════════════════════════
        // Scalars
        // ═══════════════════════════════════════════════════════════
        for name in [
            "Int", "Int8", "Int16", "Int32", "Int64",
            "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
            "Float", "Float16", "Float80", "Double", "CGFloat", "Decimal",
            "Bool", "String", "Substring", "Character", "Unicode",
            "Void", "Never", "Any", "AnyObject", "AnyClass", "Self",
        ] {
            s.insert(name);
        }

        // ═══════════════════════════════════════════════════════════
        // Generic containers
        // ═══════════════════════════════════════════════════════════
        for name in [
            "Optional", "ImplicitlyUnwrappedOptional", "Array", "ContiguousArray",
            "ArraySlice", "Dictionary", "Set", "Result", "Range", "ClosedRange",
            "Slice", "KeyPath", "WritableKeyPath", "UnsafePointer",
            "UnsafeMutablePointer", "UnsafeRawPointer", "UnsafeMutableRawPointer",
        ] {
            s.insert(name);
        }

        // ═══════════════════════════════════════════════════════════
        // Standard protocols
        // ═══════════════════════════════════════════════════════════
        for name in [
            "Error", "Equatable", "Hashable", "Comparable", "Identifiable",
            "Codable", "Encodable", "Decodable", "CodingKey", "Sendable",
            "CustomStringConvertible", "CustomDebugStringConvertible",
            "RawRepresentable", "CaseIterable", "Sequence", "Collection",
            "BidirectionalCollection", "RandomAccessCollection", "MutableCollection",
            "RangeReplaceableCollection", "IteratorProtocol", "Numeric",
            "BinaryInteger", "FixedWidthInteger", "FloatingPoint", "StringProtocol",
            "ExpressibleByStringLiteral", "ExpressibleByIntegerLiteral",
            "ExpressibleByArrayLiteral", "ExpressibleByDictionaryLiteral",
            "ExpressibleByNilLiteral", "ExpressibleByBooleanLiteral",
            "ExpressibleByFloatLiteral", "Actor", "AnyActor",
        ] {
            s.insert(name);
        }

        // ═══════════════════════════════════════════════════════════
        // Foundation types commonly referenced from model code
        // ═══════════════════════════════════════════════════════════
        for name in [
            "NSObject", "NSObjectProtocol", "Data", "Date", "URL", "UUID",
            "TimeInterval", "NSError", "NSCoding", "NSSecureCoding", "NSCopying",
        ] {
            s.insert(name);
        }

        s
    };
}

/// Built-in check on the first segment, so `Swift.Int` and
/// `Dictionary.Index` count as built-in too
pub fn is_builtin_type(name: &str) -> bool {
    let head = match name.split_once('.') {
        Some(("Swift", rest)) => rest.split('.').next().unwrap_or(rest),
        Some((head, _)) => head,
        None => name,
    };
    BUILTIN_TYPES.contains(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin_type("Int"));
        assert!(is_builtin_type("Swift.Int"));
        assert!(is_builtin_type("Dictionary.Index"));
        assert!(!is_builtin_type("ExternalThing"));
        assert!(!is_builtin_type("Swift"));
    }
}
