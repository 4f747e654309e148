//! Error codes for grammar source diagnostics.
//!
//! Codes are organized by phase:
//! - `E0xx` - Document errors
//! - `E1xx` - Entry errors
//! - `E2xx` - Attribute-order hint errors
//! - `W3xx` - Attribute-order hint warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The grammar document is not well-formed JSON.
    E001,

    /// Missing collection.
    ///
    /// The document lacks the `nodes` or `namedTypes` object.
    E002,

    // =========================================================================
    // Entry Errors (E1xx)
    // =========================================================================
    /// Invalid entry shape.
    ///
    /// The entry has neither `parents`, `children` and `attributes` nor
    /// `kind` and `argument`.
    E100,

    /// Ambiguous entry shape.
    ///
    /// The entry has the fields of a node and of a named type at once.
    E101,

    /// Misplaced entry.
    ///
    /// A node-shaped entry sits in `namedTypes`, or the other way round.
    E102,

    /// Invalid entry fields.
    ///
    /// The fields are present but hold values of the wrong type.
    E103,

    /// Union with too few alternatives.
    E104,

    /// Alternatives on a non-union kind.
    E105,

    /// Duplicate attribute.
    ///
    /// Two attributes of one node share a name.
    E106,

    // =========================================================================
    // Hint Errors (E2xx)
    // =========================================================================
    /// Attribute listed outside any node section.
    E200,

    /// Malformed hint line.
    E201,

    /// Attribute listed twice in one node section.
    E202,

    /// Node section listed twice.
    E203,

    // =========================================================================
    // Hint Warnings (W3xx)
    // =========================================================================
    /// Hint names an unknown node.
    W300,

    /// Hint names an attribute the node does not have.
    W301,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::W300 => "W300",
            ErrorCode::W301 => "W301",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E002 => "missing collection",
            ErrorCode::E100 => "invalid entry shape",
            ErrorCode::E101 => "ambiguous entry shape",
            ErrorCode::E102 => "misplaced entry",
            ErrorCode::E103 => "invalid entry fields",
            ErrorCode::E104 => "union with too few alternatives",
            ErrorCode::E105 => "alternatives on a non-union kind",
            ErrorCode::E106 => "duplicate attribute",
            ErrorCode::E200 => "attribute outside node section",
            ErrorCode::E201 => "malformed hint line",
            ErrorCode::E202 => "duplicate hinted attribute",
            ErrorCode::E203 => "duplicate node section",
            ErrorCode::W300 => "unknown hinted node",
            ErrorCode::W301 => "unknown hinted attribute",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
