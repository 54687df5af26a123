//! Error code definitions
//!
//! Codes are stable: tooling and `pmxc explain` key off them.

/// Syntax/parsing errors (E0xxx)
pub mod syntax {
    pub const UNEXPECTED_TOKEN: &str = "E0001";
    pub const MISSING_DELIMITER: &str = "E0004";
    pub const UNEXPECTED_EOF: &str = "E0008";
    pub const TOO_MANY_FIELDS: &str = "E0011";
    pub const NESTING_TOO_DEEP: &str = "E0012";
}

/// Declaration and pattern errors (E1xxx)
pub mod types {
    pub const WRONG_CONSTRUCTOR_TYPE: &str = "E1001";
    pub const UNKNOWN_IDENTIFIER: &str = "E1002";
    pub const NON_EXHAUSTIVE_MATCH: &str = "E1004";
    pub const DUPLICATE_CONSTRUCTOR: &str = "E1005";
    pub const WRONG_ARGUMENT_COUNT: &str = "E1007";
    pub const DUPLICATE_TYPE: &str = "E1011";
    pub const UNKNOWN_TYPE: &str = "E1012";
    pub const UNKNOWN_CONSTRUCTOR: &str = "E1016";
    pub const AMBIGUOUS_CONSTRUCTOR: &str = "E1017";
}

/// Warnings (W0xxx)
pub mod warnings {
    pub const UNREACHABLE_ARM: &str = "W0003";
}

/// Every code the analyzer can emit, in numeric order
pub const ALL_CODES: &[&str] = &[
    syntax::UNEXPECTED_TOKEN,
    syntax::MISSING_DELIMITER,
    syntax::UNEXPECTED_EOF,
    syntax::TOO_MANY_FIELDS,
    syntax::NESTING_TOO_DEEP,
    types::WRONG_CONSTRUCTOR_TYPE,
    types::UNKNOWN_IDENTIFIER,
    types::NON_EXHAUSTIVE_MATCH,
    types::DUPLICATE_CONSTRUCTOR,
    types::WRONG_ARGUMENT_COUNT,
    types::DUPLICATE_TYPE,
    types::UNKNOWN_TYPE,
    types::UNKNOWN_CONSTRUCTOR,
    types::AMBIGUOUS_CONSTRUCTOR,
    warnings::UNREACHABLE_ARM,
];
