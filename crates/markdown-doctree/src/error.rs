use thiserror::Error;

/// A schema-authoring bug, detected when the schema or its token handler
/// table is built. Never raised for bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Schema has no `{0}` node type")]
    MissingType(String),

    #[error("Unknown node or mark type: {0}")]
    UnknownType(String),

    #[error("Type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("Invalid parse rule for token `{token}` on `{owner}`: {reason}")]
    InvalidRule {
        owner: String,
        token: String,
        reason: String,
    },

    #[error("Token `{token}` is claimed by both `{first}` and `{second}`")]
    DuplicateToken {
        token: String,
        first: String,
        second: String,
    },

    #[error("Required child of `{0}` never reaches a type without one")]
    RequiredChildCycle(String),
}

/// Failure of a single parse call. Nothing partial is returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unsupported token type: {0}")]
    UnsupportedToken(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
