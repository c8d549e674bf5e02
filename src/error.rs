use thiserror::Error;

use crate::entity::ValueType;

/// Hard failures raised while deriving or using entity metadata.
///
/// Everything else (unmapped members, blank table overrides, lookup misses) is handled softly and
/// never reaches this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A foreign key on a collection member does not say which remote column it refers to.
    #[error("member `{member}` of `{model}` is a foreign key but has no {missing}")]
    MissingLinkage {
        model: &'static str,
        member: &'static str,
        missing: &'static str,
    },

    /// Two internal fields resolve to the same column name (compared case-insensitively).
    #[error("column `{column}` is declared more than once on `{model}`")]
    DuplicateColumn { model: &'static str, column: String },

    #[error("`{model}` resolves to an empty table name")]
    EmptyTableName { model: &'static str },

    /// A value written through a field handle did not have the field's declared type.
    #[error("column `{column}` of `{model}` expects a value of type `{expected}`")]
    ValueTypeMismatch {
        model: &'static str,
        column: String,
        expected: ValueType,
    },
}
