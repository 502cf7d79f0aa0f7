use std::ops::RangeInclusive;

use tabula::InvariantError;

use crate::Kind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Invariant(#[from] InvariantError),
    #[error("Type mismatch, expected {expected}, got {actual}.")]
    TypeMismatch { expected: &'static str, actual: Kind },
    #[error("Invalid '{kind}' field '{field}'.")]
    UnknownField { kind: Kind, field: String },
    #[error("Wrong arity for '{entry}'. Allowed range is {accepted:?}, got {actual}.")]
    Arity {
        entry: &'static str,
        accepted: RangeInclusive<usize>,
        actual: usize,
    },
}

impl HostError {
    pub fn type_mismatch(expected: &'static str, actual: Kind) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = HostError::type_mismatch("matrix", Kind::View);
        assert_eq!(err.to_string(), "Type mismatch, expected matrix, got view.");

        let err = HostError::UnknownField {
            kind: Kind::Matrix,
            field: "foo".into(),
        };
        assert_eq!(err.to_string(), "Invalid 'matrix' field 'foo'.");

        let err: HostError = InvariantError::IndexOutOfRange { index: 4, bound: 3 }.into();
        assert_eq!(err.to_string(), "Bad index 4, bound is 3.");

        let err = HostError::Arity {
            entry: "new",
            accepted: 1..=3,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "Wrong arity for 'new'. Allowed range is 1..=3, got 0."
        );
    }
}
