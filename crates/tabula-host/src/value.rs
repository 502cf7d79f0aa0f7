use tabula::{Matrix, RowView};

use crate::{Builtin, HostError, HostResult};

/// Host-visible type of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Boolean,
    Integer,
    Number,
    String,
    Sequence,
    Matrix,
    View,
    Builtin,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Sequence => "sequence",
            Kind::Matrix => "matrix",
            Kind::View => "view",
            Kind::Builtin => "builtin",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque native object handed to the host.
///
/// The set of kinds is closed, so checking what a handle really is comes
/// down to a match.
#[derive(Debug, Clone)]
pub enum Handle {
    Matrix(Matrix<f64>),
    View(RowView<f64>),
}

impl Handle {
    pub fn kind(&self) -> Kind {
        match self {
            Handle::Matrix(_) => Kind::Matrix,
            Handle::View(_) => Kind::View,
        }
    }
}

impl PartialEq for Handle {
    /// Identity, not contents: two handles are equal when they alias the
    /// same storage (and, for views, the same row).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handle::Matrix(a), Handle::Matrix(b)) => a.ptr_eq(b),
            (Handle::View(a), Handle::View(b)) => {
                a.source().ptr_eq(b.source()) && a.offset() == b.offset()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Sequence(Vec<Value>),
    Handle(Handle),
    Builtin(Builtin),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Boolean(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Sequence(_) => Kind::Sequence,
            Value::Handle(h) => h.kind(),
            Value::Builtin(_) => Kind::Builtin,
        }
    }

    pub fn as_number(&self) -> HostResult<f64> {
        match *self {
            Value::Integer(i) => Ok(i as f64),
            Value::Number(n) => Ok(n),
            _ => Err(HostError::type_mismatch("number", self.kind())),
        }
    }

    /// Integers, and floats with no fractional part, are accepted as indices.
    pub fn as_index(&self) -> HostResult<i64> {
        match *self {
            Value::Integer(i) => Ok(i),
            Value::Number(n)
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
            {
                Ok(n as i64)
            }
            _ => Err(HostError::type_mismatch("integer", self.kind())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> HostResult<&[Value]> {
        match self {
            Value::Sequence(items) => Ok(items),
            _ => Err(HostError::type_mismatch("sequence", self.kind())),
        }
    }

    pub fn expect_matrix(&self) -> HostResult<&Matrix<f64>> {
        match self {
            Value::Handle(Handle::Matrix(m)) => Ok(m),
            _ => Err(HostError::type_mismatch("matrix", self.kind())),
        }
    }

    pub fn expect_view(&self) -> HostResult<&RowView<f64>> {
        match self {
            Value::Handle(Handle::View(v)) => Ok(v),
            _ => Err(HostError::type_mismatch("view", self.kind())),
        }
    }

    pub fn expect_builtin(&self) -> HostResult<&Builtin> {
        match self {
            Value::Builtin(b) => Ok(b),
            _ => Err(HostError::type_mismatch("builtin", self.kind())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Matrix<f64>> for Value {
    fn from(m: Matrix<f64>) -> Self {
        Value::Handle(Handle::Matrix(m))
    }
}

impl From<RowView<f64>> for Value {
    fn from(v: RowView<f64>) -> Self {
        Value::Handle(Handle::View(v))
    }
}

impl From<Builtin> for Value {
    fn from(b: Builtin) -> Self {
        Value::Builtin(b)
    }
}
