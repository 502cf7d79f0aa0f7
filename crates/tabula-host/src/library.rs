use crate::{api, HostError, HostResult, Kind, Value};

/// Signature shared by every host entry point. The receiver, when there is
/// one, is the first argument.
pub type Method = fn(&[Value]) -> HostResult<Value>;

/// A library function fetched through a field lookup, possibly bound to the
/// handle it was fetched from.
#[derive(Clone)]
pub struct Builtin {
    kind: Kind,
    name: &'static str,
    method: Method,
    receiver: Option<Box<Value>>,
}

impl Builtin {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    /// Calls the function, passing the bound receiver (if any) ahead of
    /// `args`.
    pub fn call(&self, args: &[Value]) -> HostResult<Value> {
        log::trace!("Calling {}.{}", self.kind, self.name);
        match &self.receiver {
            Some(receiver) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push((**receiver).clone());
                full.extend_from_slice(args);
                (self.method)(&full)
            }
            None => (self.method)(args),
        }
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("bound", &self.receiver.is_some())
            .finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name && self.receiver == other.receiver
    }
}

pub struct Entry {
    name: &'static str,
    method: Method,
    bound: bool,
}

impl Entry {
    const fn bound(name: &'static str, method: Method) -> Self {
        Self {
            name,
            method,
            bound: true,
        }
    }

    const fn unbound(name: &'static str, method: Method) -> Self {
        Self {
            name,
            method,
            bound: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

/// Functions shared by every handle of one kind, looked up by name once the
/// read-only fields have been ruled out.
pub struct Library {
    kind: Kind,
    entries: &'static [Entry],
}

static MATRIX: Library = Library {
    kind: Kind::Matrix,
    entries: &[
        Entry::unbound("new", api::matrix_new),
        Entry::bound("get", api::matrix_get),
        Entry::bound("set", api::matrix_set),
        Entry::bound("row", api::matrix_row),
        Entry::bound("add", api::matrix_add),
        Entry::bound("sub", api::matrix_sub),
        Entry::bound("mul", api::matrix_mul),
        Entry::bound("tostring", api::matrix_tostring),
        Entry::bound("tolist", api::matrix_tolist),
    ],
};

static VIEW: Library = Library {
    kind: Kind::View,
    entries: &[
        Entry::bound("get", api::view_get),
        Entry::bound("set", api::view_set),
        Entry::bound("tostring", api::view_tostring),
        Entry::bound("tolist", api::view_tolist),
    ],
};

impl Library {
    pub fn matrix() -> &'static Library {
        &MATRIX
    }

    pub fn view() -> &'static Library {
        &VIEW
    }

    pub fn entries(&self) -> &'static [Entry] {
        self.entries
    }

    /// Resolves `field` to a [`Builtin`], bound to `receiver` unless the entry
    /// is a plain constructor.
    pub fn lookup(&self, field: &str, receiver: &Value) -> HostResult<Value> {
        log::trace!("Looking up {}.{}", self.kind, field);
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == field)
            .ok_or_else(|| HostError::UnknownField {
                kind: self.kind,
                field: field.to_string(),
            })?;
        Ok(Value::Builtin(Builtin {
            kind: self.kind,
            name: entry.name,
            method: entry.method,
            receiver: entry.is_bound().then(|| Box::new(receiver.clone())),
        }))
    }
}
