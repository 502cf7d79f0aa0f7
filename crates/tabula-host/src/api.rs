//! Host entry points.
//!
//! Every entry point takes its receiver as the first argument. Host indices
//! are 1-based and are resolved to 0-based offsets here, before the core is
//! touched.
use tabula::{Enforcer, Matrix};

use crate::{
    marshal::{self, unexpected},
    HostError, HostResult, Library, Value,
};

fn unpack<'a, const N: usize>(
    entry: &'static str,
    args: &'a [Value],
) -> HostResult<&'a [Value; N]> {
    args.try_into().map_err(|_| HostError::Arity {
        entry,
        accepted: N..=N,
        actual: args.len(),
    })
}

/// `new(rows, cols)`, `new(sequence)` or `new(sequence, rows, cols)`.
pub fn matrix_new(args: &[Value]) -> HostResult<Value> {
    let m = match args {
        [seq] => marshal::matrix_from_sequence(seq.as_sequence()?)?,
        [rows, cols] => {
            let (r, c) = marshal::dimensions(rows, cols)?;
            Matrix::zeros(r, c)?
        }
        [seq, rows, cols] => marshal::matrix_from_data(seq.as_sequence()?, rows, cols)?,
        _ => {
            return Err(HostError::Arity {
                entry: "new",
                accepted: 1..=3,
                actual: args.len(),
            })
        }
    };
    log::debug!("new {:?} from {} arguments", m.shape(), args.len());
    Ok(m.into())
}

pub fn matrix_get(args: &[Value]) -> HostResult<Value> {
    let [m, row, col] = unpack::<3>("get", args)?;
    let m = m.expect_matrix()?;
    let i = Enforcer::resolve_index(row.as_index()?, m.rows())?;
    let j = Enforcer::resolve_index(col.as_index()?, m.cols())?;
    Ok(Value::Number(m.peek(i, j)))
}

pub fn matrix_set(args: &[Value]) -> HostResult<Value> {
    let [m, row, col, value] = unpack::<4>("set", args)?;
    let m = m.expect_matrix()?;
    let i = Enforcer::resolve_index(row.as_index()?, m.rows())?;
    let j = Enforcer::resolve_index(col.as_index()?, m.cols())?;
    m.poke(i, j, value.as_number()?);
    Ok(Value::Nil)
}

pub fn matrix_row(args: &[Value]) -> HostResult<Value> {
    let [m, row] = unpack::<2>("row", args)?;
    Ok(m.expect_matrix()?.row(row.as_index()?)?.into())
}

/// `m[key]`: `rows` and `cols` are answered directly, other names come from
/// the matrix library, and numbers select a row.
pub fn matrix_index(args: &[Value]) -> HostResult<Value> {
    let [receiver, key] = unpack::<2>("index", args)?;
    let m = receiver.expect_matrix()?;
    match key {
        Value::String(field) => match field.as_str() {
            "rows" => Ok(Value::Integer(m.rows() as i64)),
            "cols" => Ok(Value::Integer(m.cols() as i64)),
            _ => Library::matrix().lookup(field, receiver),
        },
        Value::Integer(_) | Value::Number(_) => matrix_row(args),
        other => Err(unexpected("index or field name", other)),
    }
}

/// `m[key] = value`. Matrix fields are read-only and rows cannot be replaced.
pub fn matrix_newindex(args: &[Value]) -> HostResult<Value> {
    let [receiver, key, _] = unpack::<3>("newindex", args)?;
    receiver.expect_matrix()?;
    match key {
        Value::String(field) => Err(HostError::UnknownField {
            kind: receiver.kind(),
            field: field.clone(),
        }),
        other => Err(unexpected("field name", other)),
    }
}

pub fn matrix_add(args: &[Value]) -> HostResult<Value> {
    let [a, b] = unpack::<2>("add", args)?;
    Ok(a.expect_matrix()?.add(b.expect_matrix()?)?.into())
}

pub fn matrix_sub(args: &[Value]) -> HostResult<Value> {
    let [a, b] = unpack::<2>("sub", args)?;
    Ok(a.expect_matrix()?.sub(b.expect_matrix()?)?.into())
}

pub fn matrix_mul(args: &[Value]) -> HostResult<Value> {
    let [a, b] = unpack::<2>("mul", args)?;
    Ok(a.expect_matrix()?.matmul(b.expect_matrix()?)?.into())
}

pub fn matrix_tostring(args: &[Value]) -> HostResult<Value> {
    let [m] = unpack::<1>("tostring", args)?;
    Ok(Value::String(m.expect_matrix()?.to_string()))
}

pub fn matrix_tolist(args: &[Value]) -> HostResult<Value> {
    let [m] = unpack::<1>("tolist", args)?;
    Ok(marshal::matrix_to_value(m.expect_matrix()?))
}

pub fn view_get(args: &[Value]) -> HostResult<Value> {
    let [v, index] = unpack::<2>("get", args)?;
    Ok(Value::Number(v.expect_view()?.get(index.as_index()?)?))
}

pub fn view_set(args: &[Value]) -> HostResult<Value> {
    let [v, index, value] = unpack::<3>("set", args)?;
    v.expect_view()?.set(index.as_index()?, value.as_number()?)?;
    Ok(Value::Nil)
}

/// `v[key]`: numbers read an element, `len` is answered directly, and other
/// names come from the view library.
pub fn view_index(args: &[Value]) -> HostResult<Value> {
    let [receiver, key] = unpack::<2>("index", args)?;
    let v = receiver.expect_view()?;
    match key {
        Value::Integer(_) | Value::Number(_) => view_get(args),
        Value::String(field) if field == "len" => Ok(Value::Integer(v.len() as i64)),
        Value::String(field) => Library::view().lookup(field, receiver),
        other => Err(unexpected("index or field name", other)),
    }
}

/// `v[index] = value`. Assigning to a named field always fails.
pub fn view_newindex(args: &[Value]) -> HostResult<Value> {
    let [receiver, key, _] = unpack::<3>("newindex", args)?;
    receiver.expect_view()?;
    match key {
        Value::Integer(_) | Value::Number(_) => view_set(args),
        Value::String(field) => Err(HostError::UnknownField {
            kind: receiver.kind(),
            field: field.clone(),
        }),
        other => Err(unexpected("index", other)),
    }
}

pub fn view_tostring(args: &[Value]) -> HostResult<Value> {
    let [v] = unpack::<1>("tostring", args)?;
    Ok(Value::String(v.expect_view()?.to_string()))
}

pub fn view_tolist(args: &[Value]) -> HostResult<Value> {
    let [v] = unpack::<1>("tolist", args)?;
    Ok(marshal::view_to_value(v.expect_view()?))
}

/// Calls a builtin fetched through a field lookup: `call(f, args...)`.
pub fn call(args: &[Value]) -> HostResult<Value> {
    match args.split_first() {
        Some((f, rest)) => f.expect_builtin()?.call(rest),
        None => Err(HostError::Arity {
            entry: "call",
            accepted: 1..=usize::MAX,
            actual: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;
    use tabula::InvariantError;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    #[test]
    fn test_new_zeros() -> anyhow::Result<()> {
        let m = matrix_new(&[int(2), int(3)])?;
        assert_eq!(matrix_index(&[m.clone(), "rows".into()])?, int(2));
        assert_eq!(matrix_index(&[m.clone(), "cols".into()])?, int(3));
        assert_eq!(matrix_get(&[m, int(2), int(3)])?, Value::Number(0.0));
        Ok(())
    }

    #[test]
    fn test_new_rejects_bad_dims() {
        assert_eq!(
            matrix_new(&[int(0), int(2)]).unwrap_err(),
            HostError::Invariant(InvariantError::InvalidDimension { rows: 0, cols: 2 })
        );
        assert!(matches!(
            matrix_new(&[]).unwrap_err(),
            HostError::Arity { entry: "new", .. }
        ));
        assert_eq!(
            matrix_new(&[int(1), int(2), int(3), int(4)]).unwrap_err(),
            HostError::Arity {
                entry: "new",
                accepted: 1..=3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_get_bounds() -> anyhow::Result<()> {
        let m = matrix_new(&[int(2), int(2)])?;
        assert_eq!(
            matrix_get(&[m.clone(), int(3), int(1)]).unwrap_err(),
            HostError::Invariant(InvariantError::IndexOutOfRange { index: 3, bound: 2 })
        );
        assert!(matrix_get(&[m.clone(), int(1), int(0)]).is_err());
        assert!(matrix_set(&[m, int(-1), int(1), int(1)]).is_err());
        Ok(())
    }

    #[test]
    fn test_arity() -> anyhow::Result<()> {
        let m = matrix_new(&[int(1), int(1)])?;
        assert_eq!(
            matrix_get(&[m]).unwrap_err(),
            HostError::Arity {
                entry: "get",
                accepted: 3..=3,
                actual: 1
            }
        );
        Ok(())
    }

    #[test]
    fn test_fields_are_read_only() -> anyhow::Result<()> {
        let m = matrix_new(&[int(2), int(2)])?;
        assert_eq!(
            matrix_newindex(&[m.clone(), "rows".into(), int(3)]).unwrap_err(),
            HostError::UnknownField {
                kind: Kind::Matrix,
                field: "rows".into()
            }
        );
        let v = matrix_index(&[m, int(1)])?;
        assert_eq!(
            view_newindex(&[v, "len".into(), int(1)]).unwrap_err(),
            HostError::UnknownField {
                kind: Kind::View,
                field: "len".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_unknown_field() -> anyhow::Result<()> {
        let m = matrix_new(&[int(1), int(1)])?;
        assert_eq!(
            matrix_index(&[m, "transpose".into()]).unwrap_err(),
            HostError::UnknownField {
                kind: Kind::Matrix,
                field: "transpose".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_view_where_matrix_expected() -> anyhow::Result<()> {
        let m = matrix_new(&[int(2), int(2)])?;
        let v = matrix_row(&[m.clone(), int(1)])?;
        assert_eq!(
            matrix_add(&[m, v]).unwrap_err(),
            HostError::type_mismatch("matrix", Kind::View)
        );
        Ok(())
    }

    #[test]
    fn test_view_entry_points() -> anyhow::Result<()> {
        let m = matrix_new(&[Value::from(vec![vec![1.0, 2.0, 3.0]])])?;
        let v = matrix_index(&[m.clone(), Value::Number(1.0)])?;
        assert_eq!(view_index(&[v.clone(), "len".into()])?, int(3));
        assert_eq!(view_index(&[v.clone(), int(-1)])?, Value::Number(3.0));
        view_newindex(&[v.clone(), int(2), Value::Number(20.0)])?;
        assert_eq!(matrix_get(&[m, int(1), int(2)])?, Value::Number(20.0));
        assert_eq!(
            view_tostring(&[v.clone()])?,
            Value::String("[1, 20, 3]".into())
        );
        assert_eq!(view_tolist(&[v])?, Value::from(vec![1.0, 20.0, 3.0]));
        Ok(())
    }

    #[test]
    fn test_call() -> anyhow::Result<()> {
        let m = matrix_new(&[int(2), int(2)])?;
        let set = matrix_index(&[m.clone(), "set".into()])?;
        call(&[set, int(1), int(2), Value::Number(6.0)])?;
        let tostring = matrix_index(&[m, "tostring".into()])?;
        assert_eq!(call(&[tostring])?, Value::String("[[0, 6], [0, 0]]".into()));
        assert!(matches!(call(&[]), Err(HostError::Arity { .. })));
        assert_eq!(
            call(&[int(1)]).unwrap_err(),
            HostError::type_mismatch("builtin", Kind::Integer)
        );
        Ok(())
    }
}
