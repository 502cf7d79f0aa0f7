use tabula::{InvariantError, Shape};
use tabula_host::{
    call, matrix_get, matrix_index, matrix_mul, matrix_new, matrix_set, matrix_tolist,
    matrix_tostring, view_index, view_newindex, HostError, Kind, Value,
};
use test_strategy::proptest;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn int(i: i64) -> Value {
    Value::Integer(i)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn dims(shape: &Shape) -> [Value; 2] {
    [int(shape.rows() as i64), int(shape.cols() as i64)]
}

#[proptest(cases = 32)]
fn new_is_zero_filled(#[any((1..6usize, 1..6usize))] shape: Shape) {
    init_logger();
    let m = matrix_new(&dims(&shape)).unwrap();
    let [rows, cols] = dims(&shape);
    assert_eq!(matrix_index(&[m.clone(), "rows".into()]).unwrap(), rows);
    assert_eq!(matrix_index(&[m.clone(), "cols".into()]).unwrap(), cols);
    for i in 1..=shape.rows() as i64 {
        for j in 1..=shape.cols() as i64 {
            assert_eq!(matrix_get(&[m.clone(), int(i), int(j)]).unwrap(), num(0.0));
        }
    }
}

#[proptest(cases = 32)]
fn out_of_range_set_leaves_matrix_alone(
    #[any((1..5usize, 1..5usize))] shape: Shape,
    #[strategy(-3i64..8)] i: i64,
    #[strategy(-3i64..8)] j: i64,
) {
    let m = matrix_new(&dims(&shape)).unwrap();
    let before = matrix_tolist(&[m.clone()]).unwrap();
    let in_range =
        (1..=shape.rows() as i64).contains(&i) && (1..=shape.cols() as i64).contains(&j);
    let result = matrix_set(&[m.clone(), int(i), int(j), num(1.0)]);
    assert_eq!(result.is_ok(), in_range);
    if !in_range {
        assert!(matches!(
            result,
            Err(HostError::Invariant(InvariantError::IndexOutOfRange { .. }))
        ));
        assert_eq!(matrix_tolist(&[m]).unwrap(), before);
    }
}

#[test]
fn nested_construction_is_one_based() -> anyhow::Result<()> {
    init_logger();
    let m = matrix_new(&[Value::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]])])?;
    assert_eq!(matrix_get(&[m.clone(), int(1), int(1)])?, num(1.0));
    assert_eq!(matrix_get(&[m.clone(), int(1), int(2)])?, num(2.0));
    assert_eq!(matrix_get(&[m.clone(), int(2), int(1)])?, num(3.0));
    assert_eq!(matrix_get(&[m, int(2), int(2)])?, num(4.0));
    Ok(())
}

#[test]
fn flat_construction_is_a_row_vector() -> anyhow::Result<()> {
    let m = matrix_new(&[Value::from(vec![1.0, 2.0, 3.0])])?;
    assert_eq!(matrix_index(&[m.clone(), "rows".into()])?, int(1));
    assert_eq!(matrix_index(&[m.clone(), "cols".into()])?, int(3));
    assert_eq!(matrix_get(&[m.clone(), int(1), int(1)])?, num(1.0));
    assert_eq!(matrix_get(&[m, int(1), int(3)])?, num(3.0));
    Ok(())
}

#[test]
fn end_to_end_set_and_format() -> anyhow::Result<()> {
    let m = matrix_new(&[int(2), int(2)])?;
    for (i, j, v) in [(1, 1, 5), (1, 2, 6), (2, 1, 7), (2, 2, 8)] {
        matrix_set(&[m.clone(), int(i), int(j), int(v)])?;
    }
    assert_eq!(
        matrix_tostring(&[m])?,
        Value::String("[[5, 6], [7, 8]]".into())
    );
    Ok(())
}

#[test]
fn end_to_end_product() -> anyhow::Result<()> {
    let a = matrix_new(&[Value::from(vec![vec![1i64, 2], vec![3, 4]])])?;
    let b = matrix_new(&[Value::from(vec![vec![5i64, 6], vec![7, 8]])])?;
    let c = matrix_mul(&[a, b])?;
    assert_eq!(
        matrix_tostring(&[c])?,
        Value::String("[[19, 22], [43, 50]]".into())
    );
    Ok(())
}

#[test]
fn mismatched_add_through_library() -> anyhow::Result<()> {
    let a = matrix_new(&[int(2), int(2)])?;
    let b = matrix_new(&[int(2), int(3)])?;
    let add = matrix_index(&[a, "add".into()])?;
    let err = call(&[add, b]).unwrap_err();
    assert!(matches!(
        err,
        HostError::Invariant(InvariantError::DimensionMismatch { .. })
    ));
    assert!(err.to_string().contains("[2x2]"));
    Ok(())
}

#[test]
fn views_survive_their_matrix() -> anyhow::Result<()> {
    let v = {
        let m = matrix_new(&[Value::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]])])?;
        matrix_index(&[m, int(2)])?
    };
    view_newindex(&[v.clone(), int(-1), num(40.0)])?;
    assert_eq!(view_index(&[v.clone(), int(2)])?, num(40.0));
    let tolist = view_index(&[v, "tolist".into()])?;
    assert_eq!(call(&[tolist])?, Value::from(vec![3.0, 40.0]));
    Ok(())
}

#[test]
fn handles_are_checked() -> anyhow::Result<()> {
    let m = matrix_new(&[int(1), int(2)])?;
    let v = matrix_index(&[m.clone(), int(1)])?;
    assert_eq!(
        matrix_get(&[v.clone(), int(1), int(1)]).unwrap_err(),
        HostError::TypeMismatch {
            expected: "matrix",
            actual: Kind::View
        }
    );
    assert_eq!(
        view_index(&[m, int(1)]).unwrap_err(),
        HostError::TypeMismatch {
            expected: "view",
            actual: Kind::Matrix
        }
    );
    assert_eq!(
        matrix_mul(&[v, num(2.0)]).unwrap_err(),
        HostError::TypeMismatch {
            expected: "matrix",
            actual: Kind::View
        }
    );
    Ok(())
}
