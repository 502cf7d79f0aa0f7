//! Python bridge: `tabula.Matrix`, `tabula.View` and `tabula.Builtin`.
//!
//! Every Python dunder marshals its arguments to [`Value`]s and defers to the
//! host entry points, so the Python surface behaves exactly like any other
//! host.
use pyo3::{
    exceptions::{PyAttributeError, PyIndexError, PyTypeError, PyValueError},
    prelude::*,
    types::{PyBool, PyFloat, PyLong, PySequence, PyString, PyTuple},
};
use tabula::{InvariantError, Matrix, RowView};

use crate::{api, Builtin, Handle, HostError, Method, Value};

impl From<HostError> for PyErr {
    fn from(err: HostError) -> PyErr {
        match &err {
            HostError::Invariant(InvariantError::IndexOutOfRange { .. }) => {
                PyIndexError::new_err(err.to_string())
            }
            HostError::Invariant(_) => PyValueError::new_err(err.to_string()),
            HostError::TypeMismatch { .. } => PyTypeError::new_err(err.to_string()),
            HostError::Arity { .. } => PyTypeError::new_err(err.to_string()),
            HostError::UnknownField { .. } => PyAttributeError::new_err(err.to_string()),
        }
    }
}

/// bool is checked before int, and str before sequence, since Python treats
/// the former as instances of the latter.
pub fn py_to_value(obj: &PyAny) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Nil);
    }
    if obj.is_instance_of::<PyBool>() {
        return Ok(Value::Boolean(obj.extract()?));
    }
    if obj.is_instance_of::<PyLong>() {
        return Ok(Value::Integer(obj.extract()?));
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(Value::Number(obj.extract()?));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::String(obj.extract()?));
    }
    if let Ok(m) = obj.extract::<PyRef<PyMatrix>>() {
        return Ok(m.inner.clone().into());
    }
    if let Ok(v) = obj.extract::<PyRef<PyView>>() {
        return Ok(v.inner.clone().into());
    }
    if let Ok(b) = obj.extract::<PyRef<PyBuiltin>>() {
        return Ok(b.inner.clone().into());
    }
    if obj.downcast::<PySequence>().is_ok() {
        let items = obj
            .iter()?
            .map(|item| py_to_value(item?))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(Value::Sequence(items));
    }
    Err(PyTypeError::new_err(format!(
        "Cannot pass {} to tabula",
        obj.get_type().name()?
    )))
}

pub fn value_to_py(py: Python<'_>, value: Value) -> PyResult<PyObject> {
    Ok(match value {
        Value::Nil => py.None(),
        Value::Boolean(b) => b.into_py(py),
        Value::Integer(i) => i.into_py(py),
        Value::Number(n) => n.into_py(py),
        Value::String(s) => s.into_py(py),
        Value::Sequence(items) => {
            let items = items
                .into_iter()
                .map(|v| value_to_py(py, v))
                .collect::<PyResult<Vec<PyObject>>>()?;
            items.into_py(py)
        }
        Value::Handle(Handle::Matrix(inner)) => Py::new(py, PyMatrix { inner })?.into_py(py),
        Value::Handle(Handle::View(inner)) => Py::new(py, PyView { inner })?.into_py(py),
        Value::Builtin(inner) => Py::new(py, PyBuiltin { inner })?.into_py(py),
    })
}

fn values(args: &PyTuple) -> PyResult<Vec<Value>> {
    args.iter().map(py_to_value).collect()
}

/// Calls `entry` with `receiver` followed by the Python arguments.
fn dispatch(
    py: Python<'_>,
    entry: Method,
    receiver: Value,
    rest: &[&PyAny],
) -> PyResult<PyObject> {
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(receiver);
    for arg in rest {
        args.push(py_to_value(arg)?);
    }
    value_to_py(py, entry(&args)?)
}

/// Binary operators only accept another `Matrix`. Anything else gets
/// `NotImplemented`, so Python can try the reflected operator before raising
/// `TypeError`.
fn operator(
    py: Python<'_>,
    entry: Method,
    receiver: Value,
    other: &PyAny,
) -> PyResult<PyObject> {
    if other.extract::<PyRef<PyMatrix>>().is_err() {
        return Ok(py.NotImplemented());
    }
    dispatch(py, entry, receiver, &[other])
}

#[pyclass(name = "Matrix", module = "tabula")]
pub struct PyMatrix {
    inner: Matrix<f64>,
}

impl PyMatrix {
    fn receiver(&self) -> Value {
        self.inner.clone().into()
    }
}

#[pymethods]
impl PyMatrix {
    #[new]
    #[pyo3(signature = (*args))]
    fn py_new(args: &PyTuple) -> PyResult<Self> {
        let inner = api::matrix_new(&values(args)?)?.expect_matrix()?.clone();
        Ok(Self { inner })
    }

    fn __getattr__(&self, py: Python<'_>, name: &str) -> PyResult<PyObject> {
        value_to_py(py, api::matrix_index(&[self.receiver(), name.into()])?)
    }

    fn __getitem__(&self, py: Python<'_>, key: &PyAny) -> PyResult<PyObject> {
        dispatch(py, api::matrix_index, self.receiver(), &[key])
    }

    fn __setitem__(&self, py: Python<'_>, key: &PyAny, value: &PyAny) -> PyResult<()> {
        dispatch(py, api::matrix_newindex, self.receiver(), &[key, value]).map(drop)
    }

    fn __add__(&self, py: Python<'_>, other: &PyAny) -> PyResult<PyObject> {
        operator(py, api::matrix_add, self.receiver(), other)
    }

    fn __sub__(&self, py: Python<'_>, other: &PyAny) -> PyResult<PyObject> {
        operator(py, api::matrix_sub, self.receiver(), other)
    }

    fn __mul__(&self, py: Python<'_>, other: &PyAny) -> PyResult<PyObject> {
        operator(py, api::matrix_mul, self.receiver(), other)
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Matrix({})", self.inner)
    }
}

#[pyclass(name = "View", module = "tabula")]
pub struct PyView {
    inner: RowView<f64>,
}

impl PyView {
    fn receiver(&self) -> Value {
        self.inner.clone().into()
    }
}

#[pymethods]
impl PyView {
    fn __getattr__(&self, py: Python<'_>, name: &str) -> PyResult<PyObject> {
        value_to_py(py, api::view_index(&[self.receiver(), name.into()])?)
    }

    fn __getitem__(&self, py: Python<'_>, key: &PyAny) -> PyResult<PyObject> {
        dispatch(py, api::view_index, self.receiver(), &[key])
    }

    fn __setitem__(&self, py: Python<'_>, key: &PyAny, value: &PyAny) -> PyResult<()> {
        dispatch(py, api::view_newindex, self.receiver(), &[key, value]).map(drop)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("View({})", self.inner)
    }
}

#[pyclass(name = "Builtin", module = "tabula")]
pub struct PyBuiltin {
    inner: Builtin,
}

#[pymethods]
impl PyBuiltin {
    #[pyo3(signature = (*args))]
    fn __call__(&self, py: Python<'_>, args: &PyTuple) -> PyResult<PyObject> {
        value_to_py(py, self.inner.call(&values(args)?)?)
    }

    fn __repr__(&self) -> String {
        format!("<builtin {}.{}>", self.inner.kind(), self.inner.name())
    }
}

/// Module-level constructor, same arguments as `Matrix(...)`.
#[pyfunction]
#[pyo3(signature = (*args))]
fn new(args: &PyTuple) -> PyResult<PyMatrix> {
    PyMatrix::py_new(args)
}

/// Adds the classes and functions of the `tabula` module to `m`.
pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_class::<PyMatrix>()?;
    m.add_class::<PyView>()?;
    m.add_class::<PyBuiltin>()?;
    m.add_function(wrap_pyfunction!(new, m)?)?;
    Ok(())
}

#[pymodule]
#[pyo3(name = "tabula")]
fn tabula_module(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    register(m)
}
