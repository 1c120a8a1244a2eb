use alloc::string::String;
use alloc::vec::Vec;

use num_complex::Complex;

use crate::traits::LinalgScalar;
use crate::DynMatrix;

/// Dynamically typed call argument or result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Real(DynMatrix<f64>),
    Single(DynMatrix<f32>),
    Complex(DynMatrix<Complex<f64>>),
    SingleComplex(DynMatrix<Complex<f32>>),
    Str(String),
    Bool(bool),
}

/// Numeric domain of a value, ordered so that promotion is a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Domain {
    Real,
    Single,
    Complex,
    SingleComplex,
}

impl Domain {
    /// Complex if either side is complex, single if either side is single.
    pub(crate) fn promote(self, other: Domain) -> Domain {
        let complex = self.is_complex() || other.is_complex();
        let single = self.is_single() || other.is_single();
        match (complex, single) {
            (false, false) => Domain::Real,
            (false, true) => Domain::Single,
            (true, false) => Domain::Complex,
            (true, true) => Domain::SingleComplex,
        }
    }

    fn is_complex(self) -> bool {
        matches!(self, Domain::Complex | Domain::SingleComplex)
    }

    fn is_single(self) -> bool {
        matches!(self, Domain::Single | Domain::SingleComplex)
    }
}

impl Value {
    /// Real double scalar.
    pub fn scalar(x: f64) -> Self {
        Value::Real(DynMatrix::scalar(x))
    }

    pub fn is_numeric(&self) -> bool {
        self.domain().is_some()
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_) | Value::SingleComplex(_))
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Value::Single(_) | Value::SingleComplex(_))
    }

    /// Row count; 1 for strings and booleans.
    pub fn rows(&self) -> usize {
        match self {
            Value::Real(m) => m.nrows(),
            Value::Single(m) => m.nrows(),
            Value::Complex(m) => m.nrows(),
            Value::SingleComplex(m) => m.nrows(),
            Value::Str(_) | Value::Bool(_) => 1,
        }
    }

    /// Column count; the length for strings, 1 for booleans.
    pub fn cols(&self) -> usize {
        match self {
            Value::Real(m) => m.ncols(),
            Value::Single(m) => m.ncols(),
            Value::Complex(m) => m.ncols(),
            Value::SingleComplex(m) => m.ncols(),
            Value::Str(s) => s.chars().count(),
            Value::Bool(_) => 1,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.rows() == 1 && self.cols() == 1
    }

    pub(crate) fn domain(&self) -> Option<Domain> {
        match self {
            Value::Real(_) => Some(Domain::Real),
            Value::Single(_) => Some(Domain::Single),
            Value::Complex(_) => Some(Domain::Complex),
            Value::SingleComplex(_) => Some(Domain::SingleComplex),
            Value::Str(_) | Value::Bool(_) => None,
        }
    }

    /// Numeric scalar equal to zero, or `false`.
    pub(crate) fn is_zero_scalar(&self) -> bool {
        match self {
            Value::Real(m) => m.len() == 1 && m[(0, 0)] == 0.0,
            Value::Single(m) => m.len() == 1 && m[(0, 0)] == 0.0,
            Value::Complex(m) => m.len() == 1 && m[(0, 0)] == Complex::new(0.0, 0.0),
            Value::SingleComplex(m) => m.len() == 1 && m[(0, 0)] == Complex::new(0.0, 0.0),
            Value::Bool(b) => !b,
            Value::Str(_) => false,
        }
    }

    /// Real entries as `f64`, column-major; `None` for complex or
    /// non-numeric values.
    pub(crate) fn real_entries(&self) -> Option<Vec<f64>> {
        match self {
            Value::Real(m) => Some(m.as_slice().to_vec()),
            Value::Single(m) => Some(m.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }
}

impl From<DynMatrix<f64>> for Value {
    fn from(m: DynMatrix<f64>) -> Self {
        Value::Real(m)
    }
}

impl From<DynMatrix<f32>> for Value {
    fn from(m: DynMatrix<f32>) -> Self {
        Value::Single(m)
    }
}

impl From<DynMatrix<Complex<f64>>> for Value {
    fn from(m: DynMatrix<Complex<f64>>) -> Self {
        Value::Complex(m)
    }
}

impl From<DynMatrix<Complex<f32>>> for Value {
    fn from(m: DynMatrix<Complex<f32>>) -> Self {
        Value::SingleComplex(m)
    }
}

/// Element types a [`Value`] can be converted into for computation.
pub trait Element: LinalgScalar {
    /// Convert a numeric value into this domain. Fails (returns `None`) only
    /// when that would drop an imaginary part or the value is not numeric.
    fn matrix_from(v: &Value) -> Option<DynMatrix<Self>>;

    fn into_value(m: DynMatrix<Self>) -> Value;
}

impl Element for f64 {
    fn matrix_from(v: &Value) -> Option<DynMatrix<f64>> {
        match v {
            Value::Real(m) => Some(m.clone()),
            Value::Single(m) => Some(m.map(|x| x as f64)),
            _ => None,
        }
    }

    fn into_value(m: DynMatrix<f64>) -> Value {
        Value::Real(m)
    }
}

impl Element for f32 {
    fn matrix_from(v: &Value) -> Option<DynMatrix<f32>> {
        match v {
            Value::Real(m) => Some(m.map(|x| x as f32)),
            Value::Single(m) => Some(m.clone()),
            _ => None,
        }
    }

    fn into_value(m: DynMatrix<f32>) -> Value {
        Value::Single(m)
    }
}

impl Element for Complex<f64> {
    fn matrix_from(v: &Value) -> Option<DynMatrix<Complex<f64>>> {
        match v {
            Value::Real(m) => Some(m.map(|x| Complex::new(x, 0.0))),
            Value::Single(m) => Some(m.map(|x| Complex::new(x as f64, 0.0))),
            Value::Complex(m) => Some(m.clone()),
            Value::SingleComplex(m) => Some(m.map(|z| Complex::new(z.re as f64, z.im as f64))),
            _ => None,
        }
    }

    fn into_value(m: DynMatrix<Complex<f64>>) -> Value {
        Value::Complex(m)
    }
}

impl Element for Complex<f32> {
    fn matrix_from(v: &Value) -> Option<DynMatrix<Complex<f32>>> {
        match v {
            Value::Real(m) => Some(m.map(|x| Complex::new(x as f32, 0.0))),
            Value::Single(m) => Some(m.map(|x| Complex::new(x, 0.0))),
            Value::Complex(m) => Some(m.map(|z| Complex::new(z.re as f32, z.im as f32))),
            Value::SingleComplex(m) => Some(m.clone()),
            _ => None,
        }
    }

    fn into_value(m: DynMatrix<Complex<f32>>) -> Value {
        Value::SingleComplex(m)
    }
}
