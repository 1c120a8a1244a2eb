//! # qrfact
//!
//! Dense QR factorization with incremental updates, no-std compatible
//! (with `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use qrfact::DynMatrix;
//! use qrfact::linalg::{QrFactorization, QrMode};
//!
//! let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 7.0]);
//! let f = QrFactorization::new(&a, QrMode::Full);
//!
//! // Append a column without refactoring from scratch.
//! let f = f.insert_col(&[1.0, 0.0, 1.0], 2).unwrap();
//! assert_eq!(f.r().ncols(), 3);
//! assert!(f.r().is_upper_triangular());
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated, column-major `DynMatrix<T>` with runtime
//!   dimensions. Arithmetic, block extraction and insertion, norms.
//!
//! - [`linalg`]: Householder QR ([`linalg::Qr`], [`linalg::QrFactorization`]),
//!   column-pivoted QR ([`linalg::PivotedQr`]) and the Givens-based update
//!   engine: rank-k update, column insert/delete, row insert/delete and
//!   column shift.
//!
//! - [`builtins`]: Call-level `qr`, `qrupdate`, `qrinsert`, `qrdelete`,
//!   `qrshift` over dynamically typed [`builtins::Value`] arguments with
//!   1-based indices. Requires the `complex` feature.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements
//!   - [`FloatScalar`]: real floats
//!   - [`LinalgScalar`]: real floats and complex numbers, used by the
//!     factorizations and norms
//!   - [`MatrixRef`] / [`MatrixMut`]: column access for the kernels
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`    | no       | Pure-Rust software float fallback for `no_std` |
//! | `complex` | yes      | `Complex<f32>` / `Complex<f64>` support and [`builtins`] |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "complex")]
pub mod builtins;
pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynMatrixf32, DynMatrixf64};
#[cfg(feature = "complex")]
pub use dynmatrix::{DynMatrixz32, DynMatrixz64};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
