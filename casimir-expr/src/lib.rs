//! The expression data model of the Casimir computer algebra system.
//!
//! This crate defines the [`Expr`] tree that every symbolic component works on, together with:
//!
//! - [`TermCollection`], the sparse, index-stable container used for flattened operand lists and
//!   polynomial coefficients;
//! - the [`equivalent`] and [`anti_equivalent`] predicates, a cheap, never-failing approximation
//!   of semantic equality;
//! - the [`Error`] type carrying the failure taxonomy of the simplifier.
//!
//! The simplification rules themselves live in the `casimir-simplify` crate.

mod display;

pub mod equiv;
pub mod error;
pub mod expr;
pub mod primitive;
pub mod terms;

pub use equiv::{anti_equivalent, equivalent};
pub use error::{Error, ErrorKind};
pub use expr::{BinOp, Expr, Func, OperatorKind};
pub use terms::TermCollection;
