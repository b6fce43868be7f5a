//! The filtering core of a constraint-satisfaction engine: a propagator which maintains
//! generalised arc consistency (GAC) for *smart* (also called *hybrid*) table constraints.
//!
//! A classic table constraint restricts a fixed-size group of integer variables (the *columns*)
//! to an explicitly enumerated set of value tuples. A smart table generalises the cells of each
//! tuple from literal values to symbolic expressions: comparisons with a constant, set
//! membership, or a relation to another column plus an offset. A single smart tuple can thereby
//! stand in for an exponential number of classic tuples.
//!
//! Filtering is performed by [`propagators::table::HybridTablePropagator`], an extension of the
//! STR2 algorithm to symbolic cells: it incrementally maintains the set of tuples which can
//! still be satisfied in the current search branch and prunes every column value which no
//! active tuple supports.
//!
//! The crate also carries the minimal substrate such a propagator needs to run and to be
//! tested: trailed (backtrackable) integer domains in [`engine::cp::Assignments`], reversible
//! scratch cells in [`engine::cp::TrailedValues`], and the propagation interface in
//! [`engine::cp::propagation`]. There is deliberately no search loop, no clause learning and no
//! explanation machinery here; a surrounding solver is expected to own those.
//!
//! Tables are authored through the small DSL in [`propagators::table`]:
//!
//! ```
//! use smart_table::propagators::table::{any, col, eq, ge, in_set, le, TupleTable};
//!
//! let mut tuples = TupleTable::default();
//! // x0 ∈ {2, 4}, x1 unconstrained, x2 == x0 + 1
//! tuples.add(vec![in_set([2, 4]), any(), eq(col(0).plus(1))]).unwrap();
//! // x0 >= 2, x1 <= x0 + 3; the reference cell also constrains column 0, so column 0
//! // ends up with the conjunction x0 >= 2 and x0 >= x1 - 3.
//! tuples.add(vec![ge(2), le(col(0).plus(3)), any()]).unwrap();
//! ```

pub mod asserts;
pub(crate) mod basic_types;
pub mod engine;
pub mod propagators;

#[cfg(test)]
mod tests;

pub use basic_types::Entailment;
pub use basic_types::Inconsistency;
pub use basic_types::PropagationStatusCP;
