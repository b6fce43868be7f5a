//! A propagator for *smart* (also called *hybrid*) table constraints.
//!
//! A table constraint restricts a group of columns (integer variables) to an enumerated set of
//! tuples. In a smart table the cells of a tuple are symbolic: a cell can accept any value,
//! compare its column against a constant, test set membership, or relate its column to another
//! column plus an offset. Tables are authored through the small DSL exported here ([`any`],
//! [`eq`], [`ne`], [`ge`], [`le`], [`gt`], [`lt`], [`in_set`], [`not_in_set`] and [`col`]) and
//! collected in a [`TupleTable`], which is then posted as a [`HybridTablePropagator`] over the
//! columns.
//!
//! Filtering follows STR2: the propagator sweeps the tuples which are still satisfiable in the
//! current search branch, accumulates per-column supported-value sets, and removes every domain
//! value no active tuple supports.

mod column_graph;
mod expression;
mod propagator;
mod support;
mod tuple_table;

pub use propagator::HybridTablePropagator;
pub use tuple_table::any;
pub use tuple_table::col;
pub use tuple_table::eq;
pub use tuple_table::ge;
pub use tuple_table::gt;
pub use tuple_table::in_set;
pub use tuple_table::le;
pub use tuple_table::lt;
pub use tuple_table::ne;
pub use tuple_table::not_in_set;
pub use tuple_table::Cell;
pub use tuple_table::ColumnRef;
pub use tuple_table::Operand;
pub use tuple_table::TableError;
pub use tuple_table::TupleTable;
