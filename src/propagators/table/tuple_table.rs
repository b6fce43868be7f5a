use fnv::FnvHashSet;
use thiserror::Error;

use super::expression::Expression;

/// The errors reported while building a [`TupleTable`] or posting it as a propagator.
///
/// These are configuration errors: they are detected eagerly, surfaced synchronously, and a
/// failed insertion never corrupts the tuples already stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("tuple has {actual} cells but the table arity is fixed to {expected}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error(
        "cell at column {column} references column {referenced}, but the tuple only has \
         {arity} columns"
    )]
    ColumnOutOfRange {
        column: usize,
        referenced: usize,
        arity: usize,
    },
    #[error("cell at column {column} references its own column")]
    SelfReference { column: usize },
    #[error("the table has arity {arity} but the propagator was given {columns} columns")]
    WrongColumnCount { arity: usize, columns: usize },
}

/// A reference to another column of the same tuple, shifted by a constant offset. Built with
/// [`col`] and shifted with [`ColumnRef::plus`]/[`ColumnRef::minus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub(crate) column: usize,
    pub(crate) offset: i32,
}

/// Reference the value taken by column `column`, for use as the right-hand side of a
/// comparison cell.
pub fn col(column: usize) -> ColumnRef {
    ColumnRef { column, offset: 0 }
}

impl ColumnRef {
    pub fn plus(self, offset: i32) -> ColumnRef {
        ColumnRef {
            offset: self.offset + offset,
            ..self
        }
    }

    pub fn minus(self, offset: i32) -> ColumnRef {
        self.plus(-offset)
    }
}

/// The right-hand side of a comparison cell: either a constant or a (shifted) reference to
/// another column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Constant(i32),
    Column(ColumnRef),
}

impl From<i32> for Operand {
    fn from(value: i32) -> Operand {
        Operand::Constant(value)
    }
}

impl From<ColumnRef> for Operand {
    fn from(reference: ColumnRef) -> Operand {
        Operand::Column(reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOperator {
    Eq,
    Ne,
    Ge,
    Le,
}

/// One user-facing cell of a smart tuple, produced by the DSL functions in this module and
/// consumed by [`TupleTable::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CellKind {
    Any,
    Compare {
        operator: CompareOperator,
        operand: Operand,
    },
    Member {
        values: FnvHashSet<i32>,
        negated: bool,
    },
}

/// A cell which accepts any value of its column.
pub fn any() -> Cell {
    Cell { kind: CellKind::Any }
}

fn compare(operator: CompareOperator, operand: Operand) -> Cell {
    Cell {
        kind: CellKind::Compare { operator, operand },
    }
}

/// The column must equal the operand.
pub fn eq(operand: impl Into<Operand>) -> Cell {
    compare(CompareOperator::Eq, operand.into())
}

/// The column must differ from the operand.
pub fn ne(operand: impl Into<Operand>) -> Cell {
    compare(CompareOperator::Ne, operand.into())
}

/// The column must be at least the operand.
pub fn ge(operand: impl Into<Operand>) -> Cell {
    compare(CompareOperator::Ge, operand.into())
}

/// The column must be at most the operand.
pub fn le(operand: impl Into<Operand>) -> Cell {
    compare(CompareOperator::Le, operand.into())
}

/// The column must be strictly greater than the operand.
pub fn gt(operand: impl Into<Operand>) -> Cell {
    match operand.into() {
        Operand::Constant(value) => ge(value + 1),
        Operand::Column(reference) => ge(reference.plus(1)),
    }
}

/// The column must be strictly less than the operand.
pub fn lt(operand: impl Into<Operand>) -> Cell {
    match operand.into() {
        Operand::Constant(value) => le(value - 1),
        Operand::Column(reference) => le(reference.minus(1)),
    }
}

/// The column must take one of the given values.
pub fn in_set(values: impl IntoIterator<Item = i32>) -> Cell {
    Cell {
        kind: CellKind::Member {
            values: values.into_iter().collect(),
            negated: false,
        },
    }
}

/// The column must take none of the given values.
pub fn not_in_set(values: impl IntoIterator<Item = i32>) -> Cell {
    Cell {
        kind: CellKind::Member {
            values: values.into_iter().collect(),
            negated: true,
        },
    }
}

/// A fully normalised smart tuple: exactly one [`Expression`] per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tuple {
    cells: Box<[Expression]>,
}

impl Tuple {
    pub(crate) fn cells(&self) -> &[Expression] {
        &self.cells
    }
}

/// An ordered collection of smart tuples sharing one arity.
///
/// The first insertion fixes the arity; inserting a tuple of a different length afterwards is
/// a configuration error. Insertion normalises the user-facing cells (see [`TupleTable::add`])
/// so that the propagator only ever deals with [`Expression`]s.
#[derive(Debug, Clone, Default)]
pub struct TupleTable {
    arity: Option<usize>,
    tuples: Vec<Tuple>,
}

impl TupleTable {
    /// Normalise the given cells into a [`Tuple`] and append it to the table.
    ///
    /// A comparison cell at column `i` whose operand references column `j` is expanded into a
    /// pair of column-relating expressions, one attached to `i` and the inverse appended to
    /// `j`, so both columns enforce the relation. A column which ends up with several
    /// expressions gets them merged into a single conjunction; an unconstrained cell taking
    /// part in such a merge is dropped since it never strengthens the conjunction.
    pub fn add(&mut self, cells: Vec<Cell>) -> Result<(), TableError> {
        let arity = match self.arity {
            Some(expected) => {
                if cells.len() != expected {
                    return Err(TableError::ArityMismatch {
                        expected,
                        actual: cells.len(),
                    });
                }
                expected
            }
            None => cells.len(),
        };

        for (column, cell) in cells.iter().enumerate() {
            if let CellKind::Compare {
                operand: Operand::Column(reference),
                ..
            } = &cell.kind
            {
                if reference.column == column {
                    return Err(TableError::SelfReference { column });
                }
                if reference.column >= arity {
                    return Err(TableError::ColumnOutOfRange {
                        column,
                        referenced: reference.column,
                        arity,
                    });
                }
            }
        }

        let mut buckets: Vec<Vec<Expression>> = vec![Vec::new(); arity];
        for (column, cell) in cells.into_iter().enumerate() {
            match cell.kind {
                CellKind::Any => buckets[column].push(Expression::Any),
                CellKind::Member { values, negated } => buckets[column].push(if negated {
                    Expression::NotInSet(values)
                } else {
                    Expression::InSet(values)
                }),
                CellKind::Compare {
                    operator,
                    operand: Operand::Constant(value),
                } => buckets[column].push(match operator {
                    CompareOperator::Eq => Expression::EqConst(value),
                    CompareOperator::Ne => Expression::NeConst(value),
                    CompareOperator::Ge => Expression::GeConst(value),
                    CompareOperator::Le => Expression::LeConst(value),
                }),
                CellKind::Compare {
                    operator,
                    operand: Operand::Column(ColumnRef { column: other, offset }),
                } => {
                    let (direct, inverse) = match operator {
                        CompareOperator::Eq => (
                            Expression::EqCol { column: other, offset },
                            Expression::EqCol { column, offset: -offset },
                        ),
                        CompareOperator::Ne => (
                            Expression::NeCol { column: other, offset },
                            Expression::NeCol { column, offset: -offset },
                        ),
                        CompareOperator::Ge => (
                            Expression::GeCol { column: other, offset },
                            Expression::LeCol { column, offset: -offset },
                        ),
                        CompareOperator::Le => (
                            Expression::LeCol { column: other, offset },
                            Expression::GeCol { column, offset: -offset },
                        ),
                    };
                    buckets[column].push(direct);
                    buckets[other].push(inverse);
                }
            }
        }

        let cells = buckets.into_iter().map(merge_column_expressions).collect();

        self.arity = Some(arity);
        self.tuples.push(Tuple { cells });
        Ok(())
    }

    /// The arity fixed by the first insertion, or `None` while the table is empty.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub fn num_tuples(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub(crate) fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }
}

fn merge_column_expressions(mut expressions: Vec<Expression>) -> Expression {
    if expressions.len() > 1 {
        expressions.retain(|expression| !matches!(expression, Expression::Any));
    }
    if expressions.is_empty() {
        return Expression::Any;
    }
    if expressions.len() == 1 {
        return expressions.swap_remove(0);
    }
    Expression::Conjunction(expressions.into_boxed_slice())
}
