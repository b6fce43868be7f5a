use fnv::FnvHashSet;

use super::support::SupportSink;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::ReadDomains;
use crate::engine::variables::IntegerVariable;

/// A symbolic predicate attached to one column of a smart tuple.
///
/// Unary variants only consult the domain of their own column. The `*Col` variants relate their
/// column to `column[j] + offset` and consult the domain of column `j` as well. A
/// [`Expression::Conjunction`] is the AND of several expressions targeting the same column; it
/// is only ever produced by tuple normalisation, never nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expression {
    /// Always satisfiable; supports every value of its column.
    Any,
    EqConst(i32),
    NeConst(i32),
    GeConst(i32),
    LeConst(i32),
    InSet(FnvHashSet<i32>),
    NotInSet(FnvHashSet<i32>),
    EqCol { column: usize, offset: i32 },
    NeCol { column: usize, offset: i32 },
    GeCol { column: usize, offset: i32 },
    LeCol { column: usize, offset: i32 },
    Conjunction(Box<[Expression]>),
}

impl Expression {
    /// Whether at least one remaining value of `columns[column]` makes the predicate true,
    /// given the current domains of all related columns.
    pub(crate) fn satisfiable<Var: IntegerVariable>(
        &self,
        context: PropagationContext<'_>,
        columns: &[Var],
        column: usize,
    ) -> bool {
        let var = &columns[column];
        match self {
            Expression::Any => true,
            Expression::EqConst(value) => context.contains(var, *value),
            Expression::NeConst(value) => {
                context.domain_size(var) > 1 || context.lower_bound(var) != *value
            }
            Expression::GeConst(value) => context.upper_bound(var) >= *value,
            Expression::LeConst(value) => context.lower_bound(var) <= *value,
            Expression::InSet(values) => {
                // Iterate the smaller side and probe the larger.
                if values.len() <= context.domain_size(var) {
                    values.iter().any(|&value| context.contains(var, value))
                } else {
                    context.iterate_domain(var).any(|value| values.contains(&value))
                }
            }
            Expression::NotInSet(values) => {
                context.domain_size(var) > values.len()
                    || context.iterate_domain(var).any(|value| !values.contains(&value))
            }
            Expression::EqCol { column: other, offset } => {
                let other_var = &columns[*other];
                if context.domain_size(var) <= context.domain_size(other_var) {
                    context
                        .iterate_domain(var)
                        .any(|value| context.contains(other_var, value - offset))
                } else {
                    context
                        .iterate_domain(other_var)
                        .any(|value| context.contains(var, value + offset))
                }
            }
            Expression::NeCol { column: other, offset } => {
                let other_var = &columns[*other];
                // Only unsatisfiable when both sides are fixed to the forbidden pair.
                !(context.is_fixed(var)
                    && context.is_fixed(other_var)
                    && context.lower_bound(var) == context.lower_bound(other_var) + offset)
            }
            Expression::GeCol { column: other, offset } => {
                context.upper_bound(var) >= context.lower_bound(&columns[*other]) + offset
            }
            Expression::LeCol { column: other, offset } => {
                context.lower_bound(var) <= context.upper_bound(&columns[*other]) + offset
            }
            Expression::Conjunction(members) => context.iterate_domain(var).any(|value| {
                members
                    .iter()
                    .all(|member| member.supports_value(context, columns, value))
            }),
        }
    }

    /// Whether `value` at this expression's own column is consistent with the predicate under
    /// the current domains of the related columns.
    pub(crate) fn supports_value<Var: IntegerVariable>(
        &self,
        context: PropagationContext<'_>,
        columns: &[Var],
        value: i32,
    ) -> bool {
        match self {
            Expression::Any => true,
            Expression::EqConst(constant) => value == *constant,
            Expression::NeConst(constant) => value != *constant,
            Expression::GeConst(constant) => value >= *constant,
            Expression::LeConst(constant) => value <= *constant,
            Expression::InSet(values) => values.contains(&value),
            Expression::NotInSet(values) => !values.contains(&value),
            Expression::EqCol { column: other, offset } => {
                context.contains(&columns[*other], value - offset)
            }
            Expression::NeCol { column: other, offset } => {
                let other_var = &columns[*other];
                !(context.is_fixed(other_var)
                    && value == context.lower_bound(other_var) + offset)
            }
            Expression::GeCol { column: other, offset } => {
                value >= context.lower_bound(&columns[*other]) + offset
            }
            Expression::LeCol { column: other, offset } => {
                value <= context.upper_bound(&columns[*other]) + offset
            }
            Expression::Conjunction(members) => members
                .iter()
                .all(|member| member.supports_value(context, columns, value)),
        }
    }

    /// Mark every value of `columns[column]` consistent with the predicate as supported.
    ///
    /// Only values currently in the domain are marked.
    pub(crate) fn mark_support<Var: IntegerVariable>(
        &self,
        context: PropagationContext<'_>,
        columns: &[Var],
        column: usize,
        sink: &mut impl SupportSink,
    ) {
        let var = &columns[column];
        match self {
            Expression::Any => sink.mark_all_supported(),
            Expression::EqConst(value) => {
                if context.contains(var, *value) {
                    sink.mark_supported(*value);
                }
            }
            Expression::NeConst(value) => mark_all_except(context, var, *value, sink),
            Expression::GeConst(value) => mark_from(context, var, *value, sink),
            Expression::LeConst(value) => mark_until(context, var, *value, sink),
            Expression::InSet(values) => {
                if values.len() <= context.domain_size(var) {
                    for &value in values {
                        if context.contains(var, value) {
                            sink.mark_supported(value);
                        }
                    }
                } else {
                    for value in context.iterate_domain(var) {
                        if values.contains(&value) {
                            sink.mark_supported(value);
                        }
                    }
                }
            }
            Expression::NotInSet(values) => {
                for value in context.iterate_domain(var) {
                    if !values.contains(&value) {
                        sink.mark_supported(value);
                    }
                }
            }
            Expression::EqCol { column: other, offset } => {
                let other_var = &columns[*other];
                if context.domain_size(var) <= context.domain_size(other_var) {
                    for value in context.iterate_domain(var) {
                        if context.contains(other_var, value - offset) {
                            sink.mark_supported(value);
                        }
                    }
                } else {
                    for other_value in context.iterate_domain(other_var) {
                        let value = other_value + offset;
                        if context.contains(var, value) {
                            sink.mark_supported(value);
                        }
                    }
                }
            }
            Expression::NeCol { column: other, offset } => {
                let other_var = &columns[*other];
                if context.is_fixed(other_var) {
                    mark_all_except(context, var, context.lower_bound(other_var) + offset, sink);
                } else {
                    sink.mark_all_supported();
                }
            }
            Expression::GeCol { column: other, offset } => {
                mark_from(context, var, context.lower_bound(&columns[*other]) + offset, sink);
            }
            Expression::LeCol { column: other, offset } => {
                mark_until(context, var, context.upper_bound(&columns[*other]) + offset, sink);
            }
            Expression::Conjunction(members) => {
                for value in context.iterate_domain(var) {
                    if members
                        .iter()
                        .all(|member| member.supports_value(context, columns, value))
                    {
                        sink.mark_supported(value);
                    }
                }
            }
        }
    }
}

fn mark_all_except<Var: IntegerVariable>(
    context: PropagationContext<'_>,
    var: &Var,
    excluded: i32,
    sink: &mut impl SupportSink,
) {
    if !context.contains(var, excluded) {
        sink.mark_all_supported();
    } else {
        for value in context.iterate_domain(var) {
            if value != excluded {
                sink.mark_supported(value);
            }
        }
    }
}

fn mark_from<Var: IntegerVariable>(
    context: PropagationContext<'_>,
    var: &Var,
    bound: i32,
    sink: &mut impl SupportSink,
) {
    if context.lower_bound(var) >= bound {
        sink.mark_all_supported();
    } else {
        for value in context.iterate_domain(var).skip_while(|&value| value < bound) {
            sink.mark_supported(value);
        }
    }
}

fn mark_until<Var: IntegerVariable>(
    context: PropagationContext<'_>,
    var: &Var,
    bound: i32,
    sink: &mut impl SupportSink,
) {
    if context.upper_bound(var) <= bound {
        sink.mark_all_supported();
    } else {
        for value in context.iterate_domain(var).take_while(|&value| value <= bound) {
            sink.mark_supported(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestSolver;

    fn collected_support(
        expression: &Expression,
        solver: &TestSolver,
        columns: &[crate::engine::variables::DomainId],
        column: usize,
    ) -> Vec<i32> {
        struct Collector {
            marked: Vec<i32>,
            all: bool,
        }
        impl SupportSink for Collector {
            fn mark_supported(&mut self, value: i32) {
                self.marked.push(value);
            }
            fn mark_all_supported(&mut self) {
                self.all = true;
            }
        }

        let mut collector = Collector {
            marked: vec![],
            all: false,
        };
        let context = PropagationContext::new(&solver.assignments);
        expression.mark_support(context, columns, column, &mut collector);
        if collector.all {
            context.iterate_domain(&columns[column]).collect()
        } else {
            collector.marked
        }
    }

    #[test]
    fn ne_const_is_satisfiable_unless_fixed_to_the_constant() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 3);
        let context = PropagationContext::new(&solver.assignments);

        assert!(!Expression::NeConst(3).satisfiable(context, &[x], 0));
        assert!(Expression::NeConst(4).satisfiable(context, &[x], 0));
    }

    #[test]
    fn eq_col_satisfiability_requires_overlapping_domains() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(5, 7);
        let context = PropagationContext::new(&solver.assignments);

        let shifted = Expression::EqCol { column: 1, offset: -4 };
        assert!(shifted.satisfiable(context, &[x, y], 0));

        let unshifted = Expression::EqCol { column: 1, offset: 0 };
        assert!(!unshifted.satisfiable(context, &[x, y], 0));
    }

    #[test]
    fn ge_col_supports_values_above_the_other_lower_bound() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 6);
        let y = solver.new_variable(3, 5);

        let expression = Expression::GeCol { column: 1, offset: 1 };
        assert_eq!(collected_support(&expression, &solver, &[x, y], 0), vec![4, 5, 6]);
    }

    #[test]
    fn ne_col_supports_everything_unless_the_other_side_is_fixed() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(1, 2);

        let expression = Expression::NeCol { column: 1, offset: 0 };
        assert_eq!(collected_support(&expression, &solver, &[x, y], 0), vec![1, 2, 3]);

        solver.instantiate(y, 2);
        assert_eq!(collected_support(&expression, &solver, &[x, y], 0), vec![1, 3]);
    }

    #[test]
    fn membership_respects_holes_in_the_domain() {
        let mut solver = TestSolver::default();
        let x = solver.new_sparse_variable(&[1, 3, 5]);
        let context = PropagationContext::new(&solver.assignments);

        let expression = Expression::InSet([2, 3, 4].into_iter().collect());
        assert!(expression.satisfiable(context, &[x], 0));
        assert_eq!(collected_support(&expression, &solver, &[x], 0), vec![3]);
    }

    #[test]
    fn conjunction_supports_the_intersection_of_its_members() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 9);

        let expression = Expression::Conjunction(
            vec![Expression::GeConst(2), Expression::LeConst(5)].into_boxed_slice(),
        );
        assert_eq!(
            collected_support(&expression, &solver, &[x], 0),
            vec![2, 3, 4, 5]
        );
    }
}
