#![cfg(test)]

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::basic_types::Entailment;
use crate::engine::cp::IntDomainEvent;
use crate::engine::test_helper::TestSolver;
use crate::engine::variables::DomainId;
use crate::propagators::table::any;
use crate::propagators::table::col;
use crate::propagators::table::eq;
use crate::propagators::table::ge;
use crate::propagators::table::in_set;
use crate::propagators::table::le;
use crate::propagators::table::ne;
use crate::propagators::table::not_in_set;
use crate::propagators::table::Cell;
use crate::propagators::table::HybridTablePropagator;
use crate::propagators::table::TupleTable;

fn current_domain(solver: &TestSolver, column: DomainId) -> Vec<i32> {
    (solver.lower_bound(column)..=solver.upper_bound(column))
        .filter(|&value| solver.contains(&column, value))
        .collect()
}

#[test]
fn every_column_is_watched_for_every_event_kind() {
    let mut solver = TestSolver::default();
    let x = solver.new_variable(1, 3);
    let y = solver.new_variable(1, 3);

    let mut tuples = TupleTable::default();
    tuples.add(vec![eq(1), any()]).expect("tuple is well formed");

    let propagator =
        HybridTablePropagator::new([x, y].into(), tuples).expect("arity matches the columns");
    let _ = solver
        .new_propagator(propagator)
        .expect("the tuple is satisfiable");

    for column in [x, y] {
        assert_eq!(solver.num_watchers(column, IntDomainEvent::Assign), 1);
        assert_eq!(solver.num_watchers(column, IntDomainEvent::LowerBound), 1);
        assert_eq!(solver.num_watchers(column, IntDomainEvent::UpperBound), 1);
        assert_eq!(solver.num_watchers(column, IntDomainEvent::Removal), 1);
    }
}

#[test]
fn propagation_is_idempotent() {
    let mut solver = TestSolver::default();
    let x = solver.new_variable(0, 9);
    let y = solver.new_variable(0, 9);

    let mut tuples = TupleTable::default();
    tuples.add(vec![in_set([1, 3, 5]), le(col(0))]).expect("tuple is well formed");
    tuples.add(vec![eq(7), eq(col(0).plus(2))]).expect("tuple is well formed");

    let propagator =
        HybridTablePropagator::new([x, y].into(), tuples).expect("arity matches the columns");
    let id = solver
        .new_propagator(propagator)
        .expect("the table is satisfiable");

    let x_after_first = current_domain(&solver, x);
    let y_after_first = current_domain(&solver, y);
    let active_after_first = solver
        .propagator::<HybridTablePropagator<DomainId>>(id)
        .active_tuple_indices(&solver.trailed_values);

    solver.propagate(id).expect("a fixpoint cannot become infeasible");

    assert_eq!(current_domain(&solver, x), x_after_first);
    assert_eq!(current_domain(&solver, y), y_after_first);

    // The set of active tuples must not shrink either; a domain-preserving deactivation
    // would still weaken later propagations.
    let active_after_second = solver
        .propagator::<HybridTablePropagator<DomainId>>(id)
        .active_tuple_indices(&solver.trailed_values);
    assert_eq!(active_after_second, active_after_first);
}

#[test]
fn backtracking_restores_pruned_values() {
    let mut solver = TestSolver::default();
    let x = solver.new_variable(1, 3);
    let y = solver.new_variable(1, 3);

    let mut tuples = TupleTable::default();
    tuples.add(vec![eq(1), eq(2)]).expect("tuple is well formed");
    tuples.add(vec![eq(2), eq(3)]).expect("tuple is well formed");

    let propagator =
        HybridTablePropagator::new([x, y].into(), tuples).expect("arity matches the columns");
    let id = solver
        .new_propagator(propagator)
        .expect("both tuples are satisfiable");
    solver.assert_domain(x, vec![1, 2]);
    solver.assert_domain(y, vec![2, 3]);

    solver.new_checkpoint();
    let _ = solver.remove(x, 1).expect("domain stays non-empty");
    solver.propagate(id).expect("the second tuple survives");
    solver.assert_domain(x, vec![2]);
    solver.assert_domain(y, vec![3]);

    solver.backtrack_to(0);
    solver.assert_domain(x, vec![1, 2]);
    solver.assert_domain(y, vec![2, 3]);

    // With the tuple deactivation undone as well, re-propagating reaches the same fixpoint.
    solver.propagate(id).expect("the restored state is satisfiable");
    solver.assert_domain(x, vec![1, 2]);
    solver.assert_domain(y, vec![2, 3]);
}

#[test]
fn conjunctions_track_their_referenced_column_across_calls() {
    let mut solver = TestSolver::default();
    let x = solver.new_variable(0, 9);
    let y = solver.new_variable(0, 9);

    let mut tuples = TupleTable::default();
    // Column 0 carries the conjunction x >= 2 and x <= y + 3.
    tuples
        .add(vec![ge(2), ge(col(0).minus(3))])
        .expect("tuple is well formed");

    let propagator =
        HybridTablePropagator::new([x, y].into(), tuples).expect("arity matches the columns");
    let id = solver
        .new_propagator(propagator)
        .expect("the tuple is satisfiable");
    solver.assert_domain(x, vec![2, 3, 4, 5, 6, 7, 8, 9]);

    // Only y changes; the conjunction on x must still be re-evaluated against y's new
    // domain rather than against the supports it computed last call.
    solver.decrease_upper_bound(y, 2);
    solver.propagate(id).expect("still satisfiable");
    solver.assert_domain(x, vec![2, 3, 4, 5]);
}

#[test]
fn entailment_follows_the_whole_table() {
    let mut solver = TestSolver::default();
    let x = solver.new_variable(1, 3);
    let y = solver.new_variable(1, 3);

    let mut tuples = TupleTable::default();
    tuples.add(vec![eq(1), ne(1)]).expect("tuple is well formed");
    tuples.add(vec![eq(2), eq(2)]).expect("tuple is well formed");

    let propagator =
        HybridTablePropagator::new([x, y].into(), tuples).expect("arity matches the columns");
    let id = solver
        .new_propagator(propagator)
        .expect("the table is satisfiable");
    assert_eq!(solver.is_entailed(id), Entailment::Unknown);

    solver.new_checkpoint();
    solver.instantiate(x, 1);
    solver.instantiate(y, 3);
    assert_eq!(solver.is_entailed(id), Entailment::True);

    solver.backtrack_to(0);
    solver.instantiate(x, 2);
    solver.instantiate(y, 3);
    assert_eq!(solver.is_entailed(id), Entailment::False);
}

/// The cell shapes the randomized tables are generated from. Each shape can be turned into a
/// DSL cell and evaluated directly against a full assignment, which gives the brute-force
/// reference semantics the propagator is cross-checked against.
#[derive(Debug, Clone)]
enum CellShape {
    Any,
    Eq(i32),
    Ne(i32),
    Ge(i32),
    Le(i32),
    In(Vec<i32>),
    NotIn(Vec<i32>),
    RefEq(usize, i32),
    RefNe(usize, i32),
    RefGe(usize, i32),
    RefLe(usize, i32),
}

impl CellShape {
    fn to_cell(&self) -> Cell {
        match self {
            CellShape::Any => any(),
            CellShape::Eq(value) => eq(*value),
            CellShape::Ne(value) => ne(*value),
            CellShape::Ge(value) => ge(*value),
            CellShape::Le(value) => le(*value),
            CellShape::In(values) => in_set(values.iter().copied()),
            CellShape::NotIn(values) => not_in_set(values.iter().copied()),
            CellShape::RefEq(other, offset) => eq(col(*other).plus(*offset)),
            CellShape::RefNe(other, offset) => ne(col(*other).plus(*offset)),
            CellShape::RefGe(other, offset) => ge(col(*other).plus(*offset)),
            CellShape::RefLe(other, offset) => le(col(*other).plus(*offset)),
        }
    }

    fn satisfied(&self, assignment: &[i32], column: usize) -> bool {
        let value = assignment[column];
        match self {
            CellShape::Any => true,
            CellShape::Eq(constant) => value == *constant,
            CellShape::Ne(constant) => value != *constant,
            CellShape::Ge(constant) => value >= *constant,
            CellShape::Le(constant) => value <= *constant,
            CellShape::In(values) => values.contains(&value),
            CellShape::NotIn(values) => !values.contains(&value),
            CellShape::RefEq(other, offset) => value == assignment[*other] + offset,
            CellShape::RefNe(other, offset) => value != assignment[*other] + offset,
            CellShape::RefGe(other, offset) => value >= assignment[*other] + offset,
            CellShape::RefLe(other, offset) => value <= assignment[*other] + offset,
        }
    }
}

fn random_unary_cell(rng: &mut SmallRng, lower: i32, upper: i32) -> CellShape {
    let random_subset = |rng: &mut SmallRng| -> Vec<i32> {
        (lower..=upper).filter(|_| rng.gen_bool(0.4)).collect()
    };
    match rng.gen_range(0..=6) {
        0 => CellShape::Any,
        1 => CellShape::Eq(rng.gen_range(lower..=upper)),
        2 => CellShape::Ne(rng.gen_range(lower..=upper)),
        3 => CellShape::Ge(rng.gen_range(lower..=upper)),
        4 => CellShape::Le(rng.gen_range(lower..=upper)),
        5 => CellShape::In(random_subset(rng)),
        _ => CellShape::NotIn(random_subset(rng)),
    }
}

fn random_reference_cell(rng: &mut SmallRng, other: usize) -> CellShape {
    let offset = rng.gen_range(-2..=2);
    match rng.gen_range(0..=3) {
        0 => CellShape::RefEq(other, offset),
        1 => CellShape::RefNe(other, offset),
        2 => CellShape::RefGe(other, offset),
        _ => CellShape::RefLe(other, offset),
    }
}

/// For every column, the set of values taking part in at least one full assignment (drawn
/// from the given domains) which satisfies some tuple. This is the GAC fixpoint the
/// propagator has to reach.
fn supported_values(shapes: &[Vec<CellShape>], domains: &[Vec<i32>]) -> Vec<BTreeSet<i32>> {
    let arity = domains.len();
    let mut supported = vec![BTreeSet::new(); arity];
    let mut indices = vec![0_usize; arity];
    'assignments: loop {
        let assignment: Vec<i32> = indices
            .iter()
            .enumerate()
            .map(|(column, &index)| domains[column][index])
            .collect();
        let satisfied = shapes.iter().any(|tuple| {
            tuple
                .iter()
                .enumerate()
                .all(|(column, cell)| cell.satisfied(&assignment, column))
        });
        if satisfied {
            for column in 0..arity {
                let _ = supported[column].insert(assignment[column]);
            }
        }

        for column in (0..arity).rev() {
            indices[column] += 1;
            if indices[column] < domains[column].len() {
                continue 'assignments;
            }
            indices[column] = 0;
        }
        break;
    }
    supported
}

fn assert_domains_match(
    solver: &TestSolver,
    columns: &[DomainId],
    expected: &[BTreeSet<i32>],
    seed: u64,
    stage: &str,
) {
    for (index, &column) in columns.iter().enumerate() {
        let actual: BTreeSet<i32> = current_domain(solver, column).into_iter().collect();
        assert_eq!(
            actual, expected[index],
            "seed {seed}, {stage}: column {index} is not at the GAC fixpoint"
        );
    }
}

/// Posts the generated table and cross-checks the propagator against the brute-force
/// reference, both right after posting and once more after shrinking a random domain.
///
/// With `exact` the propagator has to land on precisely the brute-forced supported sets.
/// Without it only soundness is checked: every supported value must survive, and a conflict
/// may only be reported when no satisfying assignment exists. The weaker mode exists because
/// cell-local support marking leaves a value alone whenever every individual cell tolerates
/// it, which for reference cells chained across several tuples can be weaker than full GAC.
fn check_against_brute_force(
    shapes: &[Vec<CellShape>],
    lower: i32,
    upper: i32,
    seed: u64,
    exact: bool,
) {
    let arity = shapes[0].len();

    let mut solver = TestSolver::default();
    let columns: Vec<DomainId> = (0..arity).map(|_| solver.new_variable(lower, upper)).collect();

    let mut tuples = TupleTable::default();
    for tuple in shapes {
        tuples
            .add(tuple.iter().map(CellShape::to_cell).collect())
            .expect("generated cells never reference out of range");
    }
    let propagator = HybridTablePropagator::new(columns.clone().into_boxed_slice(), tuples)
        .expect("arity matches the columns");

    let initial_domains = vec![(lower..=upper).collect::<Vec<i32>>(); arity];
    let expected = supported_values(shapes, &initial_domains);
    let has_solution = !expected[0].is_empty();

    let result = solver.new_propagator(propagator);
    let id = match result {
        Ok(id) => id,
        Err(_) => {
            assert!(!has_solution, "seed {seed}: conflict although a solution exists");
            return;
        }
    };
    assert!(has_solution || !exact, "seed {seed}: expected a conflict at posting");
    if exact {
        assert_domains_match(&solver, &columns, &expected, seed, "after posting");
    } else {
        assert_supported_values_survive(&solver, &columns, &expected, seed, "after posting");
    }

    // Shrink one random domain and check the propagator again from its fixpoint.
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
    let target = columns[rng.gen_range(0..arity)];
    let remaining = current_domain(&solver, target);
    if remaining.len() < 2 {
        return;
    }
    let removed = remaining[rng.gen_range(0..remaining.len())];
    let _ = solver.remove(target, removed).expect("domain stays non-empty");

    let current: Vec<Vec<i32>> = columns
        .iter()
        .map(|&column| current_domain(&solver, column))
        .collect();
    let expected = supported_values(shapes, &current);
    let has_solution = !expected[0].is_empty();

    match solver.propagate(id) {
        Ok(()) => {
            assert!(has_solution || !exact, "seed {seed}: expected a conflict after shrinking");
            if exact {
                assert_domains_match(&solver, &columns, &expected, seed, "after shrinking");
            } else {
                assert_supported_values_survive(&solver, &columns, &expected, seed, "after shrinking");
            }
        }
        Err(_) => {
            assert!(!has_solution, "seed {seed}: conflict although a solution exists");
        }
    }
}

fn assert_supported_values_survive(
    solver: &TestSolver,
    columns: &[DomainId],
    expected: &[BTreeSet<i32>],
    seed: u64,
    stage: &str,
) {
    for (index, &column) in columns.iter().enumerate() {
        let actual: BTreeSet<i32> = current_domain(solver, column).into_iter().collect();
        assert!(
            expected[index].is_subset(&actual),
            "seed {seed}, {stage}: column {index} lost a supported value \
             (expected at least {:?}, got {actual:?})",
            expected[index]
        );
    }
}

#[test]
fn randomized_unary_tables_reach_generalised_arc_consistency() {
    for seed in 0..80 {
        let mut rng = SmallRng::seed_from_u64(seed);

        let arity = rng.gen_range(1..=4);
        let lower = 0;
        let upper = rng.gen_range(2..=5);
        let num_tuples = rng.gen_range(1..=4);
        let shapes: Vec<Vec<CellShape>> = (0..num_tuples)
            .map(|_| {
                (0..arity)
                    .map(|_| random_unary_cell(&mut rng, lower, upper))
                    .collect()
            })
            .collect();

        check_against_brute_force(&shapes, lower, upper, seed, true);
    }
}

#[test]
fn randomized_single_reference_tuples_reach_generalised_arc_consistency() {
    for seed in 0..80 {
        let mut rng = SmallRng::seed_from_u64(seed);

        let arity = rng.gen_range(2..=4);
        let lower = 0;
        let upper = rng.gen_range(2..=5);
        // One tuple whose reference cells always point to an earlier column, so the relations
        // within the tuple form a forest and cell-local filtering reaches the exact fixpoint.
        let shape: Vec<CellShape> = (0..arity)
            .map(|column| {
                if column > 0 && rng.gen_bool(0.6) {
                    let target = rng.gen_range(0..column);
                    random_reference_cell(&mut rng, target)
                } else {
                    random_unary_cell(&mut rng, lower, upper)
                }
            })
            .collect();

        check_against_brute_force(&[shape], lower, upper, seed, true);
    }
}

#[test]
fn randomized_mixed_tables_never_remove_a_supported_value() {
    for seed in 0..80 {
        let mut rng = SmallRng::seed_from_u64(seed);

        let arity = rng.gen_range(2..=4);
        let lower = 0;
        let upper = rng.gen_range(2..=5);
        let num_tuples = rng.gen_range(2..=4);
        let shapes: Vec<Vec<CellShape>> = (0..num_tuples)
            .map(|_| {
                (0..arity)
                    .map(|column| {
                        if rng.gen_bool(0.4) {
                            let mut other = rng.gen_range(0..arity - 1);
                            if other >= column {
                                other += 1;
                            }
                            random_reference_cell(&mut rng, other)
                        } else {
                            random_unary_cell(&mut rng, lower, upper)
                        }
                    })
                    .collect()
            })
            .collect();

        check_against_brute_force(&shapes, lower, upper, seed, false);
    }
}
