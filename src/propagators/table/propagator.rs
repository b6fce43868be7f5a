use fnv::FnvHashMap;
use log::debug;
use log::trace;

use super::column_graph::ColumnGraph;
use super::expression::Expression;
use super::support::AndSupport;
use super::support::ColumnSupport;
use super::tuple_table::TableError;
use super::tuple_table::TupleTable;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::propagation::LocalId;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::PropagationContextMut;
use crate::engine::cp::propagation::Propagator;
use crate::engine::cp::propagation::PropagatorInitialisationContext;
use crate::engine::cp::propagation::ReadDomains;
use crate::engine::cp::DomainEvents;
use crate::engine::cp::ReversibleSparseSet;
use crate::engine::cp::TrailedInteger;
#[cfg(test)]
use crate::engine::cp::TrailedValues;
use crate::engine::variables::IntegerVariable;

/// A GAC propagator for smart table constraints, extending STR2 to symbolic tuple cells.
///
/// The propagator sweeps the tuples which are still satisfiable in the current search branch
/// (a backtrackable sparse set over the tuple indices), accumulates for every column the set of
/// values supported by at least one such tuple, and prunes every unsupported value. Pruning can
/// make further tuples unsatisfiable, so the sweep repeats until a fixpoint is reached.
///
/// Between invocations the propagator remembers every column's domain size in a reversible
/// cell; a size change is what marks a column (and, through the [`ColumnGraph`], the columns
/// related to it) as dirty, so an unchanged part of the table is not re-examined.
#[derive(Debug)]
pub struct HybridTablePropagator<Var> {
    columns: Box<[Var]>,
    table: TupleTable,
    graph: ColumnGraph,
    /// One intersection accumulator per conjunction cell, keyed by (tuple index, column).
    and_supports: FnvHashMap<(usize, usize), AndSupport>,
    state: Option<SearchState>,

    // Non-reversible scratch, rebuilt every sweep.
    supports: Vec<ColumnSupport>,
    sval: Vec<bool>,
    ssup: Vec<bool>,
    removals: Vec<i32>,
}

/// The reversible part of the propagator, created once it is posted.
#[derive(Debug)]
struct SearchState {
    active: ReversibleSparseSet,
    last_sizes: Vec<TrailedInteger>,
}

impl<Var: IntegerVariable> HybridTablePropagator<Var> {
    /// Create the propagator over the given columns. Fails if the table's arity does not match
    /// the number of columns.
    pub fn new(columns: Box<[Var]>, table: TupleTable) -> Result<Self, TableError> {
        if let Some(arity) = table.arity() {
            if arity != columns.len() {
                return Err(TableError::WrongColumnCount {
                    arity,
                    columns: columns.len(),
                });
            }
        }

        let num_columns = columns.len();
        let graph = ColumnGraph::new(&table, num_columns);

        let mut and_supports = FnvHashMap::default();
        for (tuple_index, tuple) in table.tuples().iter().enumerate() {
            for (column, cell) in tuple.cells().iter().enumerate() {
                if matches!(cell, Expression::Conjunction(_)) {
                    let _ = and_supports.insert((tuple_index, column), AndSupport::default());
                }
            }
        }

        Ok(HybridTablePropagator {
            columns,
            table,
            graph,
            and_supports,
            state: None,
            supports: vec![ColumnSupport::default(); num_columns],
            sval: vec![false; num_columns],
            ssup: vec![false; num_columns],
            removals: Vec::new(),
        })
    }

    /// The indices of the tuples which are still active, in ascending order.
    #[cfg(test)]
    pub(crate) fn active_tuple_indices(&self, trailed_values: &TrailedValues) -> Vec<usize> {
        let state = self
            .state
            .as_ref()
            .expect("the active set exists once the propagator is posted");
        let mut members: Vec<usize> = (0..state.active.len(trailed_values))
            .map(|index| state.active.get(index, trailed_values))
            .collect();
        members.sort_unstable();
        members
    }
}

impl<Var: IntegerVariable + 'static> Propagator for HybridTablePropagator<Var> {
    fn name(&self) -> &str {
        "SmartTable"
    }

    fn initialise_at_root(
        &mut self,
        context: &mut PropagatorInitialisationContext<'_>,
    ) -> PropagationStatusCP {
        if self.table.is_empty() {
            // No tuple can ever be satisfied.
            return Err(Inconsistency::Conflict);
        }

        for (index, column) in self.columns.iter().enumerate() {
            let _ = context.register(
                column.clone(),
                DomainEvents::ANY_INT,
                LocalId::from(index as u32),
            );
        }

        // Sizes start out-of-band so the first propagation treats every column as dirty.
        let last_sizes = self
            .columns
            .iter()
            .map(|_| context.new_trailed_integer(-1))
            .collect();
        let active =
            ReversibleSparseSet::new(self.table.num_tuples(), context.trailed_values_mut());
        self.state = Some(SearchState { active, last_sizes });

        debug!(
            "posted smart table constraint over {} columns and {} tuples",
            self.columns.len(),
            self.table.num_tuples()
        );
        Ok(())
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_>) -> PropagationStatusCP {
        let HybridTablePropagator {
            columns,
            table,
            graph,
            and_supports,
            state,
            supports,
            sval,
            ssup,
            removals,
        } = self;
        let state = state
            .as_mut()
            .expect("propagate is only called after initialise_at_root");
        let num_columns = columns.len();

        // Dirty-column detection: a changed domain size marks the column and, through the
        // graph, the columns related to it.
        sval.fill(false);
        let mut size_changed = Vec::new();
        for column in 0..num_columns {
            let size = context.domain_size(&columns[column]) as i64;
            if context.trailed_values().read(state.last_sizes[column]) != size {
                context.trailed_values_mut().assign(state.last_sizes[column], size);
                sval[column] = true;
                size_changed.push(column);
            }
        }
        for column in size_changed {
            for &neighbour in graph.neighbours(column) {
                sval[neighbour] = true;
            }
        }

        loop {
            let mut pruned_any = false;

            for column in 0..num_columns {
                ssup[column] = true;
                supports[column].reset(context.as_readonly(), &columns[column]);
            }

            let mut index = 0;
            while index < state.active.len(context.trailed_values()) {
                let tuple_index = state.active.get(index, context.trailed_values());
                let tuple = &table.tuples()[tuple_index];

                let mut tuple_satisfiable = true;
                for (column, cell) in tuple.cells().iter().enumerate() {
                    let cell_satisfiable = if let Expression::Conjunction(members) = cell {
                        // Conjunctions are refreshed every sweep, dirty column or not; their
                        // accumulator must reflect the domains this sweep marks supports
                        // under.
                        let and_support = and_supports
                            .get_mut(&(tuple_index, column))
                            .expect("an accumulator exists for every conjunction cell");
                        and_support.refresh(context.as_readonly(), columns, column, members);
                        and_support.is_non_empty()
                    } else if sval[column] {
                        cell.satisfiable(context.as_readonly(), columns, column)
                    } else {
                        // The column did not change since the previous sweep, so
                        // satisfiability established there still holds.
                        true
                    };
                    if !cell_satisfiable {
                        tuple_satisfiable = false;
                        break;
                    }
                }

                if !tuple_satisfiable {
                    state.active.remove(tuple_index, context.trailed_values_mut());
                    // The swap-removal moved another tuple to this position.
                    continue;
                }

                for column in 0..num_columns {
                    if !ssup[column] {
                        continue;
                    }
                    let cell = &tuple.cells()[column];
                    if let Expression::Conjunction(_) = cell {
                        and_supports[&(tuple_index, column)].copy_into(&mut supports[column]);
                    } else {
                        cell.mark_support(
                            context.as_readonly(),
                            columns,
                            column,
                            &mut supports[column],
                        );
                    }
                    if supports[column].is_fully_supported() {
                        ssup[column] = false;
                    }
                }

                index += 1;
            }

            if state.active.is_empty(context.trailed_values()) {
                trace!("smart table conflict: no satisfiable tuple remains");
                return Err(Inconsistency::Conflict);
            }

            sval.fill(false);
            for column in 0..num_columns {
                if supports[column].is_fully_supported() {
                    continue;
                }

                removals.clear();
                removals.extend(
                    context
                        .iterate_domain(&columns[column])
                        .filter(|&value| !supports[column].is_supported(value)),
                );

                let mut removed_any = false;
                for &value in removals.iter() {
                    removed_any |= context.remove(&columns[column], value)?;
                }

                if removed_any {
                    pruned_any = true;
                    sval[column] = true;
                    for &neighbour in graph.neighbours(column) {
                        sval[neighbour] = true;
                    }
                    let size = context.domain_size(&columns[column]) as i64;
                    context.trailed_values_mut().assign(state.last_sizes[column], size);
                }
            }

            if !pruned_any {
                return Ok(());
            }
        }
    }

    fn is_entailed(&self, context: PropagationContext<'_>) -> Entailment {
        // Entailment is judged against the whole table, independent of which tuples are still
        // active in the current branch.
        let some_tuple_satisfiable = self.table.tuples().iter().any(|tuple| {
            tuple
                .cells()
                .iter()
                .enumerate()
                .all(|(column, cell)| cell.satisfiable(context, &self.columns, column))
        });

        if !some_tuple_satisfiable {
            return Entailment::False;
        }
        if self.columns.iter().all(|column| context.is_fixed(column)) {
            // With every column fixed, satisfiable means satisfied.
            Entailment::True
        } else {
            Entailment::Unknown
        }
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
