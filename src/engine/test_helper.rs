#![cfg(test)]
//! Helpers that aid testing of CP propagators. The [`TestSolver`] allows setting up specific
//! scenarios under which to test the various operations of a propagator, without a full search
//! loop around it.
use std::fmt::Debug;
use std::fmt::Formatter;

use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::cp::assignments::Assignments;
use crate::engine::cp::propagation::PropagationContext;
use crate::engine::cp::propagation::PropagationContextMut;
use crate::engine::cp::propagation::Propagator;
use crate::engine::cp::propagation::PropagatorId;
use crate::engine::cp::propagation::PropagatorInitialisationContext;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::IntDomainEvent;
use crate::engine::cp::TrailedValues;
use crate::engine::cp::WatchListCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::smart_table_assert_simple;

/// A container for CP variables and posted propagators, which can be used to test propagators
/// in isolation.
#[derive(Default)]
pub(crate) struct TestSolver {
    pub(crate) assignments: Assignments,
    pub(crate) trailed_values: TrailedValues,
    pub(crate) watch_list: WatchListCP,

    propagators: Vec<Box<dyn Propagator>>,
}

impl Debug for TestSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "test_helper::TestSolver(<propagators omitted>)")
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.watch_list.grow();
        self.assignments.grow(lower_bound, upper_bound)
    }

    /// Create a variable whose initial domain is exactly the given set of values.
    pub(crate) fn new_sparse_variable(&mut self, values: &[i32]) -> DomainId {
        assert!(
            !values.is_empty(),
            "cannot create a variable with an empty domain"
        );
        let mut values = values.to_vec();

        values.sort_unstable();
        values.dedup();

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];

        let domain_id = self.new_variable(lower_bound, upper_bound);

        let mut next_idx = 0;
        for value in lower_bound..=upper_bound {
            if next_idx < values.len() && value == values[next_idx] {
                next_idx += 1;
            } else {
                self.assignments
                    .remove_value_from_domain(domain_id, value)
                    .expect("the domain should not become empty");
            }
        }
        smart_table_assert_simple!(
            next_idx == values.len(),
            "expected all values to have been processed"
        );

        domain_id
    }

    /// Post a propagator: initialise it at the root and run its first propagation.
    pub(crate) fn new_propagator(
        &mut self,
        propagator: impl Propagator + 'static,
    ) -> Result<PropagatorId, Inconsistency> {
        let id = PropagatorId(self.propagators.len() as u32);

        let mut propagator: Box<dyn Propagator> = Box::new(propagator);

        propagator.initialise_at_root(&mut PropagatorInitialisationContext::new(
            &mut self.watch_list,
            &mut self.trailed_values,
            id,
            &self.assignments,
        ))?;

        self.propagators.push(propagator);

        self.propagate(id)?;

        Ok(id)
    }

    /// Access a posted propagator as its concrete type, to inspect its internal state.
    pub(crate) fn propagator<P: Propagator + 'static>(&self, id: PropagatorId) -> &P {
        self.propagators[id.0 as usize]
            .as_any()
            .downcast_ref()
            .expect("the posted propagator has a different type")
    }

    pub(crate) fn propagate(&mut self, propagator: PropagatorId) -> PropagationStatusCP {
        let context =
            PropagationContextMut::new(&mut self.assignments, &mut self.trailed_values);
        self.propagators[propagator.0 as usize].propagate(context)
    }

    pub(crate) fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.propagators[propagator.0 as usize]
            .is_entailed(PropagationContext::new(&self.assignments))
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    pub(crate) fn backtrack_to(&mut self, checkpoint: usize) {
        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        self.assignments.remove_value_from_domain(var, value)
    }

    pub(crate) fn increase_lower_bound(&mut self, var: DomainId, value: i32) {
        let result = self.assignments.tighten_lower_bound(var, value);
        assert!(
            result.is_ok(),
            "increasing the lower bound caused an empty domain"
        );
    }

    pub(crate) fn decrease_upper_bound(&mut self, var: DomainId, value: i32) {
        let result = self.assignments.tighten_upper_bound(var, value);
        assert!(
            result.is_ok(),
            "decreasing the upper bound caused an empty domain"
        );
    }

    pub(crate) fn instantiate(&mut self, var: DomainId, value: i32) {
        let result = self.assignments.make_assignment(var, value);
        assert!(result.is_ok(), "instantiation caused an empty domain");
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_upper_bound(var)
    }

    pub(crate) fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(&self.assignments, value)
    }

    pub(crate) fn domain_size(&self, var: DomainId) -> usize {
        self.assignments.get_domain_size(var)
    }

    pub(crate) fn num_watchers(&self, var: DomainId, event: IntDomainEvent) -> usize {
        self.watch_list.get_watchers(var, event).len()
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn assert_domain(&self, var: DomainId, domain: Vec<i32>) {
        assert!(!domain.is_empty(), "domain provided to test solver is empty");

        let min_domain = *domain.iter().min().unwrap();
        let max_domain = *domain.iter().max().unwrap();

        self.assert_bounds(var, min_domain, max_domain);
        for value in min_domain..=max_domain {
            if !domain.contains(&value) {
                assert!(
                    !self.contains(&var, value),
                    "{value} was in the domain while it should not be (provided domain {domain:?})"
                )
            } else {
                assert!(
                    self.contains(&var, value),
                    "{value} was not in the domain while it should be (provided domain {domain:?})"
                )
            }
        }
    }
}
