use super::propagation_context::HasAssignments;
use super::LocalId;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::cp::assignments::Assignments;
use crate::engine::cp::DomainEvents;
use crate::engine::cp::TrailedInteger;
use crate::engine::cp::TrailedValues;
use crate::engine::cp::WatchListCP;
use crate::engine::cp::Watchers;
use crate::engine::variables::IntegerVariable;

/// Handed to a propagator when it is posted, before any propagation happens.
///
/// Through this context the propagator subscribes its variables to domain events and grows the
/// reversible integer cells backing the state it keeps between invocations.
#[derive(Debug)]
pub struct PropagatorInitialisationContext<'a> {
    watch_list: &'a mut WatchListCP,
    trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
    next_local_id: LocalId,

    assignments: &'a Assignments,
}

impl PropagatorInitialisationContext<'_> {
    pub fn new<'a>(
        watch_list: &'a mut WatchListCP,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
        assignments: &'a Assignments,
    ) -> PropagatorInitialisationContext<'a> {
        PropagatorInitialisationContext {
            watch_list,
            trailed_values,
            propagator_id,
            next_local_id: LocalId::from(0),

            assignments,
        }
    }

    /// Subscribes the propagator to the given [`DomainEvents`] on `var`.
    ///
    /// Each variable must have a unique [`LocalId`], most often its index in the propagator's
    /// internal variable array.
    pub fn register<Var: IntegerVariable>(
        &mut self,
        var: Var,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) -> Var {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        self.next_local_id = LocalId::from(u32::max(
            self.next_local_id.unpack(),
            local_id.unpack() + 1,
        ));

        let mut watchers = Watchers::new(propagator_var, self.watch_list);
        var.watch_all(&mut watchers, domain_events.get_int_events());

        var
    }

    /// Grow a reversible integer cell for the propagator's own bookkeeping.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        self.trailed_values
    }

    pub fn get_next_local_id(&self) -> LocalId {
        self.next_local_id
    }
}

impl HasAssignments for PropagatorInitialisationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
