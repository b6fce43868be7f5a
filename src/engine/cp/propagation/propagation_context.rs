use crate::engine::cp::assignments::Assignments;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::TrailedValues;
use crate::engine::variables::IntegerVariable;

/// A read-only view of the solver state, passed to a propagator when it may inspect but not
/// change domains (for example while checking entailment).
///
/// Domains are read through the [`ReadDomains`] implementation.
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a Assignments,
}

impl<'a> PropagationContext<'a> {
    pub fn new(assignments: &'a Assignments) -> Self {
        PropagationContext { assignments }
    }
}

/// The view of the solver state a propagator receives while propagating: domains can be read
/// through [`ReadDomains`] and pruned through the mutation methods, and the propagator's own
/// reversible cells can be read and written.
///
/// This context is the only point of communication between a propagator and the solver during
/// propagation.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
}

impl<'a> PropagationContextMut<'a> {
    pub fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
    ) -> Self {
        PropagationContextMut {
            assignments,
            trailed_values,
        }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
        }
    }

    pub fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }

    pub fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        self.trailed_values
    }

    /// Remove a value from the domain of the given variable. Returns whether the domain
    /// changed, or [`EmptyDomain`] if the removal wiped the domain out.
    pub fn remove<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        var.remove(self.assignments, value)
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        var.set_lower_bound(self.assignments, bound)
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        var.set_upper_bound(self.assignments, bound)
    }
}

/// A trait for structures through which the [`Assignments`] can be reached.
pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// Read-only domain queries, shared by every context handed to a propagator.
pub trait ReadDomains: HasAssignments {
    /// Returns `true` if the domain of the given variable is a singleton.
    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        self.lower_bound(var) == self.upper_bound(var)
    }

    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.assignments(), value)
    }

    fn domain_size<Var: IntegerVariable>(&self, var: &Var) -> usize {
        var.domain_size(self.assignments())
    }

    fn next_value<Var: IntegerVariable>(&self, var: &Var, value: i32) -> Option<i32> {
        var.next_value(self.assignments(), value)
    }

    fn previous_value<Var: IntegerVariable>(&self, var: &Var, value: i32) -> Option<i32> {
        var.previous_value(self.assignments(), value)
    }

    fn iterate_domain<'a, Var: IntegerVariable>(
        &'a self,
        var: &Var,
    ) -> impl Iterator<Item = i32> + 'a {
        var.iterate_domain(self.assignments())
    }
}

impl<T: HasAssignments> ReadDomains for T {}
