use super::PropagationContext;
use super::PropagationContextMut;
use super::PropagatorInitialisationContext;
use crate::basic_types::Entailment;
#[cfg(doc)]
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;

/// The interface every constraint propagator implements.
///
/// A propagator filters the domains of the variables it was posted over: it removes values
/// which cannot take part in any solution of its constraint, and it reports a conflict when
/// the constraint can no longer be satisfied at all.
pub trait Propagator {
    /// Return the name of the propagator; this is a convenience method used for printing.
    fn name(&self) -> &str;

    /// Initialises the propagator when it is posted, before any call to
    /// [`Propagator::propagate`] is made.
    ///
    /// This is where the propagator registers the variables it wants notifications for and
    /// grows the reversible state it carries between invocations. A root-level inconsistency
    /// may be reported by returning the error variant.
    fn initialise_at_root(
        &mut self,
        context: &mut PropagatorInitialisationContext<'_>,
    ) -> PropagationStatusCP;

    /// Extend the current partial assignment with the domain changes this propagator can
    /// infer, or report an [`Inconsistency`] when the current state cannot be extended to a
    /// solution of the constraint.
    ///
    /// Called by the surrounding solver whenever one of the registered variables changed.
    fn propagate(&mut self, context: PropagationContextMut<'_>) -> PropagationStatusCP;

    /// Determine whether the constraint is already decided under the current domains.
    ///
    /// The default implementation never decides; propagators which can cheaply answer the
    /// question override this.
    fn is_entailed(&self, _context: PropagationContext<'_>) -> Entailment {
        Entailment::Unknown
    }

    /// Access the propagator as its concrete type, so tests can inspect internal state.
    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any;
}
