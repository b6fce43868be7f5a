//! The interface between a propagator and the solver state it reads and mutates.
//!
//! A propagator implements the [`Propagator`] trait. At posting time
//! [`Propagator::initialise_at_root`] is called once with a
//! [`PropagatorInitialisationContext`], through which the propagator registers the variables it
//! wants to be notified about and grows whatever reversible state it carries between
//! invocations. During search, [`Propagator::propagate`] is handed a
//! [`PropagationContextMut`], the only channel through which domains may be inspected (via
//! [`ReadDomains`]) and pruned.

mod propagation_context;
mod propagator;
mod propagator_initialisation_context;
mod propagator_var_id;

pub use propagation_context::HasAssignments;
pub use propagation_context::PropagationContext;
pub use propagation_context::PropagationContextMut;
pub use propagation_context::ReadDomains;
pub use propagator::Propagator;
pub use propagator_initialisation_context::PropagatorInitialisationContext;
pub use propagator_var_id::LocalId;
pub use propagator_var_id::PropagatorId;
pub use propagator_var_id::PropagatorVarId;
