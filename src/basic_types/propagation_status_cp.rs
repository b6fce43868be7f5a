use crate::engine::cp::EmptyDomain;

/// The result of invoking a constraint programming propagator. The propagation can either
/// succeed or identify a conflict; the conflict is not a program error but the signal on which
/// the surrounding search engine backtracks.
pub type PropagationStatusCP = Result<(), Inconsistency>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A domain was wiped out while propagating.
    EmptyDomain,
    /// The propagator proved that no assignment within the current domains can satisfy its
    /// constraint, without necessarily emptying a domain first.
    Conflict,
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}
