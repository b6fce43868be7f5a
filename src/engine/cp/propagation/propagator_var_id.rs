/// An identifier for a propagator, assigned when it is posted to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagatorId(pub u32);

impl std::fmt::Display for PropagatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropagatorId({})", self.0)
    }
}

/// A propagator-local identifier for one of the variables the propagator watches; most often
/// the index of the variable in the propagator's own array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A (propagator, local variable) pair, stored in the watch lists so that a notification can
/// be routed back to the right propagator and the right variable within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagatorVarId {
    pub propagator: PropagatorId,
    pub variable: LocalId,
}
