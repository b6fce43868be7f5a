/// The three-valued verdict of asking a propagator whether its constraint is decided under the
/// current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entailment {
    /// The constraint holds under every remaining assignment.
    True,
    /// The constraint is violated under every remaining assignment.
    False,
    /// The current domains decide neither way.
    Unknown,
}
