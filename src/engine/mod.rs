//! The substrate a propagator runs on: trailed integer domains, reversible scratch values and
//! the propagation interface. A surrounding solver owns the search loop; this crate only
//! provides what is needed to run and test propagators in isolation.

pub mod cp;
pub mod variables;

pub(crate) mod test_helper;
