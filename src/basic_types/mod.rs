mod entailment;
mod keyed_vec;
mod propagation_status_cp;
mod trail;

pub use entailment::Entailment;
pub(crate) use keyed_vec::KeyedVec;
pub(crate) use keyed_vec::StorageKey;
pub use propagation_status_cp::Inconsistency;
pub use propagation_status_cp::PropagationStatusCP;
pub(crate) use trail::Trail;
