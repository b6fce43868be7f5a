pub(crate) mod assignments;
mod domain_events;
pub mod propagation;
mod reversible_sparse_set;
pub(crate) mod trailed;
mod watch_list_cp;

pub use assignments::Assignments;
pub use assignments::EmptyDomain;
pub use domain_events::DomainEvents;
pub use domain_events::IntDomainEvent;
pub(crate) use reversible_sparse_set::ReversibleSparseSet;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
pub use watch_list_cp::WatchListCP;
pub use watch_list_cp::Watchers;
