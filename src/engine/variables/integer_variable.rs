use enumset::EnumSet;

use crate::engine::cp::assignments::Assignments;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::IntDomainEvent;
use crate::engine::cp::Watchers;

/// The behaviour required of an integer decision variable: bound and membership queries over
/// its current domain, domain mutation, and registration for domain-change notifications.
///
/// Propagators are written against this trait rather than against [`DomainId`] directly so
/// that derived views over a domain can be substituted without touching the propagator.
///
/// [`DomainId`]: crate::engine::variables::DomainId
pub trait IntegerVariable: Clone + std::fmt::Debug {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, assignments: &Assignments, value: i32) -> bool;

    /// The number of values remaining in the domain.
    fn domain_size(&self, assignments: &Assignments) -> usize;

    /// The smallest domain value strictly greater than `value`, if any.
    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// The largest domain value strictly smaller than `value`, if any.
    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// Iterate over the values of the domain in increasing order.
    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a;

    /// Remove a value from the domain of this variable.
    fn remove(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;

    /// Tighten the lower bound of the domain to `value`.
    fn set_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain>;

    /// Tighten the upper bound of the domain to `value`.
    fn set_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<IntDomainEvent>);
}
