use crate::basic_types::KeyedVec;
use crate::basic_types::Trail;
use crate::engine::variables::DomainId;
use crate::smart_table_assert_moderate;
use crate::smart_table_assert_simple;

/// The trailed integer domains of all decision variables.
///
/// Every mutation pushes one entry onto the trail capturing what is needed to undo it;
/// [`Assignments::synchronise`] rewinds to an earlier checkpoint by replaying those entries in
/// reverse. Checkpoints correspond to decision levels of the surrounding search.
#[derive(Clone, Default, Debug)]
pub struct Assignments {
    trail: Trail<TrailEntry>,
    domains: KeyedVec<DomainId, IntegerDomainExplicit>,
}

/// Signals that a domain mutation left a domain without any values. This is the expected
/// mechanism through which the search engine learns a branch is infeasible; it is not a
/// program error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

impl Assignments {
    /// Register the domain of a new integer variable with the given (inclusive) bounds.
    pub fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.domains
            .push(IntegerDomainExplicit::new(lower_bound, upper_bound))
    }

    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    /// Rewind all domains to their state at the given earlier checkpoint.
    pub fn synchronise(&mut self, new_checkpoint: usize) {
        let domains = &mut self.domains;
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|entry| domains[entry.domain_id].undo_trail_entry(&entry));
    }
}

// Queries over the current domains.
impl Assignments {
    pub fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].lower_bound
    }

    pub fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].upper_bound
    }

    pub fn is_value_in_domain(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id].contains(value)
    }

    pub fn get_domain_size(&self, domain_id: DomainId) -> usize {
        self.domains[domain_id].size
    }

    pub fn is_domain_assigned(&self, domain_id: DomainId) -> bool {
        self.get_lower_bound(domain_id) == self.get_upper_bound(domain_id)
    }

    pub fn is_domain_assigned_to_value(&self, domain_id: DomainId, value: i32) -> bool {
        self.is_domain_assigned(domain_id) && self.get_lower_bound(domain_id) == value
    }

    /// The smallest domain value strictly greater than `value`, if any.
    pub fn get_next_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        let domain = &self.domains[domain_id];
        let start = i32::max(value.saturating_add(1), domain.lower_bound);
        (start..=domain.upper_bound).find(|&v| domain.contains(v))
    }

    /// The largest domain value strictly smaller than `value`, if any.
    pub fn get_previous_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        let domain = &self.domains[domain_id];
        let end = i32::min(value.saturating_sub(1), domain.upper_bound);
        (domain.lower_bound..=end).rev().find(|&v| domain.contains(v))
    }

    pub fn domain_iterator(&self, domain_id: DomainId) -> impl Iterator<Item = i32> + '_ {
        let domain = &self.domains[domain_id];
        (domain.lower_bound..=domain.upper_bound).filter(move |&v| domain.contains(v))
    }
}

// Mutations. Each returns whether a change took place, or [`EmptyDomain`] if the mutation
// wiped out the domain.
impl Assignments {
    pub fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        new_lower_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        if new_lower_bound <= self.get_lower_bound(domain_id) {
            return Ok(false);
        }

        self.push_trail_entry(domain_id, None);

        let domain = &mut self.domains[domain_id];
        domain.set_lower_bound(new_lower_bound);
        domain.verify_consistency()?;
        Ok(true)
    }

    pub fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        new_upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        if new_upper_bound >= self.get_upper_bound(domain_id) {
            return Ok(false);
        }

        self.push_trail_entry(domain_id, None);

        let domain = &mut self.domains[domain_id];
        domain.set_upper_bound(new_upper_bound);
        domain.verify_consistency()?;
        Ok(true)
    }

    pub fn remove_value_from_domain(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.domains[domain_id].contains(value) {
            return Ok(false);
        }

        self.push_trail_entry(domain_id, Some(value));

        let domain = &mut self.domains[domain_id];
        domain.remove_value(value);
        domain.verify_consistency()?;
        Ok(true)
    }

    pub fn make_assignment(
        &mut self,
        domain_id: DomainId,
        assigned_value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.is_value_in_domain(domain_id, assigned_value) {
            // Assigning a value outside the domain empties it; record the wipe-out on the
            // trail so backtracking still restores the previous bounds.
            let _ = self.tighten_lower_bound(domain_id, self.get_upper_bound(domain_id) + 1)?;
            unreachable!("tightening past the upper bound always reports an empty domain");
        }

        let lower_changed = self.tighten_lower_bound(domain_id, assigned_value)?;
        let upper_changed = self.tighten_upper_bound(domain_id, assigned_value)?;
        Ok(lower_changed || upper_changed)
    }

    fn push_trail_entry(&mut self, domain_id: DomainId, removed_value: Option<i32>) {
        let domain = &self.domains[domain_id];
        self.trail.push(TrailEntry {
            domain_id,
            old_lower_bound: domain.lower_bound,
            old_upper_bound: domain.upper_bound,
            old_size: domain.size,
            removed_value,
        });
    }
}

#[derive(Clone, Copy, Debug)]
struct TrailEntry {
    domain_id: DomainId,
    /// The bounds and size before the mutation was applied, so that undoing is a plain
    /// restore.
    old_lower_bound: i32,
    old_upper_bound: i32,
    old_size: usize,
    /// Set iff the mutation punched a hole; the bit for this value is flipped back on undo.
    removed_value: Option<i32>,
}

/// The explicit representation of one domain: the current bounds plus a bitmap, relative to a
/// fixed offset, recording which values between the initial bounds are still present.
///
/// The bounds are kept normalised onto contained values: removing the value at a bound slides
/// that bound inward to the next remaining value. When the domain becomes empty,
/// `lower_bound > upper_bound` holds and `size` is zero.
#[derive(Clone, Debug)]
struct IntegerDomainExplicit {
    lower_bound: i32,
    upper_bound: i32,
    size: usize,
    /// Maps a value `v` to index `v - offset` in `is_value_in_domain`.
    offset: i32,
    is_value_in_domain: Box<[bool]>,
}

impl IntegerDomainExplicit {
    fn new(lower_bound: i32, upper_bound: i32) -> IntegerDomainExplicit {
        smart_table_assert_simple!(lower_bound <= upper_bound, "cannot create an empty domain");

        let span = upper_bound - lower_bound + 1;

        IntegerDomainExplicit {
            lower_bound,
            upper_bound,
            size: span as usize,
            offset: -lower_bound,
            is_value_in_domain: vec![true; span as usize].into(),
        }
    }

    fn contains(&self, value: i32) -> bool {
        value >= self.lower_bound
            && value <= self.upper_bound
            && self.is_value_in_domain[(value + self.offset) as usize]
    }

    fn set_lower_bound(&mut self, new_lower_bound: i32) {
        for value in self.lower_bound..i32::min(new_lower_bound, self.upper_bound + 1) {
            if self.is_value_in_domain[(value + self.offset) as usize] {
                self.size -= 1;
            }
        }
        self.lower_bound = new_lower_bound;
        self.normalise_bounds();
    }

    fn set_upper_bound(&mut self, new_upper_bound: i32) {
        for value in i32::max(new_upper_bound + 1, self.lower_bound)..=self.upper_bound {
            if self.is_value_in_domain[(value + self.offset) as usize] {
                self.size -= 1;
            }
        }
        self.upper_bound = new_upper_bound;
        self.normalise_bounds();
    }

    fn remove_value(&mut self, value: i32) {
        smart_table_assert_moderate!(self.contains(value));

        self.is_value_in_domain[(value + self.offset) as usize] = false;
        self.size -= 1;
        self.normalise_bounds();
    }

    /// Slide the bounds inward onto contained values, so that `lower_bound` and `upper_bound`
    /// always name values which are actually in the domain (unless the domain is empty).
    fn normalise_bounds(&mut self) {
        if self.size == 0 {
            return;
        }
        while self.lower_bound <= self.upper_bound
            && !self.is_value_in_domain[(self.lower_bound + self.offset) as usize]
        {
            self.lower_bound += 1;
        }
        while self.upper_bound >= self.lower_bound
            && !self.is_value_in_domain[(self.upper_bound + self.offset) as usize]
        {
            self.upper_bound -= 1;
        }
    }

    fn verify_consistency(&self) -> Result<(), EmptyDomain> {
        if self.size == 0 || self.lower_bound > self.upper_bound {
            Err(EmptyDomain)
        } else {
            Ok(())
        }
    }

    fn undo_trail_entry(&mut self, entry: &TrailEntry) {
        if let Some(value) = entry.removed_value {
            self.is_value_in_domain[(value + self.offset) as usize] = true;
        }
        self.lower_bound = entry.old_lower_bound;
        self.upper_bound = entry.old_upper_bound;
        self.size = entry.old_size;
    }
}
