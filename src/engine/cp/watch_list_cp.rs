use enumset::EnumSet;

use super::IntDomainEvent;
use crate::basic_types::KeyedVec;
use crate::engine::cp::propagation::PropagatorVarId;
use crate::engine::variables::DomainId;

/// Records, per domain and per event kind, which propagators asked to be woken. The crate does
/// not run a scheduler itself; the surrounding solver reads this list to decide which
/// propagators to enqueue after a domain change.
#[derive(Default, Debug)]
pub struct WatchListCP {
    watchers: KeyedVec<DomainId, WatcherCP>,
}

impl WatchListCP {
    pub fn grow(&mut self) {
        let _ = self.watchers.push(WatcherCP::default());
    }

    pub fn num_domains(&self) -> usize {
        self.watchers.len()
    }

    pub fn get_watchers(
        &self,
        domain: DomainId,
        event: IntDomainEvent,
    ) -> &[PropagatorVarId] {
        let watcher = &self.watchers[domain];
        match event {
            IntDomainEvent::Assign => &watcher.assign_watchers,
            IntDomainEvent::LowerBound => &watcher.lower_bound_watchers,
            IntDomainEvent::UpperBound => &watcher.upper_bound_watchers,
            IntDomainEvent::Removal => &watcher.removal_watchers,
        }
    }

    fn watch(&mut self, watcher: PropagatorVarId, domain: DomainId, event: IntDomainEvent) {
        let watchers = &mut self.watchers[domain];
        let event_watchers = match event {
            IntDomainEvent::Assign => &mut watchers.assign_watchers,
            IntDomainEvent::LowerBound => &mut watchers.lower_bound_watchers,
            IntDomainEvent::UpperBound => &mut watchers.upper_bound_watchers,
            IntDomainEvent::Removal => &mut watchers.removal_watchers,
        };
        if !event_watchers.contains(&watcher) {
            event_watchers.push(watcher);
        }
    }
}

/// Used by a propagator to register itself for notifications about events on a particular
/// variable.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    watch_list: &'a mut WatchListCP,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(propagator_var: PropagatorVarId, watch_list: &'a mut WatchListCP) -> Self {
        Watchers {
            propagator_var,
            watch_list,
        }
    }

    pub fn watch_all(&mut self, domain: DomainId, events: EnumSet<IntDomainEvent>) {
        for event in events {
            self.watch_list.watch(self.propagator_var, domain, event);
        }
    }
}

#[derive(Default, Debug)]
struct WatcherCP {
    lower_bound_watchers: Vec<PropagatorVarId>,
    upper_bound_watchers: Vec<PropagatorVarId>,
    assign_watchers: Vec<PropagatorVarId>,
    removal_watchers: Vec<PropagatorVarId>,
}
