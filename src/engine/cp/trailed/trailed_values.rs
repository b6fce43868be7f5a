use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::KeyedVec;
use crate::basic_types::Trail;

/// Reversible integer cells: writes are recorded on a trail and automatically undone when the
/// search backtracks past the checkpoint at which they happened.
///
/// Propagators use these for the persistent state they carry between invocations, such as
/// last-seen domain sizes, so that no propagator needs its own undo logic.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub fn synchronise(&mut self, new_checkpoint: usize) {
        for change in self.trail.synchronise(new_checkpoint) {
            self.values[change.reference] = change.old_value;
        }
    }

    fn write(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        let entry = TrailedChange {
            old_value,
            reference: trailed_integer,
        };
        self.trail.push(entry);
        self.values[trailed_integer] = value;
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.write(trailed_integer, value);
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.write(trailed_integer, self.values[trailed_integer] + addition);
    }
}
