//! One event per calendar date.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use ronda_events::ClassifiedEvent;
use ronda_traits::Date;

/// Keep the event with the largest absolute day-of move for each date,
/// newest date first. The first event wins ties.
///
/// Several announcements on one day share the same price reaction; counting
/// each would weight that session several times.
#[must_use]
pub fn dedupe_by_date(events: &[ClassifiedEvent]) -> Vec<ClassifiedEvent> {
    let mut strongest: BTreeMap<Date, &ClassifiedEvent> = BTreeMap::new();
    for event in events {
        match strongest.entry(event.date()) {
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
            Entry::Occupied(mut slot) => {
                if event.day_of_change().abs() > slot.get().day_of_change().abs() {
                    slot.insert(event);
                }
            }
        }
    }
    strongest.into_values().rev().cloned().collect()
}
