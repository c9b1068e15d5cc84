//! Expansion of a doctor's recurring windows into bookable slot times.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};

use crate::models::ScheduleWindow;

pub const SLOT_MINUTES: i64 = 60;

pub fn slot_granularity() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Slot start times inside one window, ascending.
///
/// A slot is emitted only when the whole hour fits before the window's end,
/// so a 9:00-9:30 window yields nothing and 9:00-12:00 yields 9, 10 and 11.
/// Stepping stops rather than wrapping past midnight.
pub fn window_slots(window: &ScheduleWindow) -> Vec<NaiveTime> {
    let Some((start, end)) = window.bounds() else {
        return Vec::new();
    };

    let step = slot_granularity();
    let mut slots = Vec::new();
    let mut current = start;

    loop {
        let (slot_end, wrapped_secs) = current.overflowing_add_signed(step);
        if wrapped_secs != 0 || slot_end > end {
            break;
        }
        slots.push(current);
        current = slot_end;
    }

    slots
}

/// Union of every window's slots. Overlapping windows collapse to one entry
/// per time.
pub fn expand_windows(windows: &[ScheduleWindow]) -> BTreeSet<NaiveTime> {
    windows.iter().flat_map(window_slots).collect()
}
