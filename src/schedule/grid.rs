//! Assigns lesson-region fragments to day columns and time intervals.

use std::collections::BTreeMap;

use serde::Serialize;

use super::axis::{Day, DayAxis, TimeAxis};
use super::fragment::Fragment;

/// A fragment annotated with its grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedFragment {
    pub fragment: Fragment,
    pub day: Option<Day>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl PlacedFragment {
    fn new(fragment: Fragment) -> Self {
        Self {
            fragment,
            day: None,
            start: None,
            end: None,
        }
    }

    /// Day and interval, if the fragment landed inside the grid.
    pub fn slot(&self) -> Option<(Day, &str, &str)> {
        Some((self.day?, self.start.as_deref()?, self.end.as_deref()?))
    }
}

/// Content fragments that could not be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    /// Left of every day threshold.
    pub no_day: usize,
    /// Inside a day column but in no time interval.
    pub no_interval: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.no_day + self.no_interval
    }
}

/// Result of placing the lesson region onto the axes.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Every lesson-region fragment, in document order.
    pub cells: Vec<PlacedFragment>,
    /// Time labels per day column, top to bottom.
    pub time_slots: BTreeMap<Day, Vec<String>>,
    pub dropped: DropCounts,
}

/// Fragments preceding the first day-start marker.
pub fn lesson_region<'a>(fragments: &'a [Fragment], day_start: &str) -> &'a [Fragment] {
    let end = fragments
        .iter()
        .position(|f| f.text == day_start)
        .unwrap_or(fragments.len());
    &fragments[..end]
}

/// Assign days, build per-day slot lists, then resolve intervals.
pub fn assign(region: &[Fragment], days: &DayAxis, times: &TimeAxis) -> Grid {
    let mut cells: Vec<PlacedFragment> = region
        .iter()
        .cloned()
        .map(|fragment| {
            let mut placed = PlacedFragment::new(fragment);
            placed.day = days.day_for(placed.fragment.left);
            placed
        })
        .collect();

    let mut time_slots: BTreeMap<Day, Vec<String>> = BTreeMap::new();
    for cell in &cells {
        if let (Some(day), true) = (cell.day, cell.fragment.is_time_label()) {
            time_slots
                .entry(day)
                .or_default()
                .push(cell.fragment.text.clone());
        }
    }

    let mut dropped = DropCounts::default();
    for cell in cells.iter_mut().filter(|c| !c.fragment.is_time_label()) {
        let Some(day) = cell.day else {
            dropped.no_day += 1;
            continue;
        };
        let slots = time_slots.get(&day).map_or(&[][..], Vec::as_slice);

        match find_interval(slots, times, cell.fragment.top) {
            Some((start, end)) => {
                cell.start = Some(start.to_string());
                cell.end = Some(end.to_string());
            }
            None => dropped.no_interval += 1,
        }
    }

    Grid {
        cells,
        time_slots,
        dropped,
    }
}

/// Find the `(slot[2i], slot[2i+1])` pair strictly enclosing `top`.
///
/// A trailing unpaired slot and slots missing from the time axis never match.
fn find_interval<'a>(slots: &'a [String], times: &TimeAxis, top: i32) -> Option<(&'a str, &'a str)> {
    slots.chunks_exact(2).find_map(|pair| {
        let (start, end) = (&pair[0], &pair[1]);
        let lo = times.offset(start)?;
        let hi = times.offset(end)?;
        (lo < top && top < hi).then_some((start.as_str(), end.as_str()))
    })
}
