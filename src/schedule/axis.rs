//! Day and time axes located from the fragment sequence.
//!
//! The page has no table structure, so columns and rows are recovered from
//! header fragments:
//!
//! - **Day axis**: each `"Mo "`..`"Fr "` header marks the left edge of a day
//!   column. The edge is pulled left by a tolerance so slightly misaligned
//!   cell text still lands in the right column.
//! - **Time axis**: the time labels down the side of the grid, bounded by the
//!   first and second occurrence of the day-start label, give the vertical
//!   offset of every `HH:MM` row. Half-hour rows render as a bare `"30"`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fragment::Fragment;

/// Half-hour continuation label rendered without its hour prefix.
pub const CONTINUATION: &str = "30";

/// Default pull-left applied to day header offsets.
pub const DEFAULT_DAY_TOLERANCE: i32 = 15;

/// Default label that opens and closes the time axis.
pub const DEFAULT_DAY_START: &str = "09:00";

/// Weekday columns, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Mo,
    Tu,
    We,
    Th,
    Fr,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mo, Day::Tu, Day::We, Day::Th, Day::Fr];

    /// Header marker searched for in fragment text (code plus a space).
    pub fn marker(self) -> &'static str {
        match self {
            Day::Mo => "Mo ",
            Day::Tu => "Tu ",
            Day::We => "We ",
            Day::Th => "Th ",
            Day::Fr => "Fr ",
        }
    }

    pub fn code(self) -> &'static str {
        self.marker().trim_end()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A key written twice while building an axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisCollision {
    pub key: String,
    pub previous: String,
    pub replacement: String,
}

impl fmt::Display for AxisCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {} mapped to {} was overwritten by {}",
            self.key, self.previous, self.replacement
        )
    }
}

/// An axis together with the collisions seen while building it.
///
/// The later write always wins; callers decide whether collisions are fatal.
#[derive(Debug, Clone)]
pub struct AxisBuild<A> {
    pub axis: A,
    pub collisions: Vec<AxisCollision>,
}

/// Left-offset thresholds mapped to day columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayAxis {
    thresholds: BTreeMap<i32, Day>,
}

impl DayAxis {
    /// Scan every fragment for day header markers.
    pub fn locate(fragments: &[Fragment], tolerance: i32) -> AxisBuild<Self> {
        let mut axis = Self::default();
        let mut collisions = Vec::new();

        for fragment in fragments {
            for day in Day::ALL {
                if !fragment.text.contains(day.marker()) {
                    continue;
                }
                let threshold = fragment.left - tolerance;
                if let Some(previous) = axis.thresholds.insert(threshold, day) {
                    collisions.push(AxisCollision {
                        key: threshold.to_string(),
                        previous: previous.to_string(),
                        replacement: day.to_string(),
                    });
                }
            }
        }

        AxisBuild { axis, collisions }
    }

    /// Day whose threshold is the largest one strictly below `left`.
    pub fn day_for(&self, left: i32) -> Option<Day> {
        self.thresholds
            .range(..left)
            .next_back()
            .map(|(_, day)| *day)
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> impl Iterator<Item = (i32, Day)> + '_ {
        self.thresholds.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// Time labels mapped to their top offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeAxis {
    offsets: HashMap<String, i32>,
    /// Whether two day-start markers were found to bound the axis.
    pub bounded: bool,
}

impl TimeAxis {
    /// Locate the axis between the first and second day-start marker.
    ///
    /// The opening marker is part of the range; the closing one is not.
    /// With fewer than two markers the axis is empty and unbounded.
    pub fn locate(fragments: &[Fragment], day_start: &str) -> AxisBuild<Self> {
        let mut markers = fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| f.text == day_start)
            .map(|(i, _)| i);

        match (markers.next(), markers.next()) {
            (Some(start), Some(stop)) => {
                let mut build = Self::from_fragments(&fragments[start..stop]);
                build.axis.bounded = true;
                build
            }
            _ => AxisBuild {
                axis: Self::default(),
                collisions: Vec::new(),
            },
        }
    }

    /// Build an axis from an already-bounded run of label fragments.
    ///
    /// A [`CONTINUATION`] fragment is keyed as the previous label's hour
    /// prefix plus `"30"`.
    pub fn from_fragments(fragments: &[Fragment]) -> AxisBuild<Self> {
        let mut axis = Self::default();
        let mut collisions = Vec::new();
        let mut prev = "";

        for fragment in fragments {
            let key = if fragment.text == CONTINUATION {
                let hour: String = prev.chars().take(3).collect();
                format!("{hour}{CONTINUATION}")
            } else {
                prev = fragment.text.as_str();
                fragment.text.clone()
            };

            if let Some(previous) = axis.offsets.insert(key.clone(), fragment.top) {
                collisions.push(AxisCollision {
                    key,
                    previous: previous.to_string(),
                    replacement: fragment.top.to_string(),
                });
            }
        }

        AxisBuild { axis, collisions }
    }

    pub fn offset(&self, label: &str) -> Option<i32> {
        self.offsets.get(label).copied()
    }

    /// Labels sorted by offset, top to bottom.
    pub fn rows(&self) -> Vec<(&str, i32)> {
        let mut rows: Vec<_> = self
            .offsets
            .iter()
            .map(|(label, top)| (label.as_str(), *top))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
