//! Groups placed fragments into lesson entries.
//!
//! Fragments sharing a `(day, start)` key belong to the same timetable cell.
//! The first one becomes the subject; how the rest are kept depends on
//! [`FieldMode`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use super::axis::Day;
use super::grid::PlacedFragment;

/// How fragments after the subject line are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FieldMode {
    /// Space-join everything after the subject into `info`.
    #[default]
    Merged,
    /// Assign subject, instructor and location by declared role.
    Roles,
}

/// Declared per-cell schema for [`FieldMode::Roles`].
pub const ROLE_SCHEMA: [Role; 3] = [Role::Subject, Role::Instructor, Role::Location];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Subject,
    Instructor,
    Location,
}

/// One reconstructed timetable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonEntry {
    pub day: Day,
    pub start: String,
    pub end: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "join_notes"
    )]
    pub notes: Vec<String>,
    pub period: String,
}

impl LessonEntry {
    fn new(day: Day, start: &str, end: &str, subject: String) -> Self {
        Self {
            day,
            start: start.to_string(),
            end: end.to_string(),
            subject,
            info: None,
            instructor: None,
            location: None,
            notes: Vec::new(),
            period: String::new(),
        }
    }

    pub fn key(&self) -> (Day, &str) {
        (self.day, &self.start)
    }

    fn merge_info(&mut self, text: String) {
        match &mut self.info {
            Some(info) => {
                info.push(' ');
                info.push_str(&text);
            }
            None => self.info = Some(text),
        }
    }

    /// Distribute the group's remaining lines over the role schema, or keep
    /// them as notes when the group size does not match it.
    fn apply_roles(&mut self, rest: Vec<String>) {
        if rest.len() + 1 != ROLE_SCHEMA.len() {
            self.notes = rest;
            return;
        }
        for (role, text) in ROLE_SCHEMA.iter().skip(1).zip(rest) {
            match role {
                Role::Instructor => self.instructor = Some(text),
                Role::Location => self.location = Some(text),
                Role::Subject => self.subject = text,
            }
        }
    }
}

// Records stay flat: notes serialize as one `; `-joined field.
fn join_notes<S: Serializer>(notes: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&notes.join("; "))
}

/// Rejoin whitespace-split tokens, putting `", "` before any token whose
/// successor is longer than three characters.
///
/// Short course codes followed by a longer word (`"MA1 MA2 Lecture"`) become
/// `"MA1 MA2, Lecture"`.
pub fn normalize_text(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out = String::with_capacity(text.len() + tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        out.push_str(token);
        match tokens.get(i + 1) {
            Some(next) if next.chars().count() > 3 => out.push_str(", "),
            Some(_) => out.push(' '),
            None => {}
        }
    }

    out
}

/// Group placed cells into entries keyed by `(day, start)`.
///
/// Time labels and cells without a full grid position are skipped. Entry
/// order follows the first fragment of each group.
pub fn aggregate(cells: &[PlacedFragment], mode: FieldMode) -> Vec<LessonEntry> {
    let mut entries: Vec<LessonEntry> = Vec::new();
    let mut index: HashMap<(Day, String), usize> = HashMap::new();
    let mut pending: Vec<Vec<String>> = Vec::new();

    for cell in cells.iter().filter(|c| !c.fragment.is_time_label()) {
        let Some((day, start, end)) = cell.slot() else {
            continue;
        };
        let text = normalize_text(&cell.fragment.text);

        match index.get(&(day, start.to_string())) {
            Some(&i) => match mode {
                FieldMode::Merged => entries[i].merge_info(text),
                FieldMode::Roles => pending[i].push(text),
            },
            None => {
                index.insert((day, start.to_string()), entries.len());
                entries.push(LessonEntry::new(day, start, end, text));
                pending.push(Vec::new());
            }
        }
    }

    if mode == FieldMode::Roles {
        for (entry, rest) in entries.iter_mut().zip(pending) {
            entry.apply_roles(rest);
        }
    }

    entries
}

/// Attach the shared period label to every entry.
pub fn stamp_period(entries: &mut [LessonEntry], period: &str) {
    for entry in entries {
        entry.period = period.to_string();
    }
}
