//! Weekly timetable reconstruction from positioned text fragments.
//!
//! The rendered page carries no table structure, only text runs with
//! left/top offsets. The pipeline recovers the grid geometrically:
//!
//! ```text
//! markup → fragments → day/time axes → grid placement → lesson entries
//! ```
//!
//! # Example
//!
//! ```rust
//! use timetab::schedule::{Fragment, ParserConfig, ScheduleParser};
//!
//! let config = ParserConfig { day_start: "08:00".into(), ..ParserConfig::default() };
//! let parser = ScheduleParser::new(config);
//! let fragments = vec![
//!     Fragment::new("Mo ", 20, 0),
//!     Fragment::new("09:00", 30, 100),
//!     Fragment::new("10:00", 30, 150),
//!     Fragment::new("Math", 25, 110),
//!     Fragment::new("08:00", 0, 50),
//!     Fragment::new("09:00", 0, 100),
//!     Fragment::new("10:00", 0, 150),
//!     Fragment::new("08:00", 0, 500),
//! ];
//! let timetable = parser.parse_fragments(&fragments, Some("41")).unwrap();
//! assert_eq!(timetable.entries.len(), 1);
//! assert_eq!(timetable.entries[0].subject, "Math");
//! ```

pub mod axis;
pub mod entry;
pub mod fragment;
pub mod grid;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use axis::{AxisBuild, AxisCollision, Day, DayAxis, TimeAxis};
pub use entry::{aggregate, normalize_text, stamp_period, FieldMode, LessonEntry};
pub use fragment::{extract_fragments, extract_period, Extraction, Fragment};
pub use grid::{assign, lesson_region, DropCounts, Grid, PlacedFragment};

/// Timetable reconstruction errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("period header not found in page markup")]
    MissingPeriod,

    #[error("time axis needs two '{marker}' markers, found {found}")]
    UnboundedTimeAxis { marker: String, found: usize },

    #[error("{axis} axis collision: {collision}")]
    AxisCollision {
        axis: &'static str,
        collision: AxisCollision,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// How lines after a cell's subject are stored
    pub field_mode: FieldMode,
    /// Pull-left applied to day header offsets (points)
    pub day_tolerance: i32,
    /// Time label opening (and closing) the time axis
    pub day_start: String,
    /// Treat axis collisions and an unbounded time axis as errors
    pub strict: bool,
    /// Fail when the page has no period header
    pub require_period: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            field_mode: FieldMode::Merged,
            day_tolerance: axis::DEFAULT_DAY_TOLERANCE,
            day_start: axis::DEFAULT_DAY_START.to_string(),
            strict: false,
            require_period: true,
        }
    }
}

/// What the parse had to tolerate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Markup lines without all three fragment fields.
    pub skipped_lines: usize,
    pub dropped: DropCounts,
    pub collisions: Vec<AxisCollision>,
    pub time_axis_bounded: bool,
}

/// Parsed weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    pub period: String,
    pub entries: Vec<LessonEntry>,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

/// Both axes located from one fragment sequence.
#[derive(Debug, Clone)]
pub struct Axes {
    pub days: DayAxis,
    pub times: TimeAxis,
    pub collisions: Vec<AxisCollision>,
}

/// Reconstructs timetables; holds only configuration, so parses are independent.
#[derive(Debug, Clone, Default)]
pub struct ScheduleParser {
    config: ParserConfig,
}

impl ScheduleParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one page of positioned markup.
    pub fn parse_markup(&self, markup: &str) -> Result<Timetable> {
        let extraction = extract_fragments(markup);
        debug!(
            "Extracted {} fragments, skipped {} lines",
            extraction.fragments.len(),
            extraction.skipped
        );

        let period = extract_period(markup);
        if period.is_none() && self.config.require_period {
            return Err(ScheduleError::MissingPeriod);
        }

        let mut timetable = self.parse_fragments(&extraction.fragments, period.as_deref())?;
        timetable.diagnostics.skipped_lines = extraction.skipped;
        Ok(timetable)
    }

    /// Locate day and time axes, enforcing `strict` if configured.
    pub fn locate_axes(&self, fragments: &[Fragment]) -> Result<Axes> {
        let day_build = DayAxis::locate(fragments, self.config.day_tolerance);
        let time_build = TimeAxis::locate(fragments, &self.config.day_start);

        if !time_build.axis.bounded {
            let found = fragments
                .iter()
                .filter(|f| f.text == self.config.day_start)
                .count();
            if self.config.strict {
                return Err(ScheduleError::UnboundedTimeAxis {
                    marker: self.config.day_start.clone(),
                    found,
                });
            }
            warn!(
                "Time axis unbounded: found {found} '{}' markers, need 2",
                self.config.day_start
            );
        }

        let mut collisions = Vec::new();
        for (name, build_collisions) in [("day", day_build.collisions), ("time", time_build.collisions)] {
            for collision in build_collisions {
                if self.config.strict {
                    return Err(ScheduleError::AxisCollision {
                        axis: name,
                        collision,
                    });
                }
                warn!("{name} axis collision: {collision}");
                collisions.push(collision);
            }
        }

        Ok(Axes {
            days: day_build.axis,
            times: time_build.axis,
            collisions,
        })
    }

    /// Parse an already-extracted fragment sequence.
    ///
    /// `period` is stamped on every entry; `None` leaves it empty.
    pub fn parse_fragments(&self, fragments: &[Fragment], period: Option<&str>) -> Result<Timetable> {
        let axes = self.locate_axes(fragments)?;
        debug!(
            "Located {} day columns and {} time rows",
            axes.days.len(),
            axes.times.len()
        );

        let region = lesson_region(fragments, &self.config.day_start);
        let grid = assign(region, &axes.days, &axes.times);
        if grid.dropped.total() > 0 {
            debug!(
                "Dropped {} fragments ({} outside day columns, {} outside time slots)",
                grid.dropped.total(),
                grid.dropped.no_day,
                grid.dropped.no_interval
            );
        }

        let period = period.unwrap_or_default().to_string();
        let mut entries = aggregate(&grid.cells, self.config.field_mode);
        stamp_period(&mut entries, &period);
        info!("Reconstructed {} lessons for period {period:?}", entries.len());

        Ok(Timetable {
            period,
            entries,
            diagnostics: Diagnostics {
                skipped_lines: 0,
                dropped: grid.dropped,
                collisions: axes.collisions,
                time_axis_bounded: axes.times.bounded,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(day_start: &str) -> ParserConfig {
        ParserConfig {
            day_start: day_start.into(),
            ..ParserConfig::default()
        }
    }

    /// One Monday lesson, with a separate time axis bounded by `08:00`.
    fn monday_fragments() -> Vec<Fragment> {
        vec![
            Fragment::new("Mo ", 20, 0),
            Fragment::new("09:00", 30, 100),
            Fragment::new("10:00", 30, 150),
            Fragment::new("Math", 25, 110),
            Fragment::new("08:00", 0, 50),
            Fragment::new("09:00", 0, 100),
            Fragment::new("10:00", 0, 150),
            Fragment::new("08:00", 0, 500),
        ]
    }

    fn markup_line(text: &str, left: i32, top: i32) -> String {
        format!(
            r#"<p style="position:absolute;white-space:pre;margin:0;padding:0;top:{top}pt;left:{left}pt"><span style="font-family:Arial,serif;font-size:9pt">{text}</span></p>"#
        )
    }

    #[test]
    fn end_to_end_single_lesson() {
        let parser = ScheduleParser::new(config("08:00"));
        let timetable = parser.parse_fragments(&monday_fragments(), None).unwrap();

        assert_eq!(timetable.entries.len(), 1);
        let entry = &timetable.entries[0];
        assert_eq!(entry.day, Day::Mo);
        assert_eq!(entry.start, "09:00");
        assert_eq!(entry.end, "10:00");
        assert_eq!(entry.subject, "Math");
        assert!(entry.info.is_none());
        assert!(timetable.diagnostics.time_axis_bounded);
        // the "Mo " header sits above every slot
        assert_eq!(timetable.diagnostics.dropped.no_interval, 1);
    }

    #[test]
    fn parsing_is_idempotent() {
        let parser = ScheduleParser::new(config("08:00"));
        let fragments = monday_fragments();
        let first = parser.parse_fragments(&fragments, Some("41")).unwrap();
        let second = parser.parse_fragments(&fragments, Some("41")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn roles_mode_populates_all_fields() {
        let parser = ScheduleParser::new(ParserConfig {
            field_mode: FieldMode::Roles,
            ..config("08:00")
        });
        let fragments = vec![
            Fragment::new("Mo ", 20, 0),
            Fragment::new("09:00", 30, 100),
            Fragment::new("09:50", 30, 140),
            Fragment::new("Math", 25, 110),
            Fragment::new("Smith", 25, 120),
            Fragment::new("Room 1", 25, 130),
            Fragment::new("08:00", 0, 50),
            Fragment::new("09:00", 0, 100),
            Fragment::new("09:50", 0, 140),
            Fragment::new("08:00", 0, 500),
        ];

        let timetable = parser.parse_fragments(&fragments, Some("41")).unwrap();
        assert_eq!(timetable.entries.len(), 1);
        let entry = &timetable.entries[0];
        assert_eq!(entry.end, "09:50");
        assert_eq!(entry.subject, "Math");
        assert_eq!(entry.instructor.as_deref(), Some("Smith"));
        assert_eq!(entry.location.as_deref(), Some("Room 1"));
        assert_eq!(entry.period, "41");
    }

    #[test]
    fn unbounded_axis_is_lenient_by_default() {
        let parser = ScheduleParser::new(config("07:00"));
        let timetable = parser.parse_fragments(&monday_fragments(), None).unwrap();
        assert!(timetable.entries.is_empty());
        assert!(!timetable.diagnostics.time_axis_bounded);
    }

    #[test]
    fn unbounded_axis_fails_in_strict_mode() {
        let parser = ScheduleParser::new(ParserConfig {
            strict: true,
            ..config("07:00")
        });
        let err = parser.parse_fragments(&monday_fragments(), None).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::UnboundedTimeAxis { found: 0, .. }
        ));
    }

    #[test]
    fn collisions_recorded_or_rejected() {
        let mut fragments = monday_fragments();
        fragments.insert(1, Fragment::new("Tu ", 20, 0));

        let lenient = ScheduleParser::new(config("08:00"));
        let timetable = lenient.parse_fragments(&fragments, None).unwrap();
        assert_eq!(timetable.diagnostics.collisions.len(), 1);
        assert_eq!(timetable.entries[0].day, Day::Tu);

        let strict = ScheduleParser::new(ParserConfig {
            strict: true,
            ..config("08:00")
        });
        let err = strict.parse_fragments(&fragments, None).unwrap_err();
        assert!(matches!(err, ScheduleError::AxisCollision { axis: "day", .. }));
    }

    #[test]
    fn markup_without_period_fails_when_required() {
        let markup = markup_line("Math", 25, 110);
        let err = ScheduleParser::default().parse_markup(&markup).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingPeriod));
    }

    #[test]
    fn markup_without_period_allowed_when_optional() {
        let parser = ScheduleParser::new(ParserConfig {
            require_period: false,
            ..config("08:00")
        });
        let markup = monday_fragments()
            .iter()
            .map(|f| markup_line(&f.text, f.left, f.top))
            .collect::<Vec<_>>()
            .join("\n");
        let timetable = parser.parse_markup(&markup).unwrap();
        assert_eq!(timetable.period, "");
        assert_eq!(timetable.entries.len(), 1);
    }

    #[test]
    fn markup_parse_counts_skipped_lines() {
        let mut lines = vec![
            r#"<div id="page0" style="width:595pt;height:842pt">"#.to_string(),
            markup_line("Period: w41", 400, 10),
        ];
        lines.extend(monday_fragments().iter().map(|f| markup_line(&f.text, f.left, f.top)));
        lines.push("</div>".into());

        let parser = ScheduleParser::new(config("08:00"));
        let timetable = parser.parse_markup(&lines.join("\n")).unwrap();
        assert_eq!(timetable.period, "41");
        assert_eq!(timetable.entries[0].period, "41");
        assert_eq!(timetable.diagnostics.skipped_lines, 2);
    }

    #[test]
    fn config_defaults_match_page_layout() {
        let config = ParserConfig::default();
        assert_eq!(config.day_tolerance, 15);
        assert_eq!(config.day_start, "09:00");
        assert_eq!(config.field_mode, FieldMode::Merged);
        assert!(config.require_period);
        assert!(!config.strict);
    }
}
