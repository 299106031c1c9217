//! Timetable serialization for the CLI.

use anyhow::Result;

use crate::schedule::{LessonEntry, Timetable};

/// Output formats for parsed timetables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Flat JSON records, one per lesson
    #[default]
    Json,
    /// GitHub-flavored markdown table
    Markdown,
    /// Dotted key/value listing, one block per lesson
    Text,
}

/// Render one or more timetables.
pub fn render(timetables: &[Timetable], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<&LessonEntry> = timetables.iter().flat_map(|t| &t.entries).collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Markdown => Ok(timetables.iter().map(to_markdown).collect::<Vec<_>>().join("\n")),
        OutputFormat::Text => Ok(timetables
            .iter()
            .flat_map(|t| &t.entries)
            .map(to_text_block)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

const COLUMNS: [&str; 6] = ["Day", "Start", "End", "Subject", "Details", "Period"];

/// Render a timetable as a GitHub-flavored markdown table.
pub fn to_markdown(timetable: &Timetable) -> String {
    if timetable.entries.is_empty() {
        return String::new();
    }

    let mut md = String::new();

    // Header row
    md.push('|');
    for col in COLUMNS {
        md.push_str(&format!(" {col} |"));
    }
    md.push('\n');

    // Separator row
    md.push('|');
    for _ in COLUMNS {
        md.push_str(" --- |");
    }
    md.push('\n');

    // Data rows
    for entry in &timetable.entries {
        let details = details(entry);
        let row: [&str; 6] = [
            entry.day.code(),
            &entry.start,
            &entry.end,
            &entry.subject,
            &details,
            &entry.period,
        ];
        md.push('|');
        for cell in row {
            md.push_str(&format!(" {} |", cell.replace('|', "\\|")));
        }
        md.push('\n');
    }

    md
}

/// Everything after the subject, joined for a single column.
fn details(entry: &LessonEntry) -> String {
    entry
        .info
        .iter()
        .chain(&entry.instructor)
        .chain(&entry.location)
        .chain(&entry.notes)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One lesson as aligned `KEY . . . value` lines.
pub fn to_text_block(entry: &LessonEntry) -> String {
    let mut fields = vec![
        ("LESSON", entry.subject.clone()),
        ("WHEN_START", entry.start.clone()),
        ("WHEN_END", entry.end.clone()),
        ("DAY", entry.day.to_string()),
    ];
    if let Some(info) = &entry.info {
        fields.push(("INFO", info.clone()));
    }
    if let Some(instructor) = &entry.instructor {
        fields.push(("INSTRUCTOR", instructor.clone()));
    }
    if let Some(location) = &entry.location {
        fields.push(("LOCATION", location.clone()));
    }
    if !entry.notes.is_empty() {
        fields.push(("NOTES", entry.notes.join("; ")));
    }
    fields.push(("PERIOD", entry.period.clone()));

    let mut block = String::new();
    for (key, value) in fields {
        block.push_str(&dotted_line(key, &value));
        block.push('\n');
    }
    block
}

/// Pad `key` with a `. ` leader so values line up at column 14.
fn dotted_line(key: &str, value: &str) -> String {
    let odd = key.len() % 2;
    let dots = 7usize.saturating_sub(key.len() / 2 + odd);
    format!("{key}{}{}{value}", " ".repeat(odd), ". ".repeat(dots))
}
