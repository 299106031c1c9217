//! Fragment extraction from positioned page markup.
//!
//! The rendering collaborator emits one markup line per text run, e.g.
//!
//! ```text
//! <p style="position:absolute;top:112pt;left:96pt"><span style="font-size:9pt">Math</span></p>
//! ```
//!
//! Each line that carries all three fields (text, left, top) becomes a
//! [`Fragment`]. Anything else (page wrappers, images, runs with characters
//! outside the text pattern) is skipped and only counted.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"pt">([\w\d /:)(\-]+)</span></p>$"#).expect("valid text pattern")
});

static LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"left:(\d+)pt""#).expect("valid left pattern"));

static TOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"top:(\d+)pt;").expect("valid top pattern"));

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"">Period: w(\d{1,2})</"#).expect("valid period pattern"));

static TIME_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d\d:\d\d").expect("valid time label pattern"));

/// One positioned piece of text from the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    /// Left offset in points.
    pub left: i32,
    /// Top offset in points (top-down).
    pub top: i32,
}

impl Fragment {
    pub fn new(text: impl Into<String>, left: i32, top: i32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
        }
    }

    /// Whether this fragment is a time label (`HH:MM` prefix).
    pub fn is_time_label(&self) -> bool {
        is_time_label(&self.text)
    }
}

/// Result of running the extractor over a markup document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub fragments: Vec<Fragment>,
    /// Lines that failed at least one of the three field patterns.
    pub skipped: usize,
}

/// Extract fragments from markup, one candidate per line, in document order.
pub fn extract_fragments(markup: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for line in markup.lines() {
        match parse_line(line) {
            Some(fragment) => extraction.fragments.push(fragment),
            None => extraction.skipped += 1,
        }
    }

    extraction
}

fn parse_line(line: &str) -> Option<Fragment> {
    let text = TEXT_RE.captures(line)?.get(1)?.as_str();
    let left = LEFT_RE.captures(line)?.get(1)?.as_str().parse().ok()?;
    let top = TOP_RE.captures(line)?.get(1)?.as_str().parse().ok()?;
    Some(Fragment::new(text, left, top))
}

/// Extract the shared period label (week number) from the page header.
pub fn extract_period(markup: &str) -> Option<String> {
    PERIOD_RE
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `text` starts with an `HH:MM` time label.
pub fn is_time_label(text: &str) -> bool {
    TIME_LABEL_RE.is_match(text)
}
