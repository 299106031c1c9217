//! Positioned-character layout: lines, runs and page markup.
//!
//! Turns raw character boxes into the positioned markup consumed by
//! [`crate::schedule::extract_fragments`]:
//!
//! ```text
//! chars → lines (same baseline) → runs (split at column gaps) → markup lines
//! ```
//!
//! Coordinates are top-down points, as in the markup.

use std::cmp::Ordering;
use std::fmt::Write as _;

/// A positioned character from the rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfChar {
    pub ch: char,
    /// Left edge in points (1pt = 1/72 inch).
    pub x: f32,
    /// Top edge in points, measured down from the top of the page.
    pub y: f32,
    pub width: f32,
    /// Glyph height, used as the font size.
    pub height: f32,
}

/// Characters sharing one visual line, left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub chars: Vec<PdfChar>,
}

impl TextLine {
    /// Build a line, ordering characters left to right.
    pub fn from_chars(mut chars: Vec<PdfChar>) -> Self {
        chars.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        Self { chars }
    }
}

/// A horizontally contiguous piece of a line; becomes one fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub size: f32,
}

impl TextRun {
    /// Render as one absolutely-positioned markup line.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_markup_line(&self) -> String {
        format!(
            r#"<p style="position:absolute;white-space:pre;margin:0;padding:0;top:{}pt;left:{}pt"><span style="font-family:Arial,serif;font-size:{}pt">{}</span></p>"#,
            self.top.round() as i32,
            self.left.round() as i32,
            self.size.round() as i32,
            escape_markup(&self.text)
        )
    }
}

/// Gap (in average character widths) that separates two runs on a line.
const RUN_GAP_FACTOR: f32 = 2.0;

/// Gap (in average character widths) rendered as a space inside a run.
const SPACE_GAP_FACTOR: f32 = 0.3;

/// Group characters into lines.
///
/// 1. Sort top-to-bottom, then left-to-right.
/// 2. Characters whose top edge is within 40% of the first glyph's height
///    of the previous character share a line.
pub fn reconstruct_lines(chars: &[PdfChar]) -> Vec<TextLine> {
    let Some(first) = chars.first() else {
        return Vec::new();
    };

    let mut sorted = chars.to_vec();
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let line_tolerance = first.height * 0.4;
    let mut lines = Vec::new();
    let mut current: Vec<PdfChar> = Vec::new();

    for ch in sorted {
        if let Some(last) = current.last() {
            if (ch.y - last.y).abs() >= line_tolerance {
                lines.push(TextLine::from_chars(std::mem::take(&mut current)));
            }
        }
        current.push(ch);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_chars(current));
    }

    lines
}

/// Split a line into runs at gaps wider than [`RUN_GAP_FACTOR`] average
/// character widths, inserting spaces at smaller gaps.
#[allow(clippy::cast_precision_loss)]
pub fn split_runs(line: &TextLine) -> Vec<TextRun> {
    let Some(first) = line.chars.first() else {
        return Vec::new();
    };

    let avg_width = line.chars.iter().map(|c| c.width).sum::<f32>() / line.chars.len() as f32;
    let run_gap = avg_width * RUN_GAP_FACTOR;
    let space_gap = avg_width * SPACE_GAP_FACTOR;

    let mut runs = Vec::new();
    let mut run = TextRun {
        text: String::new(),
        left: first.x,
        top: first.y,
        size: first.height,
    };

    for (i, ch) in line.chars.iter().enumerate() {
        if i > 0 {
            let prev = &line.chars[i - 1];
            let gap = ch.x - (prev.x + prev.width);
            if gap > run_gap {
                let next = TextRun {
                    text: String::new(),
                    left: ch.x,
                    top: ch.y,
                    size: ch.height,
                };
                runs.push(std::mem::replace(&mut run, next));
            } else if gap > space_gap {
                run.text.push(' ');
            }
        }
        run.text.push(ch.ch);
        run.top = run.top.min(ch.y);
        run.size = run.size.max(ch.height);
    }
    runs.push(run);

    runs
}

/// Render a whole page as positioned markup, one run per line.
#[allow(clippy::cast_possible_truncation)]
pub fn render_markup(chars: &[PdfChar], width: f32, height: f32) -> String {
    let mut markup = String::new();
    let _ = writeln!(
        markup,
        r#"<div id="page0" style="width:{}pt;height:{}pt">"#,
        width.round() as i32,
        height.round() as i32
    );

    for line in reconstruct_lines(chars) {
        for run in split_runs(&line) {
            markup.push_str(&run.to_markup_line());
            markup.push('\n');
        }
    }

    markup.push_str("</div>\n");
    markup
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
