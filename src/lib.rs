//! `timetab` - Weekly timetable reconstruction from rendered schedule pages
//!
//! # Features
//!
//! - **Fragment extraction**: positioned text runs from page markup
//! - **Axis location**: day columns and time rows from header fragments
//! - **Grid placement**: fragments assigned to `(day, start, end)` cells
//! - **Aggregation**: multi-line cells merged into one lesson entry
//! - **PDF rendering**: first page via pdfium (`pdf` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use timetab::{parse_document, ParserConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let timetable = parse_document(Path::new("week41.html"), &ParserConfig::default())?;
//!     for lesson in &timetable.entries {
//!         println!("{} {}-{} {}", lesson.day, lesson.start, lesson.end, lesson.subject);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod output;
pub mod render;
pub mod schedule;

use std::path::Path;

use anyhow::{Context, Result};

pub use config::load_config;
pub use output::OutputFormat;
pub use render::{PageRenderer, RenderedPage, RendererRouter};
pub use schedule::{
    Day, Diagnostics, FieldMode, Fragment, LessonEntry, ParserConfig, ScheduleError,
    ScheduleParser, Timetable,
};

/// Version of timetab
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the first page of `path` and reconstruct its timetable.
///
/// The document is opened, rendered and released before parsing starts.
pub fn parse_document(path: &Path, config: &ParserConfig) -> Result<Timetable> {
    let page = RendererRouter::new().render(path)?;
    tracing::debug!(
        "Rendered {} in {:.2}ms",
        path.display(),
        page.elapsed_ms
    );

    ScheduleParser::new(config.clone())
        .parse_markup(&page.markup)
        .with_context(|| format!("failed to parse timetable from {}", path.display()))
}
