//! Pre-rendered markup passthrough.
//!
//! Reads page markup that an external renderer already produced (for
//! example a PDF page exported as positioned HTML).

use std::path::Path;

use anyhow::{Context, Result};

use super::{PageRenderer, RenderedPage};

/// Loads positioned markup from disk without transformation.
pub struct MarkupRenderer;

impl PageRenderer for MarkupRenderer {
    fn extensions(&self) -> &[&str] {
        &["html", "htm", "xhtml"]
    }

    fn render_page(&self, path: &Path) -> Result<RenderedPage> {
        let start = std::time::Instant::now();
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

        Ok(RenderedPage {
            markup: String::from_utf8_lossy(&bytes).to_string(),
            page_count: None,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_markup_file() {
        let path = std::env::temp_dir().join(format!("timetab-markup-{}.html", std::process::id()));
        std::fs::write(&path, "<p>hello</p>\n").unwrap();

        let page = MarkupRenderer.render_page(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(page.markup, "<p>hello</p>\n");
        assert!(page.page_count.is_none());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MarkupRenderer
            .render_page(Path::new("/nonexistent/week.html"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/week.html"));
    }

    #[test]
    fn handles_non_utf8() {
        let path = std::env::temp_dir().join(format!("timetab-latin1-{}.html", std::process::id()));
        std::fs::write(&path, [0xff, 0xfe, b'M', b'o', b' ']).unwrap();

        let page = MarkupRenderer.render_page(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(page.markup.ends_with("Mo "));
    }
}
