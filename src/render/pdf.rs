//! PDF page rendering via `pdfium-render` (Chromium's PDF library).
//!
//! Opens the document, takes the first page, extracts character boxes and
//! lays them out as positioned markup. The document handle lives only for
//! the duration of one call.
//!
//! # Pipeline
//!
//! ```text
//! PDF file → pdfium char extraction (page 0) → lines → runs → markup
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use pdfium_render::prelude::*;
use tracing::debug;

use super::layout::{render_markup, PdfChar};
use super::{PageRenderer, RenderedPage};

/// Renders the first page of a PDF as positioned markup.
pub struct PdfiumRenderer;

impl PdfiumRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Extract the first page's characters in top-down coordinates.
    ///
    /// Returns the characters, the page size and the document's page count.
    #[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
    fn extract_chars(path: &Path) -> Result<(Vec<PdfChar>, (f32, f32), usize)> {
        let pdfium = Pdfium::default();
        let doc = pdfium
            .load_pdf_from_file(path, None)
            .with_context(|| format!("Failed to parse PDF {}", path.display()))?;
        let page_count = doc.pages().len() as usize;
        let page = doc.pages().get(0).context("PDF has no pages")?;
        let (width, height) = (page.width().value, page.height().value);

        let text = page.text().context("Failed to extract text from page")?;
        let mut chars = Vec::new();
        for ch in text.chars().iter() {
            if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
                if unicode_ch.is_whitespace() {
                    continue;
                }
                chars.push(PdfChar {
                    ch: unicode_ch,
                    x: rect.left.value,
                    y: height - rect.top.value,
                    width: (rect.right.value - rect.left.value).abs(),
                    height: (rect.top.value - rect.bottom.value).abs(),
                });
            }
        }

        Ok((chars, (width, height), page_count))
    }
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for PdfiumRenderer {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn render_page(&self, path: &Path) -> Result<RenderedPage> {
        let start = std::time::Instant::now();

        let (chars, (width, height), page_count) = Self::extract_chars(path)?;
        if page_count > 1 {
            debug!("{} has {page_count} pages, rendering the first", path.display());
        }
        if chars.is_empty() {
            anyhow::bail!(
                "{} has no text layer on its first page (scanned PDF?)",
                path.display()
            );
        }

        Ok(RenderedPage {
            markup: render_markup(&chars, width, height),
            page_count: Some(page_count),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_is_pdf() {
        assert_eq!(PdfiumRenderer::new().extensions(), &["pdf"]);
    }
}
