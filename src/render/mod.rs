//! Page rendering: source document → positioned text markup.
//!
//! Each renderer implements [`PageRenderer`] and produces markup for the
//! first page of a document, one absolutely-positioned text run per line.
//! [`RendererRouter`] picks the renderer by file extension.
//!
//! # Supported Inputs
//!
//! | Extension | Renderer | Feature Flag |
//! |-----------|----------|-------------|
//! | `.html`, `.htm`, `.xhtml` | [`MarkupRenderer`] | always |
//! | `.pdf` | [`PdfiumRenderer`] | `pdf` |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use timetab::render::RendererRouter;
//!
//! let router = RendererRouter::new();
//! let page = router.render(Path::new("week41.html")).unwrap();
//! assert!(page.markup.contains("pt\""));
//! ```

pub mod layout;
pub mod markup;
#[cfg(feature = "pdf")]
pub mod pdf;

use std::path::Path;

use anyhow::{bail, Result};

pub use markup::MarkupRenderer;
#[cfg(feature = "pdf")]
pub use pdf::PdfiumRenderer;

/// Positioned markup for one rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// One positioned text run per line.
    pub markup: String,
    /// Number of pages in the source document, when known.
    pub page_count: Option<usize>,
    /// Rendering time in milliseconds.
    pub elapsed_ms: f64,
}

/// Renders the first page of a document as positioned markup.
///
/// Implementations are stateless and synchronous.
pub trait PageRenderer: Send + Sync {
    /// File extensions this renderer accepts, lowercase, without the dot.
    fn extensions(&self) -> &[&str];

    /// Render page 0 of the document at `path`.
    fn render_page(&self, path: &Path) -> Result<RenderedPage>;
}

/// Routes documents to the appropriate [`PageRenderer`] by extension.
pub struct RendererRouter {
    renderers: Vec<Box<dyn PageRenderer>>,
}

impl RendererRouter {
    /// Create a router with all available renderers.
    ///
    /// The PDF renderer is included only when the `pdf` feature is enabled.
    pub fn new() -> Self {
        #[cfg(feature = "pdf")]
        let renderers: Vec<Box<dyn PageRenderer>> =
            vec![Box::new(pdf::PdfiumRenderer::new()), Box::new(MarkupRenderer)];

        #[cfg(not(feature = "pdf"))]
        let renderers: Vec<Box<dyn PageRenderer>> = vec![Box::new(MarkupRenderer)];

        Self { renderers }
    }

    /// Find a renderer for `path` and render its first page.
    pub fn render(&self, path: &Path) -> Result<RenderedPage> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        for renderer in &self.renderers {
            if renderer.extensions().iter().any(|e| *e == ext) {
                return renderer.render_page(path);
            }
        }

        if ext == "pdf" {
            bail!(
                "cannot render {}: built without the `pdf` feature; export the page as positioned HTML instead",
                path.display()
            );
        }
        bail!("no renderer for {} (unknown extension {ext:?})", path.display())
    }
}

impl Default for RendererRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_dispatches_html_case_insensitively() {
        let path = std::env::temp_dir().join(format!("timetab-router-{}.HTML", std::process::id()));
        std::fs::write(&path, "markup").unwrap();

        let page = RendererRouter::new().render(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(page.markup, "markup");
    }

    #[test]
    fn router_rejects_unknown_extension() {
        let err = RendererRouter::new()
            .render(Path::new("week.docx"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown extension"));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn router_explains_missing_pdf_feature() {
        let err = RendererRouter::new()
            .render(Path::new("week.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("`pdf` feature"));
    }
}
