//! Format trait and implementations for different content types.
//!
//! A format knows how to parse raw content into the shared tree model and how
//! to render a single node into a budget. The registry picks a format by
//! extension first, then by content sniffing, falling back to plain text. The
//! engine itself is format-agnostic: it only walks nodes and calls `render`.

pub mod folder;
pub mod markdown;
pub mod mindmap;
pub mod python;
pub mod text;

use crate::config::Config;
use crate::dom::{Node, OutputLine};
use crate::error::Result;

pub trait Format {
    /// Name used by `--type` to force this format.
    fn name(&self) -> &'static str;

    /// File extensions this format claims (with leading dot).
    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Content sniffing for formats without a telling extension.
    fn detect(&self, _content: &str) -> bool {
        false
    }

    /// Parse content into a tree honoring the model invariants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Parse`] when the content cannot yield a
    /// valid tree (formats are expected to degrade rather than fail where
    /// they can).
    fn parse(&self, content: &str) -> Result<Node>;

    /// Render a leaf node at the densest detail level fitting `budget`, or
    /// `None` when even the coarsest form does not fit (the caller folds).
    fn render(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>>;
}

/// Registry of available formats with detection and `--type` lookup.
pub struct Registry {
    formats: Vec<Box<dyn Format>>,
}

impl Registry {
    /// All built-in formats, text first so it doubles as the fallback.
    #[must_use]
    pub fn with_defaults(cfg: &Config) -> Self {
        Self {
            formats: vec![
                Box::new(text::TextFormat::new(cfg)),
                Box::new(python::PythonFormat::new(cfg)),
                Box::new(markdown::MarkdownFormat::new(cfg)),
                Box::new(mindmap::MindMapFormat::new(cfg)),
                Box::new(folder::FolderFormat::new(cfg)),
            ],
        }
    }

    /// Look a format up by its `--type` name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn Format> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| &**f)
    }

    /// Look a format up by file extension, with or without the leading dot.
    #[must_use]
    pub fn by_extension(&self, ext: &str) -> Option<&dyn Format> {
        let dotted = if ext.starts_with('.') {
            ext.to_lowercase()
        } else {
            format!(".{}", ext.to_lowercase())
        };
        self.formats
            .iter()
            .find(|f| f.extensions().contains(&dotted.as_str()))
            .map(|f| &**f)
    }

    /// Pick the best format: extension match, then content sniffing, then
    /// the text fallback.
    #[must_use]
    pub fn select(&self, content: &str, filename: Option<&str>) -> &dyn Format {
        if let Some(name) = filename {
            if let Some(ext) = name.rsplit_once('.').map(|(_, e)| e) {
                if let Some(format) = self.by_extension(ext) {
                    return format;
                }
            }
        }
        for format in &self.formats {
            if format.detect(content) {
                return &**format;
            }
        }
        &*self.formats[0]
    }
}

#[cfg(test)]
#[path = "tests/formats.rs"]
mod tests;
