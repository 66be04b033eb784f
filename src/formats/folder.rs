//! Folder format: directories as navigable content.
//!
//! Directories become containers, files become leaves carrying a collapsed
//! one-line preview and a human-readable size. Build artifacts and caches
//! are skipped, binary files are named but never read. Listing order is
//! directories first, then files, both alphabetical, and every emitted line
//! gets a synthetic sequential line number so output ordering works like any
//! other format.

use crate::config::Config;
use crate::dom::{BodyLine, Node, NodeKind, OutputLine};
use crate::engine::truncate_smart;
use crate::error::{Error, Result};
use crate::formats::Format;
use std::fs;
use std::path::Path;

/// Directory names skipped during the walk (caches, build artifacts).
const SKIP_PATTERNS: &[&str] = &[
    "__pycache__",
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "target",
    ".DS_Store",
    "*.egg-info",
];

/// Extensions treated as binary: named in the listing, never read.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "pdf", "doc", "docx", "xls", "xlsx",
    "zip", "tar", "gz", "bz2", "7z", "rar", "exe", "dll", "so", "dylib", "pyc", "class",
    "woff", "woff2", "ttf", "eot", "mp3", "mp4", "wav", "ogg", "webm", "avi", "mov",
    "sqlite", "db",
];

/// Directory walker with content previews.
pub struct FolderFormat {
    dir_weight: f64,
    file_weight: f64,
    max_depth: usize,
    preview_chars: usize,
    max_read_bytes: usize,
}

impl FolderFormat {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            dir_weight: cfg.container_weight,
            file_weight: cfg.text_weight,
            max_depth: 10,
            preview_chars: 40,
            max_read_bytes: 10_240,
        }
    }

    /// Parse a directory path into a tree. This is the folder counterpart of
    /// [`Format::parse`], which cannot apply since a listing has no content
    /// to hand in.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or is not a directory.
    pub fn parse_path(&self, path: &Path) -> Result<Node> {
        if !path.is_dir() {
            return Err(Error::Parse(format!(
                "not a directory: {}",
                path.display()
            )));
        }
        let mut counter = 0u32;
        let mut root = self.parse_directory(path, 0, &mut counter);
        root.seal();
        Ok(root)
    }

    fn parse_directory(&self, path: &Path, depth: usize, counter: &mut u32) -> Node {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        *counter += 1;
        let mut node = Node::new(if depth == 0 {
            NodeKind::Root
        } else {
            NodeKind::Container
        });
        node.name = name.clone();
        node.signature = format!("{}{}/", "  ".repeat(depth), name);
        node.weight = self.dir_weight;
        node.body = vec![BodyLine {
            number: *counter,
            text: node.signature.clone(),
        }];

        if depth >= self.max_depth {
            return node;
        }

        let Ok(entries) = fs::read_dir(path) else {
            return node;
        };
        let mut entries: Vec<_> = entries.filter_map(std::result::Result::ok).collect();
        entries.sort_by_key(|e| (!e.path().is_dir(), e.file_name()));

        for entry in entries {
            let entry_path = entry.path();
            let entry_name = entry.file_name().to_string_lossy().into_owned();
            if entry_path.is_symlink() || should_skip(&entry_name) {
                continue;
            }
            if entry_path.is_dir() {
                node.add_child(self.parse_directory(&entry_path, depth + 1, counter));
            } else if entry_path.is_file() {
                if let Some(file) = self.parse_file(&entry_path, depth + 1, counter) {
                    node.add_child(file);
                }
            }
        }
        node
    }

    fn parse_file(&self, path: &Path, depth: usize, counter: &mut u32) -> Option<Node> {
        let size = path.metadata().ok()?.len();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let indent = "  ".repeat(depth);
        let size_str = format_size(size);

        let text = if is_binary(path) {
            format!("{indent}{name} [binary] [{size_str}]")
        } else if let Some(preview) = self.read_preview(path) {
            format!("{indent}{name} - {preview} [{size_str}]")
        } else {
            format!("{indent}{name} [{size_str}]")
        };

        *counter += 1;
        let mut node = Node::new(NodeKind::TextBlock);
        node.signature = format!("{indent}{name} [{size_str}]");
        node.weight = self.file_weight;
        node.atomic = true;
        node.body = vec![BodyLine {
            number: *counter,
            text,
        }];
        node.name = name;
        Some(node)
    }

    /// Head of the file collapsed to one line: whitespace runs become single
    /// spaces, then head-truncated to the preview width.
    fn read_preview(&self, path: &Path) -> Option<String> {
        let bytes = fs::read(path).ok()?;
        let head = &bytes[..bytes.len().min(self.max_read_bytes)];
        let text = String::from_utf8_lossy(head);

        let mut collapsed = String::with_capacity(self.preview_chars);
        let mut last_space = true;
        for c in text.chars() {
            if collapsed.len() >= self.preview_chars {
                break;
            }
            if c.is_whitespace() {
                if !last_space {
                    collapsed.push(' ');
                    last_space = true;
                }
            } else {
                collapsed.push(c);
                last_space = false;
            }
        }
        let collapsed = collapsed.trim().to_string();
        (!collapsed.is_empty()).then_some(collapsed)
    }
}

impl Format for FolderFormat {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn parse(&self, _content: &str) -> Result<Node> {
        Err(Error::Parse(
            "folder format parses paths, not content".to_string(),
        ))
    }

    fn render(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        let line = node.body.first()?;
        let at = f64::from(line.number);
        if line.text.len() <= budget {
            return Some(vec![OutputLine::new(at, line.text.clone())]);
        }
        if node.signature.len() <= budget {
            return Some(vec![OutputLine::new(at, node.signature.clone())]);
        }
        if !node.name.is_empty() && node.name.len() <= budget {
            return Some(vec![OutputLine::new(at, node.name.clone())]);
        }
        if budget >= 10 {
            return Some(vec![OutputLine::new(
                at,
                truncate_smart(&line.text, budget, true),
            )]);
        }
        None
    }
}

fn should_skip(name: &str) -> bool {
    SKIP_PATTERNS.iter().any(|p| {
        p.strip_prefix('*')
            .map_or(*p == name, |suffix| name.ends_with(suffix))
    })
}

fn is_binary(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| BINARY_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Human-readable size: `120 bytes`, `2.3 KB`, `4.0 MB`, `1.2 GB`.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} bytes")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else {
        format!("{:.1} GB", b / (KB * KB * KB))
    }
}

#[cfg(test)]
#[path = "../tests/folder.rs"]
mod tests;
