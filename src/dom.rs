//! Tree model shared by every format.
//!
//! All parsed content becomes a tree of [`Node`]s: a node owns its raw source
//! lines and its children, and carries the precise line coordinates needed to
//! keep compressed output in source order. The compression pass reads the
//! tree without mutating it; elision is represented by transient fold-marker
//! nodes and by marker lines in the output.

/// Structural role of a node, a closed set shared by all formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Top of the tree; never rendered itself.
    Root,
    /// Grouping node with a header line (class, directory).
    Container,
    /// Heading-delimited or marker-delimited block (markdown section, mind map node).
    Section,
    /// Callable unit (function or method).
    Definition,
    /// Leaf block of plain lines.
    TextBlock,
    /// Collapsed run of import statements.
    Import,
    /// Transient stand-in for elided content.
    FoldMarker,
}

/// One raw source line with its 1-indexed position.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyLine {
    /// Line number in the original source (1-indexed).
    pub number: u32,
    /// Line text without trailing newline.
    pub text: String,
}

/// Inclusive 1-indexed line range covered by a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSpan {
    /// First source line of the node.
    pub start: u32,
    /// Last source line of the node.
    pub end: u32,
}

impl LineSpan {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// A structural unit of parsed content.
///
/// Children are disjoint in span and sorted ascending by start line; a node's
/// span encloses all descendant spans. Every non-blank source line is owned
/// by exactly one node's `body`.
#[derive(Clone, Debug)]
pub struct Node {
    /// Structural role.
    pub kind: NodeKind,
    /// Short label used at the coarsest detail level (identifier, heading text).
    pub name: String,
    /// Dense one-line form (function prototype, `# heading`, `dirname/`).
    /// Empty for nodes with no header of their own.
    pub signature: String,
    /// First docstring line, led with at mid detail. Formats whose line
    /// sampling already keeps a block's opening line leave this empty.
    pub preview: String,
    /// Raw source lines owned by this node (not by its children).
    pub body: Vec<BodyLine>,
    /// Source range covered by this node and its descendants.
    pub span: LineSpan,
    /// Child nodes in source order.
    pub children: Vec<Node>,
    /// Distance from the root, assigned by [`Node::seal`].
    pub depth: u32,
    /// Format-assigned importance multiplier (classes above imports, etc.).
    pub weight: f64,
    /// Pre-optimized content that must only ever be tail-truncated
    /// (file previews, fenced code).
    pub atomic: bool,
}

impl Node {
    /// Bare node of the given kind; coordinates filled in by the parser.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: String::new(),
            signature: String::new(),
            preview: String::new(),
            body: Vec::new(),
            span: LineSpan::new(0, 0),
            children: Vec::new(),
            depth: 0,
            weight: 1.0,
            atomic: false,
        }
    }

    /// Root node spanning the whole source.
    #[must_use]
    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    /// Transient marker standing in for `count` elided source lines.
    #[must_use]
    pub fn fold(count: usize, span: LineSpan) -> Self {
        let mut node = Self::new(NodeKind::FoldMarker);
        node.signature = fold_marker_text(count);
        node.span = span;
        node
    }

    /// Append a child, keeping source order.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Total characters of every body line in this subtree.
    #[must_use]
    pub fn subtree_chars(&self) -> usize {
        let own: usize = self.body.iter().map(|l| l.text.len()).sum();
        own + self.children.iter().map(Node::subtree_chars).sum::<usize>()
    }

    /// Visit every body line in the subtree, depth-first in source order.
    pub fn for_each_line<F: FnMut(&BodyLine)>(&self, f: &mut F) {
        for line in &self.body {
            f(line);
        }
        for child in &self.children {
            child.for_each_line(f);
        }
    }

    /// First body line anywhere in the subtree, in source order.
    #[must_use]
    pub fn first_line(&self) -> Option<&BodyLine> {
        if let Some(line) = self.body.first() {
            return Some(line);
        }
        self.children.iter().find_map(Node::first_line)
    }

    /// Assign depths and tighten spans bottom-up. Parsers call this once on
    /// the finished root; the tree is immutable afterwards.
    pub fn seal(&mut self) {
        self.seal_at(0);
    }

    fn seal_at(&mut self, depth: u32) {
        self.depth = depth;
        for child in &mut self.children {
            child.seal_at(depth + 1);
        }
        let mut start = self.body.first().map(|l| l.number);
        let mut end = self.body.last().map(|l| l.number);
        for child in &self.children {
            if child.span.start > 0 {
                start = Some(start.map_or(child.span.start, |s| s.min(child.span.start)));
                end = Some(end.map_or(child.span.end, |e| e.max(child.span.end)));
            }
        }
        if let (Some(s), Some(e)) = (start, end) {
            self.span = LineSpan::new(s, e);
        }
    }

    /// Restrict the tree to a line range, with fractional endpoints cutting
    /// into the boundary lines (`80.5` keeps the first half of line 80).
    ///
    /// Returns `None` when nothing survives the range.
    #[must_use]
    pub fn prune_range(&self, start: f64, end: f64) -> Option<Node> {
        let first = start.floor().max(1.0) as u32;
        let last = end.floor() as u32;

        let mut pruned = self.clone();
        pruned.children.clear();
        pruned.body.retain(|l| l.number >= first && l.number <= last);

        for line in &mut pruned.body {
            if line.number == first && start.fract() > 0.0 {
                let cut = boundary(&line.text, (start.fract() * line.text.len() as f64) as usize);
                line.text = line.text[cut..].to_string();
            }
            if line.number == last && end.fract() > 0.0 {
                let keep = boundary(&line.text, (end.fract() * line.text.len() as f64) as usize);
                line.text.truncate(keep);
            }
        }

        for child in &self.children {
            if child.span.end < first || child.span.start > last {
                continue;
            }
            if let Some(kept) = child.prune_range(start, end) {
                pruned.children.push(kept);
            }
        }

        if pruned.body.is_empty() && pruned.children.is_empty() {
            return None;
        }
        // A header whose own line fell outside the range must not re-emit it.
        if pruned.body.is_empty() && !self.body.is_empty() {
            pruned.signature.clear();
        }
        Some(pruned)
    }
}

/// A line of compressed output.
///
/// `line` is the source line number, fractional for synthetic content: a fold
/// marker for lines `a..=b` sits at `a - 0.5`, and wrapped continuations of
/// line `n` take `n + offset/len`. The comparator is numeric, never textual.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputLine {
    /// Source position, fractional for synthetic lines.
    pub line: f64,
    /// Rendered text without trailing newline.
    pub text: String,
}

impl OutputLine {
    #[must_use]
    pub fn new(line: f64, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// Printable address: integers stay bare, fractions keep up to two
    /// decimals with trailing zeros trimmed (`42`, `42.5`, `42.25`).
    #[must_use]
    pub fn address(&self) -> String {
        if self.line.fract().abs() < 1e-9 {
            format!("{}", self.line as i64)
        } else {
            let mut s = format!("{:.2}", self.line);
            while s.ends_with('0') {
                s.pop();
            }
            s
        }
    }
}

/// Nearest char boundary at or below `at`.
fn boundary(s: &str, at: usize) -> usize {
    let mut i = at.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Canonical text of a fold marker covering `count` elided items.
#[must_use]
pub fn fold_marker_text(count: usize) -> String {
    format!("[...{count} more...]")
}

/// Parse a fold marker's elided count back out of its text, if it is one.
#[must_use]
pub fn parse_fold_marker(text: &str) -> Option<usize> {
    let inner = text.strip_prefix("[...")?.strip_suffix(" more...]")?;
    inner.parse().ok()
}

#[cfg(test)]
#[path = "tests/dom.rs"]
mod tests;
