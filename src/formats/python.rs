//! Python format: module structure without running a Python parser.
//!
//! A line-oriented scan recovers the structure that matters for orientation:
//! import runs (collapsed into one summary node), classes with their methods,
//! top-level functions with decorators and docstrings. Anything that defies
//! the scan degrades to plain text blocks, so malformed Python still
//! compresses instead of failing.

use crate::config::Config;
use crate::dom::{BodyLine, Node, NodeKind, OutputLine};
use crate::engine::truncate_smart;
use crate::error::Result;
use crate::formats::Format;
use crate::select::render_block;
use regex::Regex;

/// Structural scanner for `.py` sources.
pub struct PythonFormat {
    class_weight: f64,
    def_weight: f64,
    import_weight: f64,
    text_weight: f64,
    beta: f64,
    re_def: Regex,
    re_class: Regex,
    re_import: Regex,
    re_decorator: Regex,
}

impl PythonFormat {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            class_weight: cfg.container_weight,
            def_weight: cfg.definition_weight,
            import_weight: cfg.import_weight,
            text_weight: cfg.text_weight,
            beta: cfg.ucurve_beta,
            re_def: Regex::new(r"^(async\s+)?def\s+([A-Za-z_]\w*)").unwrap(),
            re_class: Regex::new(r"^class\s+([A-Za-z_]\w*)").unwrap(),
            re_import: Regex::new(r"^(import|from)\s+\S").unwrap(),
            re_decorator: Regex::new(r"^@\w").unwrap(),
        }
    }

    /// Parse the lines of one suite (module body or class body) at a fixed
    /// indent. Import collapsing only applies at module level.
    fn parse_suite(
        &self,
        lines: &[&str],
        from: usize,
        to: usize,
        indent: usize,
        collapse_imports: bool,
    ) -> Vec<Node> {
        let mut out = Vec::new();
        let mut text_run: Vec<BodyLine> = Vec::new();
        let mut import_run: Vec<BodyLine> = Vec::new();
        let mut import_count = 0usize;

        let mut i = from;
        while i < to {
            let raw = lines[i];
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                flush_text(&mut out, &mut text_run, self.text_weight);
                i += 1;
                continue;
            }
            let ind = indent_of(raw);
            if ind < indent {
                break;
            }

            if collapse_imports && ind == indent && self.re_import.is_match(trimmed) {
                flush_text(&mut out, &mut text_run, self.text_weight);
                import_run.push(body_line(i, raw));
                import_count += 1;
                i += 1;
                // Parenthesized import lists continue on deeper-indented lines.
                while i < to && !lines[i].trim().is_empty() && indent_of(lines[i]) > indent {
                    import_run.push(body_line(i, lines[i]));
                    i += 1;
                }
                continue;
            }
            self.flush_imports(&mut out, &mut import_run, &mut import_count);

            if ind > indent {
                // Continuation of a multi-line statement: keep it with the text.
                text_run.push(body_line(i, raw));
                i += 1;
                continue;
            }

            if self.re_decorator.is_match(trimmed)
                || self.re_class.is_match(trimmed)
                || self.re_def.is_match(trimmed)
            {
                flush_text(&mut out, &mut text_run, self.text_weight);

                let mut decorators = Vec::new();
                while i < to && self.re_decorator.is_match(lines[i].trim()) {
                    decorators.push(body_line(i, lines[i]));
                    i += 1;
                }
                if i >= to {
                    text_run.extend(decorators);
                    break;
                }

                let head = lines[i].trim();
                if let Some(caps) = self.re_class.captures(head) {
                    let end = block_end(lines, i + 1, ind, to);
                    out.push(self.class_node(lines, i, end, decorators, &caps[1]));
                    i = end;
                } else if let Some(caps) = self.re_def.captures(head) {
                    let end = block_end(lines, i + 1, ind, to);
                    let name = caps
                        .get(2)
                        .map_or_else(String::new, |m| m.as_str().to_string());
                    out.push(self.def_node(lines, i, end, decorators, name));
                    i = end;
                } else {
                    // A dangling decorator with nothing to decorate.
                    text_run.extend(decorators);
                }
                continue;
            }

            text_run.push(body_line(i, raw));
            i += 1;
        }

        flush_text(&mut out, &mut text_run, self.text_weight);
        self.flush_imports(&mut out, &mut import_run, &mut import_count);
        out
    }

    fn flush_imports(&self, out: &mut Vec<Node>, run: &mut Vec<BodyLine>, count: &mut usize) {
        if run.is_empty() {
            return;
        }
        let lines = std::mem::take(run);
        let mut node = Node::new(NodeKind::Import);
        node.name = "imports".to_string();
        node.signature = format!(
            "[{} imports, lines {}-{}]",
            count,
            lines[0].number,
            lines[lines.len() - 1].number
        );
        node.weight = self.import_weight;
        node.body = lines;
        out.push(node);
        *count = 0;
    }

    fn class_node(
        &self,
        lines: &[&str],
        start: usize,
        end: usize,
        decorators: Vec<BodyLine>,
        name: &str,
    ) -> Node {
        let mut node = Node::new(NodeKind::Container);
        node.name = name.to_string();
        node.signature = lines[start].trim().to_string();
        node.weight = self.class_weight;
        node.body = decorators;
        node.body.push(body_line(start, lines[start]));

        // First non-blank line inside the block sets the member indent. The
        // class docstring ends up as the leading text-block child, so it
        // survives compression through recursion rather than a preview copy.
        let inner = (start + 1..end).find(|&j| !lines[j].trim().is_empty());
        if let Some(first) = inner {
            let member_indent = indent_of(lines[first]);
            node.children = self.parse_suite(lines, first, end, member_indent, false);
        }
        node
    }

    fn def_node(
        &self,
        lines: &[&str],
        start: usize,
        end: usize,
        decorators: Vec<BodyLine>,
        name: String,
    ) -> Node {
        let mut node = Node::new(NodeKind::Definition);
        node.name = name;
        node.signature = lines[start].trim().to_string();
        node.weight = self.def_weight;
        node.preview = docstring_line(lines, start + 1, end).unwrap_or_default();
        node.body = decorators;
        for j in start..end {
            if !lines[j].trim().is_empty() {
                node.body.push(body_line(j, lines[j]));
            }
        }
        node
    }

    /// Signature, docstring preview, then a U-curve sketch of the remaining
    /// body: the Detailed form.
    fn render_detailed(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        let sig_idx = node
            .body
            .iter()
            .position(|l| l.text.trim() == node.signature)?;
        let sig = &node.body[sig_idx];
        let mut remaining = budget.checked_sub(sig.text.trim().len())?;

        let mut out = vec![OutputLine::new(
            f64::from(sig.number),
            sig.text.trim().to_string(),
        )];

        // The docstring leads the sketch as its own line; the raw docstring
        // source line drops out of the sketch so the two do not repeat.
        let mut rest = &node.body[sig_idx + 1..];
        if !node.preview.is_empty() {
            if let Some(doc) = rest.first() {
                if doc.text.contains(&node.preview) && node.preview.len() < remaining {
                    remaining -= node.preview.len();
                    out.push(OutputLine::new(f64::from(doc.number), node.preview.clone()));
                    rest = &rest[1..];
                }
            }
        }

        let sketch = render_block(rest, remaining, self.beta)?;
        out.extend(sketch);
        Some(out)
    }

    fn render_def(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        if node.subtree_chars() <= budget {
            return Some(verbatim_lines(node));
        }
        if let Some(detailed) = self.render_detailed(node, budget) {
            return Some(detailed);
        }
        if node.signature.len() <= budget {
            let mut out = vec![OutputLine::new(
                f64::from(node.span.start),
                node.signature.clone(),
            )];
            if !node.preview.is_empty()
                && node.signature.len() + node.preview.len() <= budget
            {
                out.push(OutputLine::new(
                    f64::from(node.span.start) + 0.5,
                    node.preview.clone(),
                ));
            }
            return Some(out);
        }
        if !node.name.is_empty() && node.name.len() <= budget {
            return Some(vec![OutputLine::new(
                f64::from(node.span.start),
                node.name.clone(),
            )]);
        }
        None
    }

    fn render_import(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        if node.subtree_chars() <= budget {
            return Some(verbatim_lines(node));
        }
        let at = f64::from(node.span.start);
        if node.signature.len() <= budget {
            return Some(vec![OutputLine::new(at, node.signature.clone())]);
        }
        if budget >= 10 {
            return Some(vec![OutputLine::new(
                at,
                truncate_smart(&node.signature, budget, true),
            )]);
        }
        None
    }
}

impl Format for PythonFormat {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py", ".pyw"]
    }

    fn parse(&self, content: &str) -> Result<Node> {
        let mut root = Node::root();
        root.name = "module".to_string();

        let lines: Vec<&str> = content.lines().collect();
        root.children = self.parse_suite(&lines, 0, lines.len(), 0, true);
        root.seal();
        Ok(root)
    }

    fn render(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        if budget == 0 {
            return None;
        }
        match node.kind {
            NodeKind::Definition | NodeKind::Container => self.render_def(node, budget),
            NodeKind::Import => self.render_import(node, budget),
            _ => {
                if node.body.len() == 1 {
                    if budget < 4 {
                        return None;
                    }
                    let line = &node.body[0];
                    return Some(vec![OutputLine::new(
                        f64::from(line.number),
                        truncate_smart(&line.text, budget, node.atomic),
                    )]);
                }
                render_block(&node.body, budget, self.beta)
            }
        }
    }
}

fn body_line(index: usize, text: &str) -> BodyLine {
    BodyLine {
        number: (index + 1) as u32,
        text: text.to_string(),
    }
}

/// Close the current run of unstructured lines into a text block.
fn flush_text(out: &mut Vec<Node>, run: &mut Vec<BodyLine>, weight: f64) {
    if run.is_empty() {
        return;
    }
    let mut node = Node::new(NodeKind::TextBlock);
    node.weight = weight;
    node.body = std::mem::take(run);
    out.push(node);
}

/// First line index at or past `from` whose non-blank indent returns to
/// `indent` or less, bounding the block that starts above it.
fn block_end(lines: &[&str], from: usize, indent: usize, to: usize) -> usize {
    let mut i = from;
    while i < to {
        let line = lines[i];
        if !line.trim().is_empty() && indent_of(line) <= indent {
            return i;
        }
        i += 1;
    }
    to
}

fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// First docstring line of a block, quotes stripped.
fn docstring_line(lines: &[&str], from: usize, to: usize) -> Option<String> {
    let first = (from..to).find(|&j| !lines[j].trim().is_empty())?;
    let trimmed = lines[first].trim();
    for quote in ["\"\"\"", "'''"] {
        if let Some(rest) = trimmed.strip_prefix(quote) {
            let text = rest.strip_suffix(quote).unwrap_or(rest).trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
            // Opening quotes alone: the docstring text starts one line down.
            let next = (first + 1..to).find(|&j| !lines[j].trim().is_empty())?;
            let text = lines[next].trim().trim_end_matches(quote).trim();
            return (!text.is_empty()).then(|| text.to_string());
        }
    }
    None
}

fn verbatim_lines(node: &Node) -> Vec<OutputLine> {
    let mut out = Vec::with_capacity(node.body.len());
    node.for_each_line(&mut |line| {
        out.push(OutputLine::new(f64::from(line.number), line.text.clone()));
    });
    out
}

#[cfg(test)]
#[path = "../tests/python.rs"]
mod tests;
