//! Markdown format preserving the heading hierarchy.
//!
//! ATX headings nest by level (H2 under H1, and so on). Paragraphs and
//! fenced code blocks attach to their nearest heading; code blocks are
//! atomic, shown whole or folded, never cut in the middle.

use crate::config::Config;
use crate::dom::{BodyLine, Node, NodeKind, OutputLine};
use crate::engine::truncate_smart;
use crate::error::Result;
use crate::formats::Format;
use crate::select::render_block;
use regex::Regex;

/// ATX heading parser with fenced code block support.
pub struct MarkdownFormat {
    section_weight: f64,
    text_weight: f64,
    beta: f64,
    re_heading: Regex,
    re_fence: Regex,
}

impl MarkdownFormat {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            section_weight: cfg.section_weight,
            text_weight: cfg.text_weight,
            beta: cfg.ucurve_beta,
            re_heading: Regex::new(r"^(#{1,6})\s+(.+)$").unwrap(),
            re_fence: Regex::new(r"^```").unwrap(),
        }
    }

    fn paragraph(&self, lines: Vec<BodyLine>) -> Node {
        let mut node = Node::new(NodeKind::TextBlock);
        node.weight = self.text_weight;
        node.body = lines;
        node
    }

    fn code_block(&self, lines: Vec<BodyLine>) -> Node {
        let mut node = Node::new(NodeKind::TextBlock);
        node.weight = self.text_weight;
        node.atomic = true;
        node.body = lines;
        node
    }

    fn heading(&self, line: &BodyLine, level: usize, title: &str) -> Node {
        let mut node = Node::new(NodeKind::Section);
        node.name = title.to_string();
        node.signature = line.text.trim().to_string();
        node.weight = self.section_weight / level as f64;
        node.body = vec![line.clone()];
        node
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn parse(&self, content: &str) -> Result<Node> {
        let root = Node::root();

        // Stack of (level, node); level 0 is the root. Children attach to the
        // deepest open heading and close when an equal-or-higher one appears.
        let mut stack: Vec<(usize, Node)> = vec![(0, root)];
        let mut paragraph: Vec<BodyLine> = Vec::new();
        let mut code: Vec<BodyLine> = Vec::new();
        let mut in_code = false;

        for (i, raw) in content.lines().enumerate() {
            let line = BodyLine {
                number: (i + 1) as u32,
                text: raw.to_string(),
            };

            if self.re_fence.is_match(raw) {
                if in_code {
                    code.push(line);
                    let node = self.code_block(std::mem::take(&mut code));
                    attach(&mut stack, node);
                    in_code = false;
                } else {
                    flush_paragraph(self, &mut stack, &mut paragraph);
                    code.push(line);
                    in_code = true;
                }
                continue;
            }
            if in_code {
                code.push(line);
                continue;
            }

            if let Some(caps) = self.re_heading.captures(raw) {
                flush_paragraph(self, &mut stack, &mut paragraph);
                let level = caps[1].len();
                let node = self.heading(&line, level, caps[2].trim());
                while stack.len() > 1 && stack.last().map_or(0, |(l, _)| *l) >= level {
                    let (_, done) = stack.pop().unwrap();
                    attach(&mut stack, done);
                }
                stack.push((level, node));
                continue;
            }

            if raw.trim().is_empty() {
                flush_paragraph(self, &mut stack, &mut paragraph);
            } else {
                paragraph.push(line);
            }
        }

        // An unterminated fence still renders as code.
        if in_code && !code.is_empty() {
            let node = self.code_block(std::mem::take(&mut code));
            attach(&mut stack, node);
        }
        flush_paragraph(self, &mut stack, &mut paragraph);

        while stack.len() > 1 {
            let (_, done) = stack.pop().unwrap();
            attach(&mut stack, done);
        }
        let (_, mut root) = stack.pop().unwrap();
        root.seal();
        Ok(root)
    }

    fn render(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
        if budget == 0 {
            return None;
        }
        let total = node.subtree_chars();
        if total <= budget {
            let mut out = Vec::new();
            node.for_each_line(&mut |line| {
                out.push(OutputLine::new(f64::from(line.number), line.text.clone()));
            });
            return Some(out);
        }

        match node.kind {
            // A section leaf past its budget degrades to its heading line.
            NodeKind::Section => {
                if node.signature.len() <= budget {
                    return Some(vec![OutputLine::new(
                        f64::from(node.span.start),
                        node.signature.clone(),
                    )]);
                }
                if budget >= 4 {
                    return Some(vec![OutputLine::new(
                        f64::from(node.span.start),
                        truncate_smart(&node.signature, budget, true),
                    )]);
                }
                None
            }
            _ if node.atomic => None,
            _ => {
                if node.body.len() == 1 {
                    if budget < 4 {
                        return None;
                    }
                    let line = &node.body[0];
                    return Some(vec![OutputLine::new(
                        f64::from(line.number),
                        truncate_smart(&line.text, budget, false),
                    )]);
                }
                render_block(&node.body, budget, self.beta)
            }
        }
    }
}

/// Add a finished node to the section currently open on the stack.
fn attach(stack: &mut Vec<(usize, Node)>, node: Node) {
    if let Some((_, parent)) = stack.last_mut() {
        parent.add_child(node);
    }
}

fn flush_paragraph(
    format: &MarkdownFormat,
    stack: &mut Vec<(usize, Node)>,
    paragraph: &mut Vec<BodyLine>,
) {
    if paragraph.is_empty() {
        return;
    }
    let node = format.paragraph(std::mem::take(paragraph));
    attach(stack, node);
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
