//! Mind map format: `[N]` markers delimit nodes of a reference graph.
//!
//! Each `[N]`-prefixed line opens a section holding everything until the next
//! marker. References to other nodes inside a section raise that node's
//! connectivity, and well-connected nodes weigh more: a hub survives
//! compression longer than a leaf note.

use crate::config::Config;
use crate::dom::{BodyLine, Node, NodeKind, OutputLine};
use crate::engine::truncate_smart;
use crate::error::Result;
use crate::formats::Format;
use crate::select::render_block;
use regex::Regex;

/// Parser for `[N]`-marked mind map files.
pub struct MindMapFormat {
    section_weight: f64,
    beta: f64,
    re_marker: Regex,
    re_reference: Regex,
}

impl MindMapFormat {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            section_weight: cfg.section_weight,
            beta: cfg.ucurve_beta,
            re_marker: Regex::new(r"^\[(\d+)\]").unwrap(),
            re_reference: Regex::new(r"\[(\d+)\]").unwrap(),
        }
    }

    fn section(&self, id: Option<&str>, lines: Vec<BodyLine>) -> Node {
        let mut node = Node::new(NodeKind::Section);
        node.name = id.map_or_else(|| "preamble".to_string(), |n| format!("[{n}]"));
        node.weight = self.section_weight;
        node.body = lines;
        node
    }
}

impl Format for MindMapFormat {
    fn name(&self) -> &'static str {
        "mindmap"
    }

    fn detect(&self, content: &str) -> bool {
        // Three or more marked lines make this a mind map rather than text.
        content
            .lines()
            .filter(|l| self.re_marker.is_match(l))
            .count()
            >= 3
    }

    fn parse(&self, content: &str) -> Result<Node> {
        let mut root = Node::root();

        let mut current: Option<(String, Vec<BodyLine>)> = None;
        let mut preamble: Vec<BodyLine> = Vec::new();

        for (i, raw) in content.lines().enumerate() {
            let line = BodyLine {
                number: (i + 1) as u32,
                text: raw.to_string(),
            };
            if let Some(caps) = self.re_marker.captures(raw) {
                if let Some((id, lines)) = current.take() {
                    root.add_child(self.section(Some(&id), lines));
                } else if !preamble.is_empty() {
                    root.add_child(self.section(None, std::mem::take(&mut preamble)));
                }
                current = Some((caps[1].to_string(), vec![line]));
            } else if let Some((_, lines)) = current.as_mut() {
                if !raw.trim().is_empty() {
                    lines.push(line);
                }
            } else if !raw.trim().is_empty() {
                preamble.push(line);
            }
        }
        if let Some((id, lines)) = current.take() {
            root.add_child(self.section(Some(&id), lines));
        } else if !preamble.is_empty() {
            root.add_child(self.section(None, preamble));
        }

        boost_by_in_degree(&mut root, &self.re_reference);
        root.seal();
        Ok(root)
    }

    fn render(&self, node: &Node, budget: usize) -> Option<Vec<OutputLine>> {
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

/// Connectivity multiplier: a node referenced from `d` other sections gets
/// weight scaled by `1 + ln(1 + d)`.
fn boost_by_in_degree(root: &mut Node, re_reference: &Regex) {
    let mut counts: Vec<usize> = vec![0; root.children.len()];
    for (target_idx, target) in root.children.iter().enumerate() {
        if target.name == "preamble" {
            continue;
        }
        for (source_idx, source) in root.children.iter().enumerate() {
            if source_idx == target_idx {
                continue;
            }
            let referenced = source
                .body
                .iter()
                .any(|l| re_reference.find_iter(&l.text).any(|m| m.as_str() == target.name));
            if referenced {
                counts[target_idx] += 1;
            }
        }
    }
    for (child, degree) in root.children.iter_mut().zip(counts) {
        child.weight *= 1.0 + (1.0 + degree as f64).ln();
    }
}

#[cfg(test)]
#[path = "../tests/mindmap.rs"]
mod tests;
