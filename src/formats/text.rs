//! Plain text format, and the fallback for anything unrecognised.
//!
//! Text parses into a two-level tree: blank-line-separated blocks under the
//! root, each block owning its lines. Compression can then drop whole blocks
//! or sample lines within a block on the U-curve.

use crate::config::Config;
use crate::dom::{BodyLine, Node, NodeKind, OutputLine};
use crate::engine::truncate_smart;
use crate::error::Result;
use crate::formats::Format;
use crate::select::render_block;

/// Blank-line-separated blocks of lines.
pub struct TextFormat {
    weight: f64,
    beta: f64,
}

impl TextFormat {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            weight: cfg.text_weight,
            beta: cfg.ucurve_beta,
        }
    }
}

impl Format for TextFormat {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".txt", ".text", ".log"]
    }

    fn parse(&self, content: &str) -> Result<Node> {
        let mut root = Node::root();

        let mut block: Vec<BodyLine> = Vec::new();
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    root.add_child(block_node(std::mem::take(&mut block), self.weight));
                }
            } else {
                block.push(BodyLine {
                    number: (i + 1) as u32,
                    text: line.to_string(),
                });
            }
        }
        if !block.is_empty() {
            root.add_child(block_node(block, self.weight));
        }

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
                truncate_smart(&line.text, budget, node.atomic),
            )]);
        }
        render_block(&node.body, budget, self.beta)
    }
}

fn block_node(lines: Vec<BodyLine>, weight: f64) -> Node {
    let mut node = Node::new(NodeKind::TextBlock);
    node.name = format!(
        "L{}-{}",
        lines.first().map_or(0, |l| l.number),
        lines.last().map_or(0, |l| l.number)
    );
    node.weight = weight;
    node.body = lines;
    node
}

#[cfg(test)]
#[path = "../tests/text.rs"]
mod tests;
