//! Importance scoring: which parts of the tree deserve budget.
//!
//! Three signals combine into one strictly positive scalar per node. Sibling
//! position follows a U-curve (openings establish context, endings carry
//! conclusions), topology favours shallow and format-privileged nodes, and an
//! optional grep pattern boosts matching subtrees without zeroing the rest.

use crate::dom::{Node, NodeKind};
use regex::Regex;

/// Floor applied to every score so the softmax never collapses on zeros.
const EPSILON: f64 = 1e-6;

/// Per-kind intrinsic weight overrides, applied in place of the weights the
/// parser assigned.
#[derive(Clone, Copy, Debug)]
pub struct KindWeights {
    pub container: f64,
    pub section: f64,
    pub definition: f64,
    pub import: f64,
    pub text: f64,
}

impl KindWeights {
    #[must_use]
    pub fn for_kind(&self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Container => self.container,
            NodeKind::Section => self.section,
            NodeKind::Definition => self.definition,
            NodeKind::Import => self.import,
            NodeKind::Root | NodeKind::TextBlock | NodeKind::FoldMarker => self.text,
        }
    }
}

/// Computes importance scores for the children of one parent.
pub struct Scorer {
    alpha: f64,
    grep_k: f64,
    pattern: Option<Regex>,
    overrides: Option<KindWeights>,
}

impl Scorer {
    #[must_use]
    pub fn new(
        alpha: f64,
        grep_k: f64,
        pattern: Option<Regex>,
        overrides: Option<KindWeights>,
    ) -> Self {
        Self {
            alpha,
            grep_k,
            pattern,
            overrides,
        }
    }

    /// U-shaped positional score over sibling index: high at both ends of the
    /// child list, lowest in the middle.
    #[must_use]
    pub fn positional(&self, index: usize, total: usize) -> f64 {
        if total <= 1 {
            return 1.0;
        }
        let x = index as f64 / total as f64;
        let from_start = (1.0 - x).powf(self.alpha);
        let from_end = x.powf(self.alpha);
        from_start.max(from_end)
    }

    /// Intrinsic weight damped by depth: shallower nodes carry more mass.
    #[must_use]
    pub fn topological(&self, node: &Node) -> f64 {
        let weight = self
            .overrides
            .map_or(node.weight, |w| w.for_kind(node.kind));
        weight * (1.0 / (1.0 + f64::from(node.depth)))
    }

    /// Multiplier from grep matches anywhere in the subtree:
    /// `1 + k * ln(1 + matches)`. Without a pattern this is 1.
    #[must_use]
    pub fn grep_boost(&self, node: &Node) -> f64 {
        let Some(pattern) = &self.pattern else {
            return 1.0;
        };
        let mut matches = 0usize;
        node.for_each_line(&mut |line| {
            matches += pattern.find_iter(&line.text).count();
        });
        1.0 + self.grep_k * (1.0 + matches as f64).ln()
    }

    /// Final score: `grep_boost * (positional + topological)`, floored at a
    /// small epsilon.
    #[must_use]
    pub fn score(&self, node: &Node, index: usize, total: usize) -> f64 {
        let base = self.positional(index, total) + self.topological(node);
        (self.grep_boost(node) * base).max(EPSILON)
    }
}

#[cfg(test)]
#[path = "tests/score.rs"]
mod tests;
