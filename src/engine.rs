//! The compression engine: recursive tree-budget allocation.
//!
//! Budget flows top-down. The root receives the full character budget; each
//! container scores its children, splits its remaining budget over them with
//! the softmax allocator, and recurses. Leaves render through their format at
//! the densest level of detail that fits. Children whose share is too small
//! to be useful collapse into fold markers, and a final enforcement pass
//! guarantees the global cap.

use crate::allocate::allocate;
use crate::config::Config;
use crate::dom::{Node, NodeKind, OutputLine};
use crate::enforce;
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::score::{KindWeights, Scorer};
use regex::Regex;
use tracing::debug;

/// Output geometry: `width × height` characters total, with `width` also
/// bounding each line.
#[derive(Clone, Copy, Debug)]
pub struct CharBudget {
    pub width: u32,
    pub height: u32,
}

impl CharBudget {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total character budget.
    #[must_use]
    pub fn total(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Caller-tunable behavior of one compression run.
#[derive(Clone, Debug)]
pub struct Options {
    /// Regex whose matches boost node scores.
    pub grep_pattern: Option<String>,
    /// Softmax temperature; must be positive.
    pub temperature: f64,
    /// Shares under this width fold the child instead of rendering it.
    pub min_line_chars: usize,
    /// Per-kind intrinsic weight overrides.
    pub weights: Option<KindWeights>,
    /// Prefix each output line with its source address.
    pub line_numbers: bool,
    /// Wrap long lines at this width instead of truncating them.
    pub wrap_width: Option<usize>,
    /// Drop lines whose token 3-grams were all seen earlier in the output.
    pub deduplicate: bool,
    /// Exponent of the positional U-curve.
    pub positional_alpha: f64,
    /// Exponent of the leaf line-sampling U-curve.
    pub ucurve_beta: f64,
    /// Strength of the grep boost.
    pub grep_k: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grep_pattern: None,
            temperature: 0.5,
            min_line_chars: 8,
            weights: None,
            line_numbers: false,
            wrap_width: None,
            deduplicate: false,
            positional_alpha: 2.0,
            ucurve_beta: 2.0,
            grep_k: 2.0,
        }
    }
}

impl Options {
    /// Options seeded from the loaded configuration.
    #[must_use]
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            temperature: cfg.temperature,
            min_line_chars: cfg.min_line_chars,
            deduplicate: cfg.deduplicate,
            positional_alpha: cfg.positional_alpha,
            ucurve_beta: cfg.ucurve_beta,
            grep_k: cfg.grep_k,
            ..Self::default()
        }
    }
}

/// An output line still carrying the bookkeeping the enforcer needs.
#[derive(Clone, Debug)]
pub(crate) struct Emitted {
    pub line: OutputLine,
    /// Score inherited from the originating node; drives cap eviction order.
    pub score: f64,
    /// Structural signatures (class/function/heading) are evicted last.
    pub structural: bool,
}

struct Ctx<'a> {
    format: &'a dyn Format,
    scorer: Scorer,
    temperature: f64,
    min_line_chars: usize,
}

/// Compress a parsed tree into at most `budget.total()` characters.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] for a non-positive temperature, a zero
/// budget dimension, or an unparseable grep pattern. The engine itself never
/// fails on content: a budget too small for any rendering degrades to a
/// single truncated line.
pub fn compress(
    root: &Node,
    budget: CharBudget,
    options: &Options,
    format: &dyn Format,
) -> Result<Vec<OutputLine>> {
    if budget.width == 0 || budget.height == 0 {
        return Err(Error::InvalidOption(format!(
            "budget dimensions must be positive, got {}x{}",
            budget.width, budget.height
        )));
    }
    if options.temperature <= 0.0 {
        return Err(Error::InvalidOption(format!(
            "temperature must be > 0, got {}",
            options.temperature
        )));
    }
    let pattern = match &options.grep_pattern {
        Some(p) => Some(
            Regex::new(p).map_err(|e| Error::InvalidOption(format!("bad grep pattern: {e}")))?,
        ),
        None => None,
    };

    if root.subtree_chars() == 0 && root.children.is_empty() {
        return Ok(Vec::new());
    }

    let ctx = Ctx {
        format,
        scorer: Scorer::new(
            options.positional_alpha,
            options.grep_k,
            pattern,
            options.weights,
        ),
        temperature: options.temperature,
        min_line_chars: options.min_line_chars,
    };

    // Newlines between output lines count against the shape, so the content
    // budget reserves one per expected line break.
    let total = budget.total();
    let content_budget = total
        .saturating_sub(budget.height as usize - 1)
        .max(1);

    let emitted = compress_node(root, content_budget, 1.0, &ctx);
    debug!(lines = emitted.len(), budget = content_budget, "tree pass done");

    let out = enforce::finish(emitted, budget.width as usize, content_budget, options);
    if out.is_empty() {
        return Ok(vec![overview_fallback(root, budget)]);
    }
    Ok(out)
}

/// Compress one node into its allocated share of the budget.
fn compress_node(node: &Node, budget: usize, score: f64, ctx: &Ctx) -> Vec<Emitted> {
    if budget == 0 {
        return Vec::new();
    }

    // Densest level first: the whole subtree verbatim when it fits.
    if node.subtree_chars() <= budget {
        return verbatim(node, score);
    }

    if node.children.is_empty() {
        let Some(lines) = ctx.format.render(node, budget) else {
            return Vec::new();
        };
        return attach(node, lines, score);
    }

    let mut out = Vec::new();
    let mut remaining = budget;

    if !node.signature.is_empty() {
        if node.signature.len() > remaining {
            // Regional does not fit; fall back to the bare name, or fold.
            if !node.name.is_empty() && node.name.len() <= remaining {
                out.push(Emitted {
                    line: OutputLine::new(f64::from(node.span.start), node.name.clone()),
                    score,
                    structural: true,
                });
            }
            return out;
        }
        out.push(Emitted {
            line: OutputLine::new(f64::from(node.span.start), node.signature.clone()),
            score,
            structural: is_structural(node.kind),
        });
        remaining -= node.signature.len();
    }

    if remaining < ctx.min_line_chars {
        return out;
    }

    let total = node.children.len();
    let scores: Vec<f64> = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| ctx.scorer.score(child, i, total))
        .collect();
    let shares = allocate(&scores, remaining, ctx.temperature, ctx.min_line_chars);

    let mut fold: Option<(usize, u32, u32, f64)> = None;
    for ((child, share), child_score) in node.children.iter().zip(&shares).zip(&scores) {
        let rendered = if share.folded {
            Vec::new()
        } else {
            compress_node(child, share.chars, *child_score, ctx)
        };

        if rendered.is_empty() {
            fold = Some(match fold {
                None => (1, child.span.start, child.span.end, *child_score),
                Some((n, start, _, s)) => (n + 1, start, child.span.end, s.max(*child_score)),
            });
            continue;
        }

        flush_fold(&mut out, &mut fold);
        out.extend(rendered);
    }
    flush_fold(&mut out, &mut fold);

    out
}

/// Emit a pending run of folded children as one transient fold node.
fn flush_fold(out: &mut Vec<Emitted>, fold: &mut Option<(usize, u32, u32, f64)>) {
    if let Some((count, start, end, score)) = fold.take() {
        let marker = Node::fold(count, crate::dom::LineSpan::new(start, end));
        out.push(Emitted {
            line: OutputLine::new(f64::from(start) - 0.5, marker.signature),
            score,
            structural: false,
        });
    }
}

/// Whole subtree at full fidelity, in source order.
fn verbatim(node: &Node, score: f64) -> Vec<Emitted> {
    let mut out = Vec::new();
    verbatim_into(node, score, &mut out);
    out
}

fn verbatim_into(node: &Node, score: f64, out: &mut Vec<Emitted>) {
    for (i, line) in node.body.iter().enumerate() {
        out.push(Emitted {
            line: OutputLine::new(f64::from(line.number), line.text.clone()),
            score,
            structural: i == 0 && is_structural(node.kind),
        });
    }
    for child in &node.children {
        verbatim_into(child, score, out);
    }
}

/// Wrap format-rendered lines with the node's bookkeeping.
fn attach(node: &Node, lines: Vec<OutputLine>, score: f64) -> Vec<Emitted> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| Emitted {
            structural: i == 0 && is_structural(node.kind),
            score,
            line,
        })
        .collect()
}

fn is_structural(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Container | NodeKind::Section | NodeKind::Definition
    )
}

/// Degenerate budget: one truncated line naming what is here.
fn overview_fallback(root: &Node, budget: CharBudget) -> OutputLine {
    let source = if !root.name.is_empty() {
        root.name.clone()
    } else if !root.signature.is_empty() {
        root.signature.clone()
    } else {
        root.first_line()
            .map(|l| l.text.clone())
            .unwrap_or_default()
    };
    let cap = (budget.width as usize).min(budget.total());
    let line = root.span.start.max(1);
    OutputLine::new(f64::from(line), truncate_smart(&source, cap, true))
}

/// Truncate to `max_chars` with a marker that reports how much was cut.
///
/// Removals of 100+ chars use `...[+N chars]...`, 1000+ use
/// `...[+X.X KB]...`. When the budget leaves room for meaningful context on
/// both sides the middle is removed instead of the tail. Atomic content
/// (previews, fenced code) is only ever tail-truncated.
#[must_use]
pub fn truncate_smart(content: &str, max_chars: usize, atomic: bool) -> String {
    if content.len() <= max_chars {
        return content.to_string();
    }
    let removed = content.len() - max_chars;

    if atomic {
        if max_chars <= 3 {
            return "..."[..max_chars].to_string();
        }
        return format!("{}...", head_str(content, max_chars - 3));
    }

    let marker = if removed < 100 {
        "...".to_string()
    } else if removed < 1000 {
        format!("...[+{removed} chars]...")
    } else {
        format!("...[+{:.1} KB]...", removed as f64 / 1024.0)
    };

    if max_chars <= marker.len() {
        return marker[..max_chars].to_string();
    }

    if max_chars >= 40 + marker.len() {
        let remaining = max_chars - marker.len();
        let head = remaining / 2;
        let tail = remaining - head;
        format!(
            "{}{}{}",
            head_str(content, head),
            marker,
            tail_str(content, tail)
        )
    } else {
        format!("{}{}", head_str(content, max_chars - marker.len()), marker)
    }
}

/// Longest prefix of at most `len` bytes ending on a char boundary.
#[must_use]
pub fn head_str(s: &str, len: usize) -> &str {
    let mut i = len.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    &s[..i]
}

/// Longest suffix of at most `len` bytes starting on a char boundary.
#[must_use]
pub fn tail_str(s: &str, len: usize) -> &str {
    let mut i = s.len().saturating_sub(len);
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    &s[i..]
}

#[cfg(test)]
#[path = "tests/engine.rs"]
mod tests;
