//! U-curve line sampling for leaf blocks that exceed their budget.
//!
//! When a block of `L` lines must shrink to `K`, lines near the start and end
//! are kept in preference to the middle, and each maximal run of dropped
//! lines becomes a single fold marker at its source position.

use crate::dom::{fold_marker_text, BodyLine, OutputLine};

/// U-shaped weight for line `i` of `total`: high at both ends, low in the
/// middle.
#[must_use]
pub fn ucurve_weight(i: usize, total: usize, beta: f64) -> f64 {
    if total <= 1 {
        return 1.0;
    }
    let x = i as f64 / total as f64;
    (1.0 - x).powf(beta).max(x.powf(beta))
}

/// Indices of the `keep` highest-weighted lines, ascending. Ties keep the
/// earlier line, so selection is stable under re-runs.
#[must_use]
pub fn select_indices(total: usize, keep: usize, beta: f64) -> Vec<usize> {
    if keep >= total {
        return (0..total).collect();
    }
    let mut order: Vec<usize> = (0..total).collect();
    order.sort_by(|&a, &b| {
        let wa = ucurve_weight(a, total, beta);
        let wb = ucurve_weight(b, total, beta);
        wb.partial_cmp(&wa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut kept: Vec<usize> = order.into_iter().take(keep).collect();
    kept.sort_unstable();
    kept
}

/// Render a block of source lines into at most `budget` characters.
///
/// Keeps whole lines sampled on the U-curve; elided runs appear as
/// `[...N more...]` markers placed just before the run. Returns `None` when
/// the budget cannot hold even a truncated first line.
#[must_use]
pub fn render_block(lines: &[BodyLine], budget: usize, beta: f64) -> Option<Vec<OutputLine>> {
    if lines.is_empty() || budget == 0 {
        return None;
    }

    let total_chars: usize = lines.iter().map(|l| l.text.len()).sum();
    if total_chars <= budget {
        return Some(
            lines
                .iter()
                .map(|l| OutputLine::new(f64::from(l.number), l.text.clone()))
                .collect(),
        );
    }

    let mean = (total_chars / lines.len()).max(1);
    let mut keep = (budget / mean).clamp(1, lines.len());

    // The estimate ignores marker cost and line-length variance; shrink the
    // selection until the rendering actually fits.
    loop {
        let kept = select_indices(lines.len(), keep, beta);
        let rendered = assemble(lines, &kept);
        let cost: usize = rendered.iter().map(|l| l.text.len()).sum();
        if cost <= budget {
            return Some(rendered);
        }
        if keep == 1 {
            return first_line_only(lines, budget);
        }
        keep -= 1;
    }
}

/// Selected lines in source order with fold markers for the gaps.
fn assemble(lines: &[BodyLine], kept: &[usize]) -> Vec<OutputLine> {
    let mut out = Vec::with_capacity(kept.len() + 2);
    let mut cursor = 0usize;
    for &idx in kept {
        if idx > cursor {
            out.push(gap_marker(lines, cursor, idx));
        }
        out.push(OutputLine::new(
            f64::from(lines[idx].number),
            lines[idx].text.clone(),
        ));
        cursor = idx + 1;
    }
    if cursor < lines.len() {
        out.push(gap_marker(lines, cursor, lines.len()));
    }
    out
}

/// Degenerate budget: first line (tail-truncated if needed) plus one marker.
fn first_line_only(lines: &[BodyLine], budget: usize) -> Option<Vec<OutputLine>> {
    let first = &lines[0];
    if lines.len() == 1 {
        if budget < 4 {
            return None;
        }
        return Some(vec![OutputLine::new(
            f64::from(first.number),
            crate::engine::truncate_smart(&first.text, budget, true),
        )]);
    }
    let marker = gap_marker(lines, 1, lines.len());
    let room = budget.saturating_sub(marker.text.len());
    if room < 4 {
        return None;
    }
    let text = crate::engine::truncate_smart(&first.text, room, true);
    Some(vec![
        OutputLine::new(f64::from(first.number), text),
        marker,
    ])
}

/// Marker for dropped lines `[from, to)`, addressed just before the run.
fn gap_marker(lines: &[BodyLine], from: usize, to: usize) -> OutputLine {
    OutputLine::new(
        f64::from(lines[from].number) - 0.5,
        fold_marker_text(to - from),
    )
}

#[cfg(test)]
#[path = "tests/select.rs"]
mod tests;
