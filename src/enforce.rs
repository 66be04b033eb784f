//! Budget enforcement: the post-pass that makes the cap a guarantee.
//!
//! The tree pass is allowed to be optimistic; fold markers and ellipses can
//! push it slightly over. This pass merges adjacent markers, bounds each line
//! to the output width (truncating or wrapping), evicts the lowest-scoring
//! lines until the total fits, and optionally deduplicates by token 3-grams.

use crate::dom::{fold_marker_text, parse_fold_marker, OutputLine};
use crate::engine::{head_str, truncate_smart, Emitted, Options};
use std::collections::HashSet;

/// An output line with the bookkeeping eviction needs.
struct Working {
    no: f64,
    text: String,
    score: f64,
    structural: bool,
    /// Elided count when this line is a fold marker.
    marker: Option<usize>,
}

/// Run the full enforcement pipeline and strip the bookkeeping.
pub(crate) fn finish(
    emitted: Vec<Emitted>,
    width: usize,
    total_budget: usize,
    options: &Options,
) -> Vec<OutputLine> {
    let mut lines: Vec<Working> = emitted
        .into_iter()
        .map(|e| Working {
            marker: parse_fold_marker(&e.line.text),
            no: e.line.line,
            text: e.line.text,
            score: e.score,
            structural: e.structural,
        })
        .collect();

    lines = merge_markers(lines);
    lines = collapse_marker_only(lines);

    // Hard cap: drop the least valuable line, re-merge, repeat.
    while !lines.is_empty() && cost(&lines, width, options) > total_budget {
        let Some(victim) = pick_victim(&lines) else {
            break;
        };
        lines.remove(victim);
        lines = merge_markers(lines);
    }

    if options.deduplicate {
        lines = deduplicate(lines);
        lines = merge_markers(lines);
    }

    lines
        .iter()
        .flat_map(|w| compose(w, width, options))
        .collect()
}

/// Sum adjacent fold markers into one.
fn merge_markers(lines: Vec<Working>) -> Vec<Working> {
    let mut out: Vec<Working> = Vec::with_capacity(lines.len());
    for line in lines {
        if let (Some(n), Some(last)) = (line.marker, out.last_mut()) {
            if let Some(m) = last.marker {
                last.marker = Some(m + n);
                last.text = fold_marker_text(m + n);
                last.score = last.score.max(line.score);
                continue;
            }
        }
        out.push(line);
    }
    out
}

/// Output that is nothing but markers collapses to a single summary line.
fn collapse_marker_only(lines: Vec<Working>) -> Vec<Working> {
    if lines.is_empty() || lines.iter().any(|l| l.marker.is_none()) {
        return lines;
    }
    let total: usize = lines.iter().filter_map(|l| l.marker).sum();
    let no = lines[0].no;
    let score = lines.iter().map(|l| l.score).fold(f64::MIN, f64::max);
    vec![Working {
        no,
        text: format!("[{total} items, budget too low]"),
        score,
        structural: false,
        marker: Some(total),
    }]
}

/// Eviction order for the hard cap: content lines from the lowest score up,
/// then markers, then structural signatures last. Ties evict the later line.
fn pick_victim(lines: &[Working]) -> Option<usize> {
    lowest(lines, |l| !l.structural && l.marker.is_none())
        .or_else(|| lowest(lines, |l| l.marker.is_some()))
        .or_else(|| lowest(lines, |l| l.structural))
}

fn lowest(lines: &[Working], class: impl Fn(&Working) -> bool) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| class(l))
        .min_by(|(ia, a), (ib, b)| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ib.cmp(ia))
        })
        .map(|(i, _)| i)
}

/// Character cost of the final rendering, including address prefixes and
/// wrapped continuations.
fn cost(lines: &[Working], width: usize, options: &Options) -> usize {
    lines
        .iter()
        .map(|w| compose(w, width, options).iter().map(|l| l.text.len()).sum::<usize>())
        .sum()
}

/// Drop lines whose every token 3-gram already appeared in the output.
fn deduplicate(lines: Vec<Working>) -> Vec<Working> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        if tokens.len() < 3 {
            out.push(line);
            continue;
        }
        let grams: Vec<String> = tokens.windows(3).map(|w| w.join("\u{1}")).collect();
        let redundant = grams.iter().all(|g| seen.contains(g));
        for gram in grams {
            seen.insert(gram);
        }
        if !redundant {
            out.push(line);
        }
    }
    out
}

/// Render one working line to its final form: address prefix, then either a
/// width truncation or a wrap into fractionally-addressed continuations.
fn compose(w: &Working, width: usize, options: &Options) -> Vec<OutputLine> {
    let prefix = |no: f64| {
        if options.line_numbers {
            format!("{}: ", OutputLine::new(no, "").address())
        } else {
            String::new()
        }
    };

    let first_prefix = prefix(w.no);
    let fits = first_prefix.len() + w.text.len() <= width;

    // Wrapping applies to integer-addressed content; synthetic lines truncate.
    let wrappable = options.wrap_width.is_some() && w.no.fract().abs() < 1e-9 && !fits;
    if !wrappable {
        let mut text = format!("{first_prefix}{}", w.text);
        if text.len() > width {
            text = truncate_smart(&text, width, true);
        }
        return vec![OutputLine::new(w.no, text)];
    }

    let wrap = options.wrap_width.unwrap_or(width).min(width);
    let mut out = Vec::new();
    let total = w.text.len();
    let mut start = 0usize;
    while start < total {
        let frac = (start * 100 / total) as f64 / 100.0;
        let no = w.no + frac;
        let p = prefix(no);
        let room = wrap.saturating_sub(p.len()).max(1);
        let mut segment = head_str(&w.text[start..], room);
        if segment.is_empty() {
            // A multi-byte char wider than the remaining room still advances.
            let char_len = w.text[start..].chars().next().map_or(1, char::len_utf8);
            segment = &w.text[start..start + char_len];
        }
        let taken = segment.len();
        out.push(OutputLine::new(no, format!("{p}{segment}")));
        start += taken;
    }
    out
}

#[cfg(test)]
#[path = "tests/enforce.rs"]
mod tests;
