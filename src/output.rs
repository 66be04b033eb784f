//! Final output assembly: joining lines and the absolute size ceiling.
//!
//! The shape flag is a target geometry; `--limit` is a hard ceiling on what
//! actually reaches the terminal. Oversized output keeps its head and tail
//! around an omission marker, followed by a note saying how to get the rest.

use crate::dom::OutputLine;
use crate::engine::{head_str, tail_str};

/// Join output lines into the final string, one physical line each, no
/// trailing newline.
#[must_use]
pub fn join_lines(lines: &[OutputLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply the absolute character limit, bookending oversized output.
#[must_use]
pub fn apply_limit(output: String, limit: usize) -> String {
    if limit == 0 || output.len() <= limit {
        return output;
    }

    let total_chars = output.len();
    let total_lines = output.lines().count();
    let excess_kb = (total_chars - limit) as f64 / 1024.0;

    let marker = format!("\n\n[...{excess_kb:.1} KB OMITTED...]\n\n");
    let preview = if limit >= 100 + marker.len() {
        let remaining = limit - marker.len();
        let head = remaining / 2;
        let tail = remaining - head;
        format!(
            "{}{}{}",
            head_str(&output, head),
            marker,
            tail_str(&output, tail)
        )
    } else {
        head_str(&output, limit).to_string()
    };

    let message = format!(
        "\n[OUTPUT TRUNCATED: {total_chars} chars ({total_lines} lines) exceeds --limit {limit} by {excess_kb:.1} KB]\n\
         Reduce output: --shape WIDTH:HEIGHT (e.g., 120:50) or --range START:END (e.g., 1:100)\n\
         Raise limit:   --limit {total_chars} or save to a file: nub ... > output.txt"
    );

    preview + &message
}

#[cfg(test)]
#[path = "tests/output.rs"]
mod tests;
