//! Softmax budget allocation across a parent's children.
//!
//! Scores are normalised by their max for numerical stability, passed through
//! a temperature-scaled softmax, and the parent budget is split by floored
//! proportion with the remainder going to the largest fractional parts.
//! Children whose share falls under the minimum useful width are folded and
//! their budget redistributed over the survivors until the split is stable.

/// Budget share for one child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Share {
    /// Characters granted to this child.
    pub chars: usize,
    /// True when the child was dropped for falling under the floor;
    /// `chars` is 0 and the child renders as part of a fold marker.
    pub folded: bool,
}

/// Split `budget` characters over children with the given scores.
///
/// Postconditions: the shares sum to at most `budget`, and every surviving
/// child holds at least `min_line_chars`.
#[must_use]
pub fn allocate(scores: &[f64], budget: usize, temperature: f64, min_line_chars: usize) -> Vec<Share> {
    let mut shares = vec![
        Share {
            chars: 0,
            folded: true
        };
        scores.len()
    ];
    if scores.is_empty() || budget == 0 {
        return shares;
    }

    let mut survivors: Vec<usize> = (0..scores.len()).collect();

    loop {
        let weights = softmax(&survivors.iter().map(|&i| scores[i]).collect::<Vec<_>>(), temperature);
        let grants = split_by_weight(budget, &weights);

        let mut dropped_any = false;
        let mut still: Vec<usize> = Vec::with_capacity(survivors.len());
        for (slot, &idx) in survivors.iter().enumerate() {
            if grants[slot] < min_line_chars {
                shares[idx] = Share {
                    chars: 0,
                    folded: true,
                };
                dropped_any = true;
            } else {
                shares[idx] = Share {
                    chars: grants[slot],
                    folded: false,
                };
                still.push(idx);
            }
        }

        if !dropped_any || still.is_empty() {
            return shares;
        }
        survivors = still;
    }
}

/// Max-normalised softmax weights at the given temperature.
fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let exps: Vec<f64> = scores
        .iter()
        .map(|&s| ((s / max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

/// Floor-and-remainder split of `budget` by the given weights. Remainder
/// characters go to the largest fractional parts, ties broken by index.
fn split_by_weight(budget: usize, weights: &[f64]) -> Vec<usize> {
    let exact: Vec<f64> = weights.iter().map(|w| w * budget as f64).collect();
    let mut grants: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let used: usize = grants.iter().sum();
    let mut remainder = budget.saturating_sub(used);

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = exact[a].fract();
        let fb = exact[b].fract();
        fb.partial_cmp(&fa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    for idx in order {
        if remainder == 0 {
            break;
        }
        grants[idx] += 1;
        remainder -= 1;
    }
    grants
}

#[cfg(test)]
#[path = "tests/allocate.rs"]
mod tests;
