use super::{render_block, select_indices, ucurve_weight};
use crate::dom::{parse_fold_marker, BodyLine};

fn lines(n: usize, width: usize) -> Vec<BodyLine> {
    (1..=n)
        .map(|i| BodyLine {
            number: i as u32,
            text: format!("{:0w$}", i, w = width),
        })
        .collect()
}

#[test]
fn weight_peaks_at_both_ends() {
    assert!((ucurve_weight(0, 100, 2.0) - 1.0).abs() < 1e-9);
    assert!(ucurve_weight(99, 100, 2.0) > ucurve_weight(50, 100, 2.0));
    assert!(ucurve_weight(0, 100, 2.0) > ucurve_weight(25, 100, 2.0));
}

#[test]
fn select_everything_when_keep_covers_total() {
    assert_eq!(select_indices(5, 5, 2.0), vec![0, 1, 2, 3, 4]);
    assert_eq!(select_indices(5, 9, 2.0), vec![0, 1, 2, 3, 4]);
}

#[test]
fn selection_is_sorted_and_biased_to_ends() {
    let kept = select_indices(100, 6, 2.0);
    assert_eq!(kept.len(), 6);
    assert!(kept.windows(2).all(|w| w[0] < w[1]), "ascending order");
    assert!(kept.contains(&0), "first line kept");
    assert!(kept.contains(&99), "last line kept");
    assert!(!kept.contains(&50), "middle dropped");
}

#[test]
fn block_fitting_budget_is_verbatim() {
    let block = lines(5, 4);
    let out = render_block(&block, 100, 2.0).unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(out[0].text, "0001");
    assert_eq!(out[4].line, 5.0);
}

#[test]
fn oversized_block_keeps_head_and_tail_around_one_marker() {
    let block = lines(100, 10);
    let out = render_block(&block, 100, 2.0).unwrap();

    let total: usize = out.iter().map(|l| l.text.len()).sum();
    assert!(total <= 100, "rendering over budget: {total}");

    let texts: Vec<&str> = out.iter().map(|l| l.text.as_str()).collect();
    for expected in ["0000000001", "0000000002", "0000000003"] {
        assert!(texts.contains(&expected), "head line {expected} missing");
    }
    for expected in ["0000000098", "0000000099", "0000000100"] {
        assert!(texts.contains(&expected), "tail line {expected} missing");
    }

    let markers: Vec<usize> = out
        .iter()
        .filter_map(|l| parse_fold_marker(&l.text))
        .collect();
    assert_eq!(markers.len(), 1, "exactly one marker between head and tail");
}

#[test]
fn marker_sits_between_its_neighbors() {
    let block = lines(100, 10);
    let out = render_block(&block, 100, 2.0).unwrap();
    let idx = out
        .iter()
        .position(|l| parse_fold_marker(&l.text).is_some())
        .unwrap();
    assert!(out[idx - 1].line < out[idx].line);
    assert!(out[idx].line < out[idx + 1].line);
    assert!(out[idx].line.fract() != 0.0, "marker address is fractional");
}

#[test]
fn tiny_budget_keeps_first_line_and_marker() {
    let block = lines(50, 10);
    let out = render_block(&block, 30, 2.0).unwrap();
    assert_eq!(out[0].text, "0000000001");
    assert_eq!(parse_fold_marker(&out[1].text), Some(49));
}

#[test]
fn hopeless_budget_returns_none() {
    let block = lines(50, 10);
    assert!(render_block(&block, 3, 2.0).is_none());
}

#[test]
fn single_long_line_tail_truncates() {
    let block = vec![BodyLine {
        number: 7,
        text: "x".repeat(100),
    }];
    let out = render_block(&block, 20, 2.0).unwrap();
    assert_eq!(out.len(), 1);
    assert!(out[0].text.len() <= 20);
    assert!(out[0].text.ends_with("..."));
}
