use super::{apply_limit, join_lines};
use crate::dom::OutputLine;

#[test]
fn join_has_no_trailing_newline() {
    let lines = vec![OutputLine::new(1.0, "a"), OutputLine::new(2.0, "b")];
    assert_eq!(join_lines(&lines), "a\nb");
    assert_eq!(join_lines(&[]), "");
}

#[test]
fn limit_passes_small_output_through() {
    let out = apply_limit("short output".to_string(), 10_000);
    assert_eq!(out, "short output");
}

#[test]
fn limit_zero_disables_the_cap() {
    let big = "x".repeat(50_000);
    assert_eq!(apply_limit(big.clone(), 0), big);
}

#[test]
fn oversized_output_is_bookended_with_guidance() {
    let big: String = (0..2_000).map(|i| format!("row {i}\n")).collect();
    let out = apply_limit(big, 2_000);

    assert!(out.contains("row 0\n"), "head preserved");
    assert!(out.contains("row 1999"), "tail preserved");
    assert!(out.contains("KB OMITTED"), "omission marker present");
    assert!(out.contains("OUTPUT TRUNCATED"), "diagnostic message present");
    assert!(out.contains("--shape"), "guidance names the shape flag");
}
