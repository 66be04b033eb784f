use super::{compress, truncate_smart, CharBudget, Options};
use crate::config::Config;
use crate::dom::parse_fold_marker;
use crate::error::Error;
use crate::formats::{text::TextFormat, Format};

fn text_format() -> TextFormat {
    TextFormat::new(&Config::default())
}

fn total_chars(lines: &[crate::dom::OutputLine]) -> usize {
    lines.iter().map(|l| l.text.len()).sum()
}

#[test]
fn identity_under_sufficient_budget() {
    let source = "alpha\nbeta\ngamma\ndelta";
    let format = text_format();
    let tree = format.parse(source).unwrap();

    let out = compress(&tree, CharBudget::new(80, 10), &Options::default(), &format).unwrap();
    let texts: Vec<&str> = out.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["alpha", "beta", "gamma", "delta"]);
    assert_eq!(out[0].line, 1.0);
    assert_eq!(out[3].line, 4.0);
}

#[test]
fn budget_is_never_exceeded() {
    let source: String = (0..200)
        .map(|i| format!("line {i} with some additional text to fill space\n"))
        .collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    for (w, h) in [(20u32, 5u32), (40, 10), (80, 8), (120, 100), (10, 2)] {
        let budget = CharBudget::new(w, h);
        let out = compress(&tree, budget, &Options::default(), &format).unwrap();
        assert!(
            total_chars(&out) <= budget.total(),
            "{}x{} produced {} chars",
            w,
            h,
            total_chars(&out)
        );
    }
}

#[test]
fn no_output_line_exceeds_width() {
    let source: String = (0..50)
        .map(|i| format!("{i}: {}\n", "wide line content ".repeat(10)))
        .collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let budget = CharBudget::new(30, 20);
    let out = compress(&tree, budget, &Options::default(), &format).unwrap();
    for line in &out {
        assert!(line.text.len() <= 30, "line too wide: {:?}", line.text);
    }
}

#[test]
fn output_preserves_source_order() {
    let source: String = (0..120).map(|i| format!("content line {i}\n")).collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let out = compress(&tree, CharBudget::new(40, 10), &Options::default(), &format).unwrap();
    for pair in out.windows(2) {
        assert!(
            pair[0].line <= pair[1].line,
            "lines out of order: {} then {}",
            pair[0].line,
            pair[1].line
        );
    }
}

#[test]
fn identical_inputs_produce_identical_outputs() {
    let source: String = (0..90).map(|i| format!("row {i} text\n")).collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let opts = Options::default();
    let budget = CharBudget::new(30, 8);
    let first = compress(&tree, budget, &opts, &format).unwrap();
    let second = compress(&tree, budget, &opts, &format).unwrap();
    assert_eq!(first, second);
}

#[test]
fn no_adjacent_fold_markers() {
    let source: String = (0..300).map(|i| format!("filler row number {i}\n")).collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let out = compress(&tree, CharBudget::new(25, 8), &Options::default(), &format).unwrap();
    for pair in out.windows(2) {
        assert!(
            parse_fold_marker(&pair[0].text).is_none() || parse_fold_marker(&pair[1].text).is_none(),
            "adjacent markers: {:?} / {:?}",
            pair[0].text,
            pair[1].text
        );
    }
}

#[test]
fn tiny_budget_degrades_to_single_ellipsis_line() {
    let source = "a perfectly ordinary file with enough text to overflow";
    let format = text_format();
    let tree = format.parse(source).unwrap();

    let out = compress(&tree, CharBudget::new(10, 1), &Options::default(), &format).unwrap();
    assert_eq!(out.len(), 1);
    assert!(out[0].text.len() <= 10);
    assert!(out[0].text.ends_with("..."));
}

#[test]
fn monotonicity_over_doubling_budgets() {
    let source: String = (0..150).map(|i| format!("steady line {i}\n")).collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let small = compress(&tree, CharBudget::new(40, 5), &Options::default(), &format).unwrap();
    let large = compress(&tree, CharBudget::new(40, 20), &Options::default(), &format).unwrap();

    let small_lines: Vec<f64> = small
        .iter()
        .filter(|l| parse_fold_marker(&l.text).is_none())
        .map(|l| l.line)
        .collect();
    let large_lines: Vec<f64> = large
        .iter()
        .filter(|l| parse_fold_marker(&l.text).is_none())
        .map(|l| l.line)
        .collect();
    for line in &small_lines {
        assert!(
            large_lines.contains(line),
            "line {line} survived the small budget but not the large one"
        );
    }
}

#[test]
fn grep_pattern_pulls_matching_content_in() {
    // Blank-separated blocks so the pattern differentiates siblings.
    let source: String = (0..80)
        .map(|i| {
            if i == 41 {
                "the SECRET credential line\n\n".to_string()
            } else {
                format!("ordinary middle filler {i}\n\n")
            }
        })
        .collect();
    let format = text_format();
    let tree = format.parse(&source).unwrap();

    let mut opts = Options::default();
    opts.grep_pattern = Some("SECRET".to_string());
    let out = compress(&tree, CharBudget::new(40, 10), &opts, &format).unwrap();
    let found = out.iter().any(|l| l.text.contains("SECRET"));
    assert!(found, "grep-matched line should survive compression");
}

#[test]
fn invalid_options_are_rejected() {
    let format = text_format();
    let tree = format.parse("hello").unwrap();

    let mut opts = Options::default();
    opts.temperature = 0.0;
    let err = compress(&tree, CharBudget::new(10, 10), &opts, &format).unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));

    let mut opts = Options::default();
    opts.grep_pattern = Some("[unclosed".to_string());
    let err = compress(&tree, CharBudget::new(10, 10), &opts, &format).unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));

    let err = compress(&tree, CharBudget::new(0, 10), &Options::default(), &format).unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
}

#[test]
fn empty_tree_yields_empty_output() {
    let format = text_format();
    let tree = format.parse("").unwrap();
    let out = compress(&tree, CharBudget::new(40, 10), &Options::default(), &format).unwrap();
    assert!(out.is_empty());
}

#[test]
fn line_numbers_prefix_every_line() {
    let source = "first\nsecond\nthird";
    let format = text_format();
    let tree = format.parse(source).unwrap();

    let mut opts = Options::default();
    opts.line_numbers = true;
    let out = compress(&tree, CharBudget::new(40, 10), &opts, &format).unwrap();
    assert_eq!(out[0].text, "1: first");
    assert_eq!(out[2].text, "3: third");
}

#[test]
fn truncate_smart_reports_removed_volume() {
    assert_eq!(truncate_smart("hello", 10, false), "hello");
    let cut = truncate_smart(&"x".repeat(500), 60, false);
    assert!(cut.contains("[+440 chars]"), "got {cut}");
    assert!(cut.len() <= 60);

    let big = truncate_smart(&"y".repeat(5000), 80, false);
    assert!(big.contains("KB]"), "got {big}");
    assert!(big.len() <= 80);
}

#[test]
fn truncate_smart_atomic_only_cuts_tail() {
    let content = format!("start{}end", "m".repeat(200));
    let out = truncate_smart(&content, 50, true);
    assert!(out.starts_with("start"));
    assert!(out.ends_with("..."));
    assert!(!out.contains("[+"));
    assert_eq!(out.len(), 50);
}
