use super::FolderFormat;
use crate::config::Config;
use crate::engine::{compress, CharBudget, Options};
use std::fs;
use tempfile::tempdir;

fn format() -> FolderFormat {
    FolderFormat::new(&Config::default())
}

#[test]
fn directories_before_files_both_sorted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("zeta.txt"), "z").unwrap();
    fs::write(dir.path().join("alpha.txt"), "a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("inner.txt"), "inner content").unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["sub", "alpha.txt", "zeta.txt"]);
    assert_eq!(tree.children[0].children[0].name, "inner.txt");
}

#[test]
fn file_lines_carry_preview_and_size() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("notes.txt"),
        "hello   world\nsecond\tline here\n",
    )
    .unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let file = &tree.children[0];
    let line = &file.body[0].text;

    assert!(line.contains("notes.txt"));
    assert!(
        line.contains("hello world second line here"),
        "whitespace collapsed in preview, got {line}"
    );
    assert!(line.contains("[31 bytes]"), "got {line}");
}

#[test]
fn previews_are_head_truncated() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big.txt"), "word ".repeat(500)).unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let line = &tree.children[0].body[0].text;
    let preview = line
        .split(" - ")
        .nth(1)
        .and_then(|rest| rest.rsplit_once(" ["))
        .map(|(p, _)| p)
        .unwrap();
    assert!(preview.len() <= 41, "preview too long: {preview:?}");
}

#[test]
fn binary_files_are_named_but_not_read() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("image.png"), vec![0u8; 2048]).unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let line = &tree.children[0].body[0].text;
    assert!(line.contains("image.png [binary] [2.0 KB]"), "got {line}");
}

#[test]
fn cache_directories_are_skipped() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("kept.txt"), "data").unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["kept.txt"]);
}

#[test]
fn listing_is_indented_by_depth() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("lib.rs"), "pub fn x() {}").unwrap();

    let tree = format().parse_path(dir.path()).unwrap();
    let sub = &tree.children[0];
    assert!(sub.signature.starts_with("  src/"), "got {}", sub.signature);
    assert!(
        sub.children[0].body[0].text.starts_with("    lib.rs"),
        "got {}",
        sub.children[0].body[0].text
    );
}

#[test]
fn parse_from_content_is_refused() {
    use crate::formats::Format;
    assert!(format().parse("anything").is_err());
}

#[test]
fn compressed_listing_fits_shape() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        let body = "content line for preview purposes. ".repeat(i * 8 + 1);
        fs::write(dir.path().join(format!("file{i}.txt")), body).unwrap();
    }

    let f = format();
    let tree = f.parse_path(dir.path()).unwrap();
    let budget = CharBudget::new(70, 6);
    let out = compress(&tree, budget, &Options::default(), &f).unwrap();

    let total: usize = out.iter().map(|l| l.text.len()).sum();
    assert!(total <= budget.total());
    for line in &out {
        assert!(line.text.len() <= 70);
    }
    let joined: String = out
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(joined.contains("file0.txt"), "got:\n{joined}");
}
