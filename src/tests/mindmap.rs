use super::MindMapFormat;
use crate::config::Config;
use crate::formats::Format;

fn format() -> MindMapFormat {
    MindMapFormat::new(&Config::default())
}

const MAP: &str = "\
Some preamble text.

[1] Root idea
Connects to [2] and [3].

[2] Hub
Referenced from everywhere.

[3] Leaf
Points back at [2].

[4] Orphan
Nothing links here.
";

#[test]
fn detection_needs_three_markers() {
    let f = format();
    assert!(f.detect(MAP));
    assert!(!f.detect("[1] one\n[2] two\n"));
    assert!(!f.detect("plain text with [brackets] but no numbers"));
}

#[test]
fn sections_split_on_markers_with_preamble() {
    let tree = format().parse(MAP).unwrap();
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["preamble", "[1]", "[2]", "[3]", "[4]"]);

    let node1 = &tree.children[1];
    assert_eq!(node1.body[0].text, "[1] Root idea");
    assert_eq!(node1.body.len(), 2);
}

#[test]
fn connectivity_raises_weight() {
    let tree = format().parse(MAP).unwrap();
    let hub = &tree.children[2];
    let orphan = &tree.children[4];
    assert_eq!(hub.name, "[2]");
    assert!(
        hub.weight > orphan.weight,
        "hub {} should outweigh orphan {}",
        hub.weight,
        orphan.weight
    );
}

#[test]
fn self_references_do_not_count() {
    let source = "[1] Selfish node about [1] itself\n[2] Peer\n[3] Peer\n";
    let tree = format().parse(source).unwrap();
    let selfish = &tree.children[0];
    let peer = &tree.children[1];
    assert!((selfish.weight - peer.weight).abs() < 1e-9);
}
