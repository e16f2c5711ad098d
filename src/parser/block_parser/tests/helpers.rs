use crate::config::Config;
use crate::parser::parse_with_config;
use crate::tree::{NodeId, NodeKind, Tree};

pub fn parse_blocks(input: &str) -> Tree {
    parse_with_config(input, &Config::default())
}

pub fn find_first(tree: &Tree, kind: NodeKind) -> Option<NodeId> {
    tree.descendants(tree.root())
        .find(|&id| tree.kind(id) == Some(kind))
}

pub fn find_all(tree: &Tree, kind: NodeKind) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| tree.kind(id) == Some(kind))
        .collect()
}

pub fn block_kinds(tree: &Tree, parent: NodeId) -> Vec<NodeKind> {
    tree.children(parent)
        .filter_map(|id| tree.kind(id))
        .collect()
}

pub fn assert_block_kinds(input: &str, expected: &[NodeKind]) {
    let tree = parse_blocks(input);
    let actual = block_kinds(&tree, tree.root());
    assert_eq!(
        actual, expected,
        "Block kinds did not match for input:\n{}",
        input
    );
}

/// Concatenated text of every `Text` node below `node`.
pub fn plain_text(tree: &Tree, node: NodeId) -> String {
    tree.descendants(node)
        .filter(|&id| tree.kind(id) == Some(NodeKind::Text))
        .map(|id| tree.string_content(id))
        .collect()
}
