use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, block_kinds, find_first, parse_blocks, plain_text,
};
use crate::tree::NodeKind;

#[test]
fn simple_blockquote() {
    let tree = parse_blocks("> # Foo\n> bar\n> baz\n");
    let quote = find_first(&tree, NodeKind::BlockQuote).unwrap();
    assert_eq!(
        block_kinds(&tree, quote),
        vec![NodeKind::Heading, NodeKind::Paragraph]
    );
}

#[test]
fn lazy_continuation() {
    let tree = parse_blocks("> bar\nbaz\n> foo\n");
    assert_eq!(block_kinds(&tree, tree.root()), vec![NodeKind::BlockQuote]);
    let para = find_first(&tree, NodeKind::Paragraph).unwrap();
    assert_eq!(plain_text(&tree, para), "barbazfoo");
}

#[test]
fn laziness_does_not_apply_to_thematic_break() {
    assert_block_kinds(
        "> foo\n---\n",
        &[NodeKind::BlockQuote, NodeKind::ThematicBreak],
    );
}

#[test]
fn blank_line_separates_quotes() {
    assert_block_kinds(
        "> foo\n\n> bar\n",
        &[NodeKind::BlockQuote, NodeKind::BlockQuote],
    );
}

#[test]
fn nested_blockquotes() {
    let tree = parse_blocks(">>> deep\n");
    let outer = tree.first_child(tree.root()).unwrap();
    let middle = tree.first_child(outer).unwrap();
    let inner = tree.first_child(middle).unwrap();
    assert_eq!(tree.kind(inner), Some(NodeKind::BlockQuote));
    assert_eq!(block_kinds(&tree, inner), vec![NodeKind::Paragraph]);
}
