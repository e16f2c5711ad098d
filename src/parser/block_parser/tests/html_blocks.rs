use crate::parser::block_parser::tests::helpers::{assert_block_kinds, find_first, parse_blocks};
use crate::tree::NodeKind;

#[test]
fn block_tag_runs_until_blank_line() {
    let tree = parse_blocks("<div>\n*hello*\n\n*world*\n");
    let html = find_first(&tree, NodeKind::HtmlBlock).unwrap();
    assert_eq!(tree.string_content(html), "<div>\n*hello*\n");
    assert_eq!(
        tree.children(tree.root()).filter_map(|id| tree.kind(id)).collect::<Vec<_>>(),
        vec![NodeKind::HtmlBlock, NodeKind::Paragraph]
    );
}

#[test]
fn comment_block_ends_at_terminator() {
    let tree = parse_blocks("<!-- a\n\nb -->\nokay\n");
    let html = find_first(&tree, NodeKind::HtmlBlock).unwrap();
    assert_eq!(tree.string_content(html), "<!-- a\n\nb -->\n");
    assert!(find_first(&tree, NodeKind::Paragraph).is_some());
}

#[test]
fn complete_tag_cannot_interrupt_paragraph() {
    assert_block_kinds("Foo\n<a href=\"bar\">\nbaz\n", &[NodeKind::Paragraph]);
}

#[test]
fn complete_tag_starts_block() {
    assert_block_kinds("<del>\n\n*foo*\n\n</del>\n", &[
        NodeKind::HtmlBlock,
        NodeKind::Paragraph,
        NodeKind::HtmlBlock,
    ]);
}
