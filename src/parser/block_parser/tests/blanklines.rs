use crate::parser::block_parser::tests::helpers::{assert_block_kinds, parse_blocks};
use crate::tree::NodeKind;

#[test]
fn blankline_between_paragraphs() {
    assert_block_kinds(
        "Paragraph 1\n\nParagraph 2\n",
        &[NodeKind::Paragraph, NodeKind::Paragraph],
    );
}

#[test]
fn multiple_blanklines_between_paragraphs() {
    assert_block_kinds(
        "Paragraph 1\n\n\n\nParagraph 2\n",
        &[NodeKind::Paragraph, NodeKind::Paragraph],
    );
}

#[test]
fn blank_input_has_no_blocks() {
    assert_block_kinds("", &[]);
    assert_block_kinds("\n\n   \n", &[]);
}

#[test]
fn blank_line_ends_paragraph_sourcepos() {
    let tree = parse_blocks("foo\nbar\n\nbaz\n");
    let first = tree.first_child(tree.root()).unwrap();
    let pos = tree.sourcepos(first);
    assert_eq!((pos.start_line, pos.start_column), (1, 1));
    assert_eq!((pos.end_line, pos.end_column), (2, 3));

    let second = tree.next(first).unwrap();
    let pos = tree.sourcepos(second);
    assert_eq!((pos.start_line, pos.end_line, pos.end_column), (4, 4, 3));
}

#[test]
fn document_sourcepos_covers_input() {
    let tree = parse_blocks("a\n\nbb\n");
    let pos = tree.sourcepos(tree.root());
    assert_eq!((pos.start_line, pos.start_column), (1, 1));
    assert_eq!((pos.end_line, pos.end_column), (3, 2));
}
