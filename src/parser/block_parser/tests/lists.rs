use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, block_kinds, find_all, find_first, parse_blocks,
};
use crate::tree::{ListDelimType, ListType, NodeKind};

#[test]
fn tight_bullet_list() {
    let tree = parse_blocks("- a\n- b\n- c\n");
    let list = find_first(&tree, NodeKind::List).unwrap();
    assert_eq!(tree.list_type(list), Some(ListType::Bullet));
    assert!(tree.list_tight(list));
    assert_eq!(find_all(&tree, NodeKind::Item).len(), 3);
}

#[test]
fn loose_list_with_blank_between_items() {
    let tree = parse_blocks("- a\n\n- b\n");
    let list = find_first(&tree, NodeKind::List).unwrap();
    assert!(!tree.list_tight(list));
}

#[test]
fn blank_line_inside_nested_list_keeps_outer_tight() {
    let tree = parse_blocks("- a\n  - b\n\n    c\n- d\n");
    let lists = find_all(&tree, NodeKind::List);
    assert!(tree.list_tight(lists[0]));
    assert!(!tree.list_tight(lists[1]));
}

#[test]
fn ordered_list_start_and_delimiter() {
    let tree = parse_blocks("3) three\n4) four\n");
    let list = find_first(&tree, NodeKind::List).unwrap();
    assert_eq!(tree.list_type(list), Some(ListType::Ordered));
    assert_eq!(tree.list_start(list), 3);
    assert_eq!(tree.list_delim(list), Some(ListDelimType::Paren));
}

#[test]
fn changing_bullet_starts_new_list() {
    assert_block_kinds("- foo\n- bar\n+ baz\n", &[NodeKind::List, NodeKind::List]);
}

#[test]
fn only_one_can_interrupt_paragraph() {
    assert_block_kinds(
        "The number of windows in my house is\n14.  The number of doors is 6.\n",
        &[NodeKind::Paragraph],
    );
    assert_block_kinds(
        "The number of windows in my house is\n1.  The number of doors is 6.\n",
        &[NodeKind::Paragraph, NodeKind::List],
    );
}

#[test]
fn item_content_column_follows_marker_width() {
    let tree = parse_blocks("1.  A paragraph\n    with two lines.\n\n        indented code\n\n    > A block quote.\n");
    let item = find_first(&tree, NodeKind::Item).unwrap();
    assert_eq!(
        block_kinds(&tree, item),
        vec![NodeKind::Paragraph, NodeKind::CodeBlock, NodeKind::BlockQuote]
    );
}

#[test]
fn empty_item_then_content() {
    let tree = parse_blocks("-\n  foo\n");
    let item = find_first(&tree, NodeKind::Item).unwrap();
    assert_eq!(block_kinds(&tree, item), vec![NodeKind::Paragraph]);
}

#[test]
fn deeply_nested_lists_are_capped() {
    let input: String = (0..150)
        .map(|depth| format!("{}- x\n", "  ".repeat(depth)))
        .collect();
    let tree = parse_blocks(&input);
    let lists = find_all(&tree, NodeKind::List);
    assert!(lists.len() <= crate::parser::block_parser::MAX_LIST_DEPTH);
}
