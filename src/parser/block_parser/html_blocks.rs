//! HTML block start and end conditions.
//!
//! Blocks are numbered by the condition that opened them: 1 verbatim tags,
//! 2 comments, 3 processing instructions, 4 declarations, 5 CDATA,
//! 6 known block-level tags, 7 any complete open or closing tag.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::inline_parser::raw_html::{closing_tag_pattern, open_tag_pattern};

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "base",
    "basefont",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hr",
    "html",
    "iframe",
    "legend",
    "li",
    "link",
    "main",
    "menu",
    "menuitem",
    "nav",
    "noframes",
    "ol",
    "optgroup",
    "option",
    "p",
    "param",
    "search",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
];

static VERBATIM_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(?:script|pre|textarea|style)(?:[ \t\x0B\x0C\r\n>]|$)")
        .expect("valid verbatim start regex")
});

static VERBATIM_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:script|pre|textarea|style)>").expect("valid verbatim end regex")
});

static BLOCK_TAG_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^</?(?:{})(?:[ \t\x0B\x0C\r\n]|/?>|$)",
        BLOCK_TAGS.join("|")
    ))
    .expect("valid block tag regex")
});

static COMPLETE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:{}|{})[ \t\x0C]*(?:\r?\n)?$",
        open_tag_pattern(),
        closing_tag_pattern()
    ))
    .expect("valid complete tag regex")
});

/// Try to match start conditions 1 through 6 at `pos`.
pub(crate) fn try_parse_html_block_start(line: &str, pos: usize) -> Option<u8> {
    let rest = line.get(pos..)?;
    if !rest.starts_with('<') {
        return None;
    }

    if VERBATIM_START.is_match(rest) {
        Some(1)
    } else if rest.starts_with("<!--") {
        Some(2)
    } else if rest.starts_with("<?") {
        Some(3)
    } else if rest.starts_with("<![CDATA[") {
        Some(5)
    } else if rest.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic)
        && rest.starts_with("<!")
    {
        Some(4)
    } else if BLOCK_TAG_START.is_match(rest) {
        Some(6)
    } else {
        None
    }
}

/// Try to match start condition 7: a complete tag alone on its line. This
/// condition cannot interrupt a paragraph, which the caller enforces.
pub(crate) fn try_parse_html_block_start_7(line: &str, pos: usize) -> Option<u8> {
    let rest = line.get(pos..)?;
    if !rest.starts_with('<') || VERBATIM_START.is_match(rest) {
        return None;
    }
    COMPLETE_TAG_LINE.is_match(rest).then_some(7)
}

/// Whether `line` from `pos` satisfies the end condition of a block of the
/// given type. Types 6 and 7 end at a blank line instead.
pub(crate) fn html_block_ends(block_type: u8, line: &str, pos: usize) -> bool {
    let rest = line.get(pos..).unwrap_or("");
    match block_type {
        1 => VERBATIM_END.is_match(rest),
        2 => rest.contains("-->"),
        3 => rest.contains("?>"),
        4 => rest.contains('>'),
        5 => rest.contains("]]>"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_conditions() {
        assert_eq!(try_parse_html_block_start("<script>\n", 0), Some(1));
        assert_eq!(try_parse_html_block_start("<PRE class=\"x\">\n", 0), Some(1));
        assert_eq!(try_parse_html_block_start("<!-- c\n", 0), Some(2));
        assert_eq!(try_parse_html_block_start("<?xml\n", 0), Some(3));
        assert_eq!(try_parse_html_block_start("<!DOCTYPE html>\n", 0), Some(4));
        assert_eq!(try_parse_html_block_start("<![CDATA[\n", 0), Some(5));
        assert_eq!(try_parse_html_block_start("<div>\n", 0), Some(6));
        assert_eq!(try_parse_html_block_start("</TD>\n", 0), Some(6));
    }

    #[test]
    fn test_not_block_tags() {
        assert_eq!(try_parse_html_block_start("<span>\n", 0), None);
        assert_eq!(try_parse_html_block_start("<divider>\n", 0), None);
        assert_eq!(try_parse_html_block_start("<scripts>\n", 0), None);
    }

    #[test]
    fn test_condition_seven() {
        assert_eq!(try_parse_html_block_start_7("<a href=\"foo\">\n", 0), Some(7));
        assert_eq!(try_parse_html_block_start_7("</ins>\n", 0), Some(7));
        assert_eq!(try_parse_html_block_start_7("<a> text\n", 0), None);
        assert_eq!(try_parse_html_block_start_7("<pre>\n", 0), None);
    }

    #[test]
    fn test_end_conditions() {
        assert!(html_block_ends(1, "x</style>\n", 0));
        assert!(html_block_ends(2, "end -->\n", 0));
        assert!(!html_block_ends(2, "end --\n", 0));
        assert!(html_block_ends(4, ">\n", 0));
        assert!(!html_block_ends(6, "</div>\n", 0));
    }
}
