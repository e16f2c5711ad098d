//! Raw HTML recognition for inline tags.
//!
//! The open and closing tag grammars are shared with HTML block start
//! condition 7.

use std::sync::LazyLock;

use regex::Regex;

const TAG_NAME: &str = r"[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE: &str = r#"(?:[ \t\n\x0B\x0C\r]+[A-Za-z_:][A-Za-z0-9_.:-]*(?:[ \t\n\x0B\x0C\r]*=[ \t\n\x0B\x0C\r]*(?:[^ \t\n\x0B\x0C\r"'=<>`]+|'[^']*'|"[^"]*"))?)"#;

pub(crate) fn open_tag_pattern() -> String {
    format!(r"<{TAG_NAME}{ATTRIBUTE}*[ \t\n\x0B\x0C\r]*/?>")
}

pub(crate) fn closing_tag_pattern() -> String {
    format!(r"</{TAG_NAME}[ \t\n\x0B\x0C\r]*>")
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^(?:{}|{})",
        open_tag_pattern(),
        closing_tag_pattern()
    ))
    .expect("valid tag regex")
});

static DECLARATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<![A-Za-z][^>]*>").expect("valid declaration regex"));

/// Length of the raw HTML construct at the start of `input` (which begins
/// with `<`), if there is one.
pub(crate) fn try_parse_html_tag(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('<')?;

    if let Some(body) = rest.strip_prefix("!--") {
        if body.starts_with('>') {
            return Some(5);
        }
        if body.starts_with("->") {
            return Some(6);
        }
        return body.find("-->").map(|end| 4 + end + 3);
    }
    if let Some(body) = rest.strip_prefix("![CDATA[") {
        return body.find("]]>").map(|end| 9 + end + 3);
    }
    if let Some(body) = rest.strip_prefix('?') {
        return body.find("?>").map(|end| 2 + end + 2);
    }
    if rest.starts_with('!') {
        return DECLARATION_RE.find(input).map(|m| m.end());
    }
    TAG_RE.find(input).map(|m| m.end())
}
