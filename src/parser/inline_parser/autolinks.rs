//! URI and email autolinks (`<https://example.com>`, `<me@example.com>`).

use std::sync::LazyLock;

use regex::Regex;

use super::entities::unescape_entities;

static URI_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^\x00-\x20<>]*)>").expect("valid uri regex")
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*)>",
    )
    .expect("valid email regex")
});

/// A recognized autolink.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Autolink {
    /// Bytes consumed, including both angle brackets.
    pub(super) len: usize,
    pub(super) url: String,
    /// Link text as displayed.
    pub(super) text: String,
}

/// Try to parse an autolink at the start of `input`, which begins with `<`.
pub(super) fn try_parse_autolink(input: &str) -> Option<Autolink> {
    if let Some(caps) = URI_AUTOLINK.captures(input) {
        let text = unescape_entities(&caps[1]);
        return Some(Autolink {
            len: caps[0].len(),
            url: text.clone(),
            text,
        });
    }
    let caps = EMAIL_AUTOLINK.captures(input)?;
    let text = unescape_entities(&caps[1]);
    Some(Autolink {
        len: caps[0].len(),
        url: format!("mailto:{text}"),
        text,
    })
}
