//! Link reference definitions.
//!
//! Definitions have the form:
//! ```markdown
//! [label]: url "optional title"
//! [label]: <url> 'optional title'
//! [label]:
//!   url
//!   (optional title)
//! ```
//!
//! They are stripped from the start of paragraphs when the paragraph is
//! closed (or becomes a setext heading) and collected in a
//! [`ReferenceRegistry`] for the inline pass.

use std::collections::HashMap;

use super::utils::{is_line_end, is_space_or_tab, peek};
use crate::parser::inline_parser::links::{
    normalize_label, scan_link_destination, scan_link_label, scan_link_title,
};

/// A resolved link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReferenceDefinition {
    pub(crate) url: String,
    pub(crate) title: String,
}

/// Registry of reference definitions keyed by normalized label. The first
/// definition of a label wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceRegistry {
    definitions: HashMap<String, ReferenceDefinition>,
}

impl ReferenceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a definition unless its label is empty or already defined.
    pub(crate) fn add(&mut self, label: &str, url: String, title: String) {
        let Some(normalized) = normalize_label(label) else {
            return;
        };
        self.definitions
            .entry(normalized)
            .or_insert(ReferenceDefinition { url, title });
    }

    pub(crate) fn get(&self, label: &str) -> Option<&ReferenceDefinition> {
        self.definitions.get(&normalize_label(label)?)
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}

/// Skips spaces and tabs plus at most one line ending.
fn skip_spnl(input: &str, mut pos: usize) -> usize {
    while is_space_or_tab(peek(input, pos)) {
        pos += 1;
    }
    if peek(input, pos) == b'\r' {
        pos += 1;
    }
    if peek(input, pos) == b'\n' {
        pos += 1;
    }
    while is_space_or_tab(peek(input, pos)) {
        pos += 1;
    }
    pos
}

/// Skips trailing spaces and then a line ending. `None` if anything else
/// follows on the line.
fn skip_to_line_end(input: &str, mut pos: usize) -> Option<usize> {
    while is_space_or_tab(peek(input, pos)) {
        pos += 1;
    }
    if pos >= input.len() {
        return Some(pos);
    }
    if !is_line_end(peek(input, pos)) {
        return None;
    }
    if peek(input, pos) == b'\r' {
        pos += 1;
    }
    if peek(input, pos) == b'\n' {
        pos += 1;
    }
    Some(pos)
}

/// Try to parse one reference definition at the start of `input`.
///
/// On success the definition is registered and the number of bytes it
/// occupied is returned.
pub(crate) fn try_parse_reference_definition(
    input: &str,
    registry: &mut ReferenceRegistry,
) -> Option<usize> {
    let (mut pos, label) = scan_link_label(input, 0)?;
    if label.is_empty() || peek(input, pos) != b':' {
        return None;
    }
    pos = skip_spnl(input, pos + 1);

    let (url_end, url) = scan_link_destination(input, pos)?;
    let before_title = url_end;
    let title_start = skip_spnl(input, before_title);

    let title = if title_start == before_title {
        None
    } else {
        scan_link_title(input, title_start)
    };

    let (end, title) = match title {
        Some((title_end, title)) => match skip_to_line_end(input, title_end) {
            Some(end) => (end, title),
            // A title followed by junk is not a title; the definition may
            // still end after the destination.
            None => (skip_to_line_end(input, before_title)?, String::new()),
        },
        None => (skip_to_line_end(input, before_title)?, String::new()),
    };

    log::trace!("reference definition [{label}] -> {url}");
    registry.add(label, url, title);
    Some(end)
}
