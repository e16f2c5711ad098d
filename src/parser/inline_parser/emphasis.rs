//! Emphasis resolution using the CommonMark delimiter stack algorithm.
//!
//! Delimiter runs (`*`, `_`, and with smart punctuation `'` and `"`) are
//! emitted as text nodes while scanning and recorded on a [`DelimiterStack`].
//! [`process_emphasis`] later walks the stack, matching closers to openers
//! and wrapping the nodes between them in `Emph` or `Strong`.
//!
//! Key rules:
//! - "Rule of 3": if either run can both open and close, the sum of the
//!   original run lengths must not be a multiple of 3 unless both are
//! - Strong (2 delimiters) is used whenever both runs have at least two left
//! - Per-character, per-length `openers_bottom` bounds keep the search linear

use super::char_class::{is_punctuation, is_unicode_whitespace};
use crate::tree::{NodeId, NodeValue, Sourcepos, Tree};

pub(super) const LEFT_DOUBLE_QUOTE: &str = "\u{201C}";
pub(super) const RIGHT_DOUBLE_QUOTE: &str = "\u{201D}";
const LEFT_SINGLE_QUOTE: &str = "\u{2018}";
pub(super) const RIGHT_SINGLE_QUOTE: &str = "\u{2019}";

/// Determine whether a delimiter run can open and/or close emphasis.
///
/// `before` and `after` are the characters around the run; the edges of the
/// input count as a newline.
pub(super) fn analyze_delimiter_run(delim: u8, before: char, after: char) -> (bool, bool) {
    let left_flanking = !is_unicode_whitespace(after)
        && (!is_punctuation(after) || is_unicode_whitespace(before) || is_punctuation(before));
    let right_flanking = !is_unicode_whitespace(before)
        && (!is_punctuation(before) || is_unicode_whitespace(after) || is_punctuation(after));

    match delim {
        b'_' => (
            left_flanking && (!right_flanking || is_punctuation(before)),
            right_flanking && (!left_flanking || is_punctuation(after)),
        ),
        b'\'' | b'"' => (
            left_flanking && !right_flanking && before != ']' && before != ')',
            right_flanking,
        ),
        _ => (left_flanking, right_flanking),
    }
}

/// A delimiter run in the delimiter stack.
#[derive(Debug, Clone, Copy)]
pub(super) struct Delimiter {
    pub(super) node: NodeId,
    /// Byte offset just past the run in the block's content.
    pub(super) position: usize,
    /// Run length at scan time, for the rule of 3.
    pub(super) length: usize,
    pub(super) delim_char: u8,
    pub(super) can_open: bool,
    pub(super) can_close: bool,
    previous: Option<usize>,
    next: Option<usize>,
    removed: bool,
}

/// Doubly linked list of delimiters stored in a `Vec`, so entries keep
/// their index after neighbours are removed.
#[derive(Debug, Default)]
pub(super) struct DelimiterStack {
    entries: Vec<Delimiter>,
    last: Option<usize>,
}

impl DelimiterStack {
    pub(super) fn push(
        &mut self,
        node: NodeId,
        position: usize,
        length: usize,
        delim_char: u8,
        can_open: bool,
        can_close: bool,
    ) {
        let index = self.entries.len();
        if let Some(last) = self.last {
            self.entries[last].next = Some(index);
        }
        self.entries.push(Delimiter {
            node,
            position,
            length,
            delim_char,
            can_open,
            can_close,
            previous: self.last,
            next: None,
            removed: false,
        });
        self.last = Some(index);
    }

    fn remove(&mut self, index: usize) {
        let Some(delim) = self.entries.get(index).copied() else {
            return;
        };
        if delim.removed {
            return;
        }
        if let Some(previous) = delim.previous {
            self.entries[previous].next = delim.next;
        }
        match delim.next {
            Some(next) => self.entries[next].previous = delim.previous,
            None => self.last = delim.previous,
        }
        self.entries[index].removed = true;
    }
}

fn text_len(tree: &Tree, node: NodeId) -> usize {
    tree.string_content(node).len()
}

fn set_text(tree: &mut Tree, node: NodeId, text: &str) {
    if let Some(NodeValue::Text(literal)) = tree.get_mut(node).map(|data| &mut data.value) {
        literal.clear();
        literal.push_str(text);
    }
}

fn openers_bottom_index(delim: &Delimiter) -> usize {
    let by_length = (if delim.can_open { 3 } else { 0 }) + delim.length % 3;
    match delim.delim_char {
        b'"' => 0,
        b'\'' => 1,
        b'_' => 2 + by_length,
        _ => 8 + by_length,
    }
}

/// Resolve every delimiter above `stack_bottom` (a byte position), then
/// drop them from the stack.
pub(super) fn process_emphasis(tree: &mut Tree, stack: &mut DelimiterStack, stack_bottom: usize) {
    let mut openers_bottom = [stack_bottom; 14];

    // Find the first delimiter above the bottom.
    let mut closer = None;
    let mut candidate = stack.last;
    while let Some(index) = candidate
        && stack.entries[index].position >= stack_bottom
    {
        closer = Some(index);
        candidate = stack.entries[index].previous;
    }

    while let Some(closer_index) = closer {
        let current = stack.entries[closer_index];
        if !current.can_close {
            closer = current.next;
            continue;
        }

        let bottom_index = openers_bottom_index(&current);
        let mut opener = current.previous;
        let mut found = false;
        while let Some(opener_index) = opener {
            let candidate = stack.entries[opener_index];
            if candidate.position < stack_bottom
                || candidate.position < openers_bottom[bottom_index]
            {
                break;
            }
            if candidate.can_open && candidate.delim_char == current.delim_char {
                let odd_match = (current.can_open || candidate.can_close)
                    && current.length % 3 != 0
                    && (candidate.length + current.length) % 3 == 0;
                if !odd_match {
                    found = true;
                    break;
                }
            }
            opener = candidate.previous;
        }

        match current.delim_char {
            b'*' | b'_' => {
                closer = match opener {
                    Some(opener_index) if found => {
                        insert_emph(tree, stack, opener_index, closer_index)
                    }
                    _ => current.next,
                };
            }
            quote => {
                let (left, right) = if quote == b'\'' {
                    (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE)
                } else {
                    (LEFT_DOUBLE_QUOTE, RIGHT_DOUBLE_QUOTE)
                };
                set_text(tree, current.node, right);
                if let Some(opener_index) = opener
                    && found
                {
                    set_text(tree, stack.entries[opener_index].node, left);
                    stack.remove(opener_index);
                    stack.remove(closer_index);
                }
                closer = current.next;
            }
        }

        if !found {
            // No opener for this closer below here; later closers of the
            // same class can stop searching at this point.
            openers_bottom[bottom_index] = current.position;
            if !current.can_open {
                stack.remove(closer_index);
            }
        }
    }

    while let Some(last) = stack.last
        && stack.entries[last].position >= stack_bottom
    {
        stack.remove(last);
    }
}

/// Wrap the nodes between an opener and a closer in `Emph` or `Strong`.
/// Returns the delimiter to continue from.
fn insert_emph(
    tree: &mut Tree,
    stack: &mut DelimiterStack,
    opener_index: usize,
    closer_index: usize,
) -> Option<usize> {
    let opener = stack.entries[opener_index];
    let closer = stack.entries[closer_index];
    let opener_chars = text_len(tree, opener.node);
    let closer_chars = text_len(tree, closer.node);
    let used = if opener_chars >= 2 && closer_chars >= 2 { 2 } else { 1 };

    let opener_left = opener_chars - used;
    let closer_left = closer_chars - used;
    let delim = (opener.delim_char as char).to_string();
    set_text(tree, opener.node, &delim.repeat(opener_left));
    set_text(tree, closer.node, &delim.repeat(closer_left));

    // Delimiters between the two can no longer match anything.
    let mut between = closer.previous;
    while let Some(index) = between
        && index != opener_index
    {
        between = stack.entries[index].previous;
        stack.remove(index);
    }

    let emph = tree.alloc(if used == 1 {
        NodeValue::Emph
    } else {
        NodeValue::Strong
    });
    let mut child = tree.node(opener.node).next;
    while let Some(id) = child
        && id != closer.node
    {
        child = tree.node(id).next;
        tree.append_unchecked(emph, id);
    }
    tree.insert_after_internal(opener.node, emph);

    let start = tree.node(opener.node).sourcepos;
    let end = tree.node(closer.node).sourcepos;
    tree.node_mut(emph).sourcepos = Sourcepos {
        start_line: start.start_line,
        start_column: start.start_column,
        end_line: end.end_line,
        end_column: end.end_column,
    };

    if opener_left == 0 {
        tree.detach(opener.node);
        tree.free_subtree(opener.node);
        stack.remove(opener_index);
    }
    if closer_left == 0 {
        tree.detach(closer.node);
        tree.free_subtree(closer.node);
        let next = closer.next;
        stack.remove(closer_index);
        return next;
    }
    Some(closer_index)
}
