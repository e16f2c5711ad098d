//! Inline parser.
//!
//! Runs once per paragraph or heading after the block structure is
//! complete. The content is scanned left to right. Most constructs are
//! recognized on the spot; emphasis and links are resolved later through
//! the delimiter and bracket stacks, once their closers have been seen.

use crate::config::Config;
use crate::parser::block_parser::reference_definitions::ReferenceRegistry;
use crate::tree::{LinkData, NodeId, NodeValue, Sourcepos, Tree};

mod autolinks;
mod char_class;
mod code_spans;
mod emphasis;
pub(crate) mod entities;
pub(crate) mod links;
pub(crate) mod raw_html;
mod smart;


use autolinks::try_parse_autolink;
use code_spans::{BacktickCache, try_parse_code_span};
use emphasis::{DelimiterStack, analyze_delimiter_run, process_emphasis};
use entities::try_parse_entity;
use links::{
    MAX_LINK_LABEL_LENGTH, scan_link_destination, scan_link_label, scan_link_title,
    scan_spacechars,
};
use raw_html::try_parse_html_tag;

/// Brackets opened beyond this depth stay literal text.
pub(crate) const MAX_LINK_NESTING: usize = 1000;

/// Parses the raw content collected for `block` into inline children.
pub(crate) fn parse_inlines(
    tree: &mut Tree,
    block: NodeId,
    refmap: &ReferenceRegistry,
    config: &Config,
) {
    let content = std::mem::take(&mut tree.node_mut(block).content);
    let input = content.trim_end_matches(|c: char| c.is_ascii_whitespace());

    let mut subject = Subject::new(tree, block, input, refmap, config.smart);
    while subject.parse_inline() {}
    process_emphasis(subject.tree, &mut subject.delimiters, 0);

    log::trace!(
        "inlines for {} at line {}: {} bytes",
        subject.tree.kind_name(block),
        subject.first_line,
        input.len()
    );
}

/// An entry on the bracket stack: a `[` or `![` that may still become a
/// link or image.
#[derive(Debug)]
struct Bracket {
    node: NodeId,
    /// Byte offset just past the `[`.
    position: usize,
    image: bool,
    active: bool,
    /// Another bracket was opened after this one, which rules out the
    /// shortcut reference form.
    bracket_after: bool,
}

struct Subject<'a> {
    tree: &'a mut Tree,
    block: NodeId,
    input: &'a str,
    pos: usize,
    refmap: &'a ReferenceRegistry,
    smart: bool,
    delimiters: DelimiterStack,
    brackets: Vec<Bracket>,
    backticks: BacktickCache,
    line_starts: Vec<usize>,
    first_line: usize,
    column_offset: usize,
}

impl<'a> Subject<'a> {
    fn new(
        tree: &'a mut Tree,
        block: NodeId,
        input: &'a str,
        refmap: &'a ReferenceRegistry,
        smart: bool,
    ) -> Self {
        let block_pos = tree.node(block).sourcepos;
        let line_starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            tree,
            block,
            input,
            pos: 0,
            refmap,
            smart,
            delimiters: DelimiterStack::default(),
            brackets: Vec::new(),
            backticks: BacktickCache::new(),
            line_starts,
            first_line: block_pos.start_line,
            column_offset: block_pos.start_column.saturating_sub(1),
        }
    }

    fn peek_at(&self, pos: usize) -> u8 {
        self.input.as_bytes().get(pos).copied().unwrap_or(0)
    }

    fn peek(&self) -> u8 {
        self.peek_at(self.pos)
    }

    fn is_special(&self, b: u8) -> bool {
        match b {
            b'\n' | b'\r' | b'!' | b'&' | b'*' | b'<' | b'[' | b'\\' | b']' | b'_' | b'`' => true,
            b'"' | b'\'' | b'-' | b'.' => self.smart,
            _ => false,
        }
    }

    /// Line and column of a byte offset. Columns are relative to the
    /// block's start column, which is exact for the first line only.
    fn position(&self, pos: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (
            self.first_line + line,
            pos - self.line_starts[line] + 1 + self.column_offset,
        )
    }

    fn set_sourcepos(&mut self, node: NodeId, start: usize, end: usize) {
        let (start_line, start_column) = self.position(start);
        let (end_line, end_column) = self.position(end.max(start + 1) - 1);
        self.tree.node_mut(node).sourcepos = Sourcepos {
            start_line,
            start_column,
            end_line,
            end_column,
        };
    }

    /// Appends a new inline spanning `start..end` to the block.
    fn append(&mut self, value: NodeValue, start: usize, end: usize) -> NodeId {
        let node = self.tree.alloc(value);
        self.set_sourcepos(node, start, end);
        self.tree.append_unchecked(self.block, node);
        node
    }

    fn append_text(&mut self, text: impl Into<String>, start: usize, end: usize) -> NodeId {
        self.append(NodeValue::Text(text.into()), start, end)
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), b' ' | b'\t') {
            self.pos += 1;
        }
    }

    fn skip_line_end(&mut self) {
        if self.peek() == b'\r' {
            self.pos += 1;
        }
        if self.peek() == b'\n' {
            self.pos += 1;
        }
    }

    /// Parses the next inline. Returns `false` at the end of the input.
    fn parse_inline(&mut self) -> bool {
        let c = self.peek();
        if self.pos >= self.input.len() {
            return false;
        }

        match c {
            b'\n' | b'\r' => self.handle_newline(),
            b'`' => self.handle_backticks(),
            b'\\' => self.handle_backslash(),
            b'&' => self.handle_entity(),
            b'<' => self.handle_pointy_brace(),
            b'*' | b'_' => self.handle_delim(c),
            b'"' | b'\'' if self.smart => self.handle_delim(c),
            b'-' if self.smart => self.handle_hyphen(),
            b'.' if self.smart => self.handle_period(),
            b'[' => {
                let start = self.pos;
                self.pos += 1;
                let node = self.append_text("[", start, self.pos);
                self.push_bracket(node, false);
            }
            b'!' if self.peek_at(self.pos + 1) == b'[' => {
                let start = self.pos;
                self.pos += 2;
                let node = self.append_text("![", start, self.pos);
                self.push_bracket(node, true);
            }
            b']' => self.handle_close_bracket(),
            _ => self.handle_text(),
        }
        true
    }

    /// A run of ordinary text up to the next special character. Spaces
    /// before a line ending are dropped.
    fn handle_text(&mut self) {
        let input = self.input;
        let start = self.pos;
        let bytes = input.as_bytes();
        let mut end = start + 1;
        while end < bytes.len() && !self.is_special(bytes[end]) {
            end += 1;
        }
        self.pos = end;

        let mut text_end = end;
        if matches!(self.peek(), b'\n' | b'\r') {
            while text_end > start && matches!(bytes[text_end - 1], b' ' | b'\t') {
                text_end -= 1;
            }
        }
        if text_end > start {
            self.append_text(&input[start..text_end], start, text_end);
        }
    }

    fn handle_newline(&mut self) {
        let nlpos = self.pos;
        let bytes = self.input.as_bytes();
        let hard = nlpos >= 2 && bytes[nlpos - 1] == b' ' && bytes[nlpos - 2] == b' ';
        self.skip_line_end();
        let value = if hard {
            NodeValue::LineBreak
        } else {
            NodeValue::SoftBreak
        };
        self.append(value, nlpos, nlpos + 1);
        self.skip_spaces();
    }

    fn handle_backticks(&mut self) {
        let start = self.pos;
        match try_parse_code_span(self.input, start, &mut self.backticks) {
            Some((end, code)) => {
                self.pos = end;
                self.append(NodeValue::Code(code), start, end);
            }
            None => {
                let input = self.input;
                let run = input.as_bytes()[start..]
                    .iter()
                    .take_while(|&&b| b == b'`')
                    .count();
                self.pos = start + run;
                self.append_text(&input[start..self.pos], start, self.pos);
            }
        }
    }

    fn handle_backslash(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let next = self.peek();
        if next.is_ascii_punctuation() {
            self.pos += 1;
            self.append_text((next as char).to_string(), start, self.pos);
        } else if matches!(next, b'\n' | b'\r') {
            self.skip_line_end();
            self.append(NodeValue::LineBreak, start, start + 1);
            self.skip_spaces();
        } else {
            self.append_text("\\", start, self.pos);
        }
    }

    fn handle_entity(&mut self) {
        let start = self.pos;
        self.pos += 1;
        match try_parse_entity(&self.input[self.pos..]) {
            Some((decoded, len)) => {
                self.pos += len;
                self.append_text(decoded, start, self.pos);
            }
            None => {
                self.append_text("&", start, self.pos);
            }
        }
    }

    /// Autolink, raw HTML, or a literal `<`.
    fn handle_pointy_brace(&mut self) {
        let start = self.pos;
        let input = self.input;
        let rest = &input[start..];

        if let Some(autolink) = try_parse_autolink(rest) {
            self.pos = start + autolink.len;
            let link = self.append(
                NodeValue::Link(LinkData {
                    url: autolink.url,
                    title: String::new(),
                }),
                start,
                self.pos,
            );
            let text = self.tree.alloc(NodeValue::Text(autolink.text));
            self.set_sourcepos(text, start + 1, self.pos - 1);
            self.tree.append_unchecked(link, text);
            return;
        }

        if let Some(len) = try_parse_html_tag(rest) {
            self.pos = start + len;
            self.append(NodeValue::HtmlInline(rest[..len].to_string()), start, self.pos);
            return;
        }

        self.pos += 1;
        self.append_text("<", start, self.pos);
    }

    /// Emits a delimiter run as text and records it for emphasis (or
    /// smart quote) resolution.
    fn handle_delim(&mut self, c: u8) {
        let input = self.input;
        let start = self.pos;
        let count = if matches!(c, b'\'' | b'"') {
            1
        } else {
            input.as_bytes()[start..]
                .iter()
                .take_while(|&&b| b == c)
                .count()
        };
        let end = start + count;
        let before = input[..start].chars().next_back().unwrap_or('\n');
        let after = input[end..].chars().next().unwrap_or('\n');
        let (can_open, can_close) = analyze_delimiter_run(c, before, after);
        self.pos = end;

        let text = match c {
            b'\'' => emphasis::RIGHT_SINGLE_QUOTE,
            b'"' if can_close => emphasis::RIGHT_DOUBLE_QUOTE,
            b'"' => emphasis::LEFT_DOUBLE_QUOTE,
            _ => &input[start..end],
        };
        let node = self.append_text(text, start, end);
        if can_open || can_close {
            self.delimiters.push(node, end, count, c, can_open, can_close);
        }
    }

    fn handle_hyphen(&mut self) {
        let start = self.pos;
        let count = self.input.as_bytes()[start..]
            .iter()
            .take_while(|&&b| b == b'-')
            .count();
        self.pos = start + count;
        if count == 1 {
            self.append_text("-", start, self.pos);
        } else {
            self.append_text(smart::dashes(count), start, self.pos);
        }
    }

    fn handle_period(&mut self) {
        let start = self.pos;
        if self.input[start..].starts_with("...") {
            self.pos += 3;
            self.append_text(smart::ELLIPSIS, start, self.pos);
        } else {
            self.pos += 1;
            self.append_text(".", start, self.pos);
        }
    }

    fn push_bracket(&mut self, node: NodeId, image: bool) {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        let active = self.brackets.len() < MAX_LINK_NESTING;
        self.brackets.push(Bracket {
            node,
            position: self.pos,
            image,
            active,
            bracket_after: false,
        });
    }

    /// Tries to close the innermost bracket as a link or image. Falls back
    /// to a literal `]`.
    fn handle_close_bracket(&mut self) {
        let close_start = self.pos;
        self.pos += 1;
        let after_close = self.pos;

        let Some(opener) = self.brackets.last() else {
            self.append_text("]", close_start, after_close);
            return;
        };
        if !opener.active {
            self.brackets.pop();
            self.append_text("]", close_start, after_close);
            return;
        }

        let target = self
            .scan_inline_link(after_close)
            .or_else(|| self.scan_reference(close_start, after_close));
        let Some((end, url, title)) = target else {
            self.brackets.pop();
            self.append_text("]", close_start, after_close);
            return;
        };
        self.pos = end;

        let Some(opener) = self.brackets.pop() else {
            return;
        };
        let data = LinkData { url, title };
        let link = self.tree.alloc(if opener.image {
            NodeValue::Image(data)
        } else {
            NodeValue::Link(data)
        });
        let start = self.tree.node(opener.node).sourcepos;
        let (end_line, end_column) = self.position(end - 1);
        self.tree.node_mut(link).sourcepos = Sourcepos {
            start_line: start.start_line,
            start_column: start.start_column,
            end_line,
            end_column,
        };

        // Everything after the opener's text node becomes the link text.
        self.tree.insert_before_internal(opener.node, link);
        let mut child = self.tree.node(opener.node).next;
        while let Some(id) = child {
            child = self.tree.node(id).next;
            self.tree.append_unchecked(link, id);
        }
        self.tree.detach(opener.node);
        self.tree.free_subtree(opener.node);

        process_emphasis(self.tree, &mut self.delimiters, opener.position);

        if !opener.image {
            // Links may not contain other links.
            for (index, bracket) in self.brackets.iter_mut().enumerate().rev() {
                if bracket.image {
                    continue;
                }
                if !bracket.active && index < MAX_LINK_NESTING {
                    break;
                }
                bracket.active = false;
            }
        }
        log::trace!("resolved {} ending at byte {end}", self.tree.kind_name(link));
    }

    /// `(destination "title")` right after the closing bracket.
    fn scan_inline_link(&self, after_close: usize) -> Option<(usize, String, String)> {
        if self.peek_at(after_close) != b'(' {
            return None;
        }
        let dest_start = after_close + 1 + scan_spacechars(self.input, after_close + 1);
        let (dest_end, url) = scan_link_destination(self.input, dest_start)?;

        let title_start = dest_end + scan_spacechars(self.input, dest_end);
        let (title_end, title) = if title_start == dest_end {
            (title_start, String::new())
        } else {
            scan_link_title(self.input, title_start).unwrap_or((title_start, String::new()))
        };

        let end = title_end + scan_spacechars(self.input, title_end);
        (self.peek_at(end) == b')').then(|| (end + 1, url, title))
    }

    /// Full, collapsed, or shortcut reference after the closing bracket.
    fn scan_reference(
        &self,
        close_start: usize,
        after_close: usize,
    ) -> Option<(usize, String, String)> {
        let opener = self.brackets.last()?;
        let link_text = &self.input[opener.position..close_start];
        let (label, end) = match scan_link_label(self.input, after_close) {
            Some((label_end, label)) if !label.is_empty() => (label, label_end),
            Some((label_end, _)) if !opener.bracket_after => (link_text, label_end),
            None if !opener.bracket_after => (link_text, after_close),
            _ => return None,
        };
        if label.chars().count() > MAX_LINK_LABEL_LENGTH {
            return None;
        }
        let reference = self.refmap.get(label)?;
        Some((end, reference.url.clone(), reference.title.clone()))
    }
}
