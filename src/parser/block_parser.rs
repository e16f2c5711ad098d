//! Line-oriented block structure parser.
//!
//! Each line is matched against the chain of open blocks, may open new
//! blocks, and finally has its remaining text added to the innermost one.
//! Blocks that stop matching are closed and finalized. Inline content is
//! parsed only after the whole document has been read.

use std::mem;

use crate::config::Config;
use crate::parser::inline_parser::{self, entities::unescape_string};
use crate::tree::{
    CodeBlockData, HeadingData, HtmlBlockData, ListData, NodeId, NodeKind, NodeValue, Sourcepos,
    Tree,
};

mod code_blocks;
mod container_stack;
mod headings;
mod horizontal_rules;
mod html_blocks;
mod lists;
pub(crate) mod reference_definitions;
pub(crate) mod utils;

use code_blocks::{try_parse_fence_close, try_parse_fence_open};
use container_stack::ContainerStack;
use headings::{chop_trailing_hashes, try_parse_atx_heading, try_parse_setext_underline};
use horizontal_rules::try_parse_thematic_break;
use html_blocks::{html_block_ends, try_parse_html_block_start, try_parse_html_block_start_7};
use lists::{lists_match, try_parse_list_marker};
use reference_definitions::{ReferenceRegistry, try_parse_reference_definition};
use utils::{is_blank, is_line_end, is_space_or_tab, peek, remove_trailing_blank_lines};

const TAB_STOP: usize = 4;
const CODE_INDENT: usize = 4;

/// Lists nested deeper than this stop recognizing new list markers.
pub(crate) const MAX_LIST_DEPTH: usize = 100;

pub(crate) struct BlockParser {
    tree: Tree,
    containers: ContainerStack,
    reference_registry: ReferenceRegistry,
    config: Config,
    line_number: usize,
    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,
    thematic_break_kill_pos: usize,
    /// Set while a line is being processed; blocks closed by a line end on
    /// the line before it.
    in_line: bool,
    last_line_length: usize,
}

impl BlockParser {
    pub(crate) fn new(config: &Config) -> Self {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.node_mut(root).sourcepos = Sourcepos {
            start_line: 1,
            start_column: 1,
            end_line: 0,
            end_column: 0,
        };
        Self {
            containers: ContainerStack::new(root),
            tree,
            reference_registry: ReferenceRegistry::new(),
            config: config.clone(),
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
            thematic_break_kill_pos: 0,
            in_line: false,
            last_line_length: 0,
        }
    }

    /// Processes one line of input, given without its terminator.
    pub(crate) fn process_line(&mut self, text: &str) {
        let mut line = String::with_capacity(text.len() + 1);
        if text.contains('\0') {
            line.push_str(&text.replace('\0', "\u{FFFD}"));
        } else {
            line.push_str(text);
        }
        let line_len = line.len();
        line.push('\n');

        self.offset = 0;
        self.column = 0;
        self.first_nonspace = 0;
        self.first_nonspace_column = 0;
        self.indent = 0;
        self.blank = false;
        self.partially_consumed_tab = false;
        self.thematic_break_kill_pos = 0;
        self.line_number += 1;
        self.in_line = true;

        log::trace!("line {}: {:?}", self.line_number, text);

        let old_tip = self.containers.last();
        if let Some((last_matched, all_matched)) = self.check_open_blocks(&line) {
            let last_matched_node = self.containers.get(last_matched);
            let container = self.open_new_blocks(&line, last_matched, all_matched);
            self.add_text_to_container(&line, container, last_matched_node, old_tip);
        }

        self.last_line_length = line_len;
        self.in_line = false;
    }

    /// Closes every open block, runs the inline pass, and hands back the
    /// finished tree.
    pub(crate) fn finish(mut self) -> Tree {
        self.close_to(0);

        let root = self.tree.root();
        let leaves: Vec<NodeId> = self
            .tree
            .descendants(root)
            .filter(|&id| {
                matches!(
                    self.tree.kind(id),
                    Some(NodeKind::Paragraph | NodeKind::Heading)
                )
            })
            .collect();
        log::debug!(
            "block pass done: {} lines, {} inline containers, {} reference definitions",
            self.line_number,
            leaves.len(),
            self.reference_registry.len()
        );

        for leaf in leaves {
            inline_parser::parse_inlines(
                &mut self.tree,
                leaf,
                &self.reference_registry,
                &self.config,
            );
        }
        if self.config.normalize {
            self.tree.consolidate_text_nodes(root);
        }
        self.tree
    }

    fn kind_at(&self, depth: usize) -> NodeKind {
        self.tree.node(self.containers.get(depth)).value.kind()
    }

    fn find_first_nonspace(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut chars_to_tab = TAB_STOP - (self.column % TAB_STOP);

        self.first_nonspace = self.offset;
        self.first_nonspace_column = self.column;
        while let Some(&b) = bytes.get(self.first_nonspace) {
            match b {
                b' ' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += 1;
                    chars_to_tab -= 1;
                    if chars_to_tab == 0 {
                        chars_to_tab = TAB_STOP;
                    }
                }
                b'\t' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += chars_to_tab;
                    chars_to_tab = TAB_STOP;
                }
                _ => break,
            }
        }

        self.indent = self.first_nonspace_column - self.column;
        self.blank = is_line_end(peek(line, self.first_nonspace));
    }

    /// Advances by `count` bytes, or by `count` columns when `columns` is
    /// set, in which case a tab may be only partially consumed.
    fn advance_offset(&mut self, line: &str, mut count: usize, columns: bool) {
        let bytes = line.as_bytes();
        while count > 0 {
            let Some(&b) = bytes.get(self.offset) else {
                break;
            };
            if b == b'\t' {
                let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
                if columns {
                    self.partially_consumed_tab = chars_to_tab > count;
                    let advance = chars_to_tab.min(count);
                    self.column += advance;
                    self.offset += if self.partially_consumed_tab { 0 } else { 1 };
                    count -= advance;
                } else {
                    self.partially_consumed_tab = false;
                    self.column += chars_to_tab;
                    self.offset += 1;
                    count -= 1;
                }
            } else {
                self.partially_consumed_tab = false;
                self.offset += 1;
                self.column += 1;
                count -= 1;
            }
        }
    }

    /// Matches the line against the open blocks below the document.
    ///
    /// Returns the depth of the deepest block the line continues and whether
    /// every open block matched. `None` means the line was a closing code
    /// fence and has been consumed.
    fn check_open_blocks(&mut self, line: &str) -> Option<(usize, bool)> {
        for depth in 1..self.containers.depth() {
            let node = self.containers.get(depth);
            self.find_first_nonspace(line);

            let matched = match self.tree.node(node).value.kind() {
                NodeKind::BlockQuote => self.parse_block_quote_prefix(line),
                NodeKind::Item => self.parse_item_prefix(line, node),
                NodeKind::CodeBlock => self.parse_code_block_prefix(line, node, depth)?,
                NodeKind::HtmlBlock => self.parse_html_block_prefix(node),
                NodeKind::Heading => false,
                NodeKind::Paragraph => !self.blank,
                _ => true,
            };
            if !matched {
                return Some((depth - 1, false));
            }
        }
        Some((self.containers.depth() - 1, true))
    }

    fn parse_block_quote_prefix(&mut self, line: &str) -> bool {
        if self.indent <= 3 && peek(line, self.first_nonspace) == b'>' {
            self.advance_offset(line, self.indent + 1, true);
            if is_space_or_tab(peek(line, self.offset)) {
                self.advance_offset(line, 1, true);
            }
            true
        } else {
            false
        }
    }

    fn parse_item_prefix(&mut self, line: &str, item: NodeId) -> bool {
        let data = self.tree.node(item);
        let NodeValue::Item(list) = &data.value else {
            return false;
        };
        let content_indent = list.marker_offset + list.padding;
        let has_children = data.first_child.is_some();

        if self.indent >= content_indent {
            self.advance_offset(line, content_indent, true);
            true
        } else if self.blank && has_children {
            self.advance_offset(line, self.first_nonspace - self.offset, false);
            true
        } else {
            false
        }
    }

    /// `None` when the line closes the fenced block at `depth`.
    fn parse_code_block_prefix(&mut self, line: &str, code: NodeId, depth: usize) -> Option<bool> {
        let NodeValue::CodeBlock(data) = &self.tree.node(code).value else {
            return Some(false);
        };
        let (fenced, fence_char, fence_length, fence_offset) =
            (data.fenced, data.fence_char, data.fence_length, data.fence_offset);

        if !fenced {
            return Some(if self.indent >= CODE_INDENT {
                self.advance_offset(line, CODE_INDENT, true);
                true
            } else if self.blank {
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                true
            } else {
                false
            });
        }

        let closing = if self.indent <= 3 && peek(line, self.first_nonspace) == fence_char {
            try_parse_fence_close(line, self.first_nonspace)
        } else {
            None
        };
        if let Some(length) = closing
            && length >= fence_length
        {
            self.close_to(depth);
            self.end_on_current_line(code, line);
            return None;
        }

        let mut remaining = fence_offset;
        while remaining > 0 && peek(line, self.offset) == b' ' {
            self.advance_offset(line, 1, true);
            remaining -= 1;
        }
        Some(true)
    }

    fn parse_html_block_prefix(&self, html: NodeId) -> bool {
        match &self.tree.node(html).value {
            NodeValue::HtmlBlock(data) => match data.block_type {
                1..=5 => true,
                _ => !self.blank,
            },
            _ => false,
        }
    }

    fn list_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|&id| self.tree.node(id).value.kind() == NodeKind::List)
            .count()
    }

    /// Opens every block the line starts, beginning at the deepest matched
    /// block. Returns the depth of the block that receives the line's text.
    fn open_new_blocks(&mut self, line: &str, mut container: usize, all_matched: bool) -> usize {
        let mut maybe_lazy = self.tree.node(self.containers.last()).value.kind() == NodeKind::Paragraph;

        loop {
            let kind = self.kind_at(container);
            if matches!(kind, NodeKind::CodeBlock | NodeKind::HtmlBlock) {
                break;
            }

            self.find_first_nonspace(line);
            let indented = self.indent >= CODE_INDENT;
            let c = peek(line, self.first_nonspace);

            if !indented && c == b'>' {
                let start_column = self.first_nonspace + 1;
                self.advance_offset(line, self.first_nonspace + 1 - self.offset, false);
                if is_space_or_tab(peek(line, self.offset)) {
                    self.advance_offset(line, 1, true);
                }
                container = self.add_child(container, NodeValue::BlockQuote, start_column);
            } else if !indented
                && let Some((level, width)) = try_parse_atx_heading(line, self.first_nonspace)
            {
                let start_column = self.first_nonspace + 1;
                self.advance_offset(line, self.first_nonspace + width - self.offset, false);
                let heading = NodeValue::Heading(HeadingData {
                    level,
                    setext: false,
                });
                container = self.add_child(container, heading, start_column);
            } else if !indented
                && let Some(fence_length) = try_parse_fence_open(line, self.first_nonspace)
            {
                let code = NodeValue::CodeBlock(CodeBlockData {
                    fenced: true,
                    fence_char: c,
                    fence_length,
                    fence_offset: self.first_nonspace - self.offset,
                    ..CodeBlockData::default()
                });
                container = self.add_child(container, code, self.first_nonspace + 1);
                self.advance_offset(line, self.first_nonspace + fence_length - self.offset, false);
            } else if !indented
                && let Some(block_type) = try_parse_html_block_start(line, self.first_nonspace)
                    .or_else(|| {
                        if kind == NodeKind::Paragraph {
                            None
                        } else {
                            try_parse_html_block_start_7(line, self.first_nonspace)
                        }
                    })
            {
                let html = NodeValue::HtmlBlock(HtmlBlockData {
                    literal: String::new(),
                    block_type,
                });
                container = self.add_child(container, html, self.first_nonspace + 1);
            } else if !indented
                && kind == NodeKind::Paragraph
                && let Some(level) = try_parse_setext_underline(line, self.first_nonspace)
            {
                let paragraph = self.containers.get(container);
                if self.resolve_reference_definitions(paragraph) {
                    self.tree.node_mut(paragraph).value =
                        NodeValue::Heading(HeadingData { level, setext: true });
                    self.advance_offset(line, line.len() - 1 - self.offset, false);
                }
            } else if !indented
                && !(kind == NodeKind::Paragraph && !all_matched)
                && self.thematic_break_kill_pos <= self.first_nonspace
                && self.try_thematic_break(line)
            {
                container = self.add_child(container, NodeValue::ThematicBreak, self.first_nonspace + 1);
                self.advance_offset(line, line.len() - 1 - self.offset, false);
            } else if (!indented || kind == NodeKind::List)
                && self.indent < CODE_INDENT
                && self.list_depth() < MAX_LIST_DEPTH
                && let Some((width, data)) =
                    try_parse_list_marker(line, self.first_nonspace, kind == NodeKind::Paragraph)
            {
                container = self.open_list_item(line, container, kind, width, data);
            } else if indented && !maybe_lazy && !self.blank {
                self.advance_offset(line, CODE_INDENT, true);
                let start_column = self.offset + 1;
                container = self.add_child(
                    container,
                    NodeValue::CodeBlock(CodeBlockData::default()),
                    start_column,
                );
            } else {
                break;
            }

            if self.kind_at(container).accepts_lines() {
                break;
            }
            maybe_lazy = false;
        }

        container
    }

    fn try_thematic_break(&mut self, line: &str) -> bool {
        match try_parse_thematic_break(line, self.first_nonspace) {
            Ok(_) => true,
            Err(stop) => {
                self.thematic_break_kill_pos = stop;
                false
            }
        }
    }

    fn open_list_item(
        &mut self,
        line: &str,
        container: usize,
        kind: NodeKind,
        width: usize,
        mut data: ListData,
    ) -> usize {
        let start_column = self.first_nonspace + 1;
        self.advance_offset(line, self.first_nonspace + width - self.offset, false);

        let (saved_tab, saved_offset, saved_column) =
            (self.partially_consumed_tab, self.offset, self.column);
        while self.column - saved_column <= 5 && is_space_or_tab(peek(line, self.offset)) {
            self.advance_offset(line, 1, true);
        }

        let spaces = self.column - saved_column;
        if !(1..5).contains(&spaces) || is_line_end(peek(line, self.offset)) {
            // Content starts one space after the marker; the rest is indent
            // belonging to the content (typically indented code).
            data.padding = width + 1;
            self.partially_consumed_tab = saved_tab;
            self.offset = saved_offset;
            self.column = saved_column;
            if spaces > 0 {
                self.advance_offset(line, 1, true);
            }
        } else {
            data.padding = width + spaces;
        }
        data.marker_offset = self.indent;

        let mut container = container;
        let continues_list = match &self.tree.node(self.containers.get(container)).value {
            NodeValue::List(list) if kind == NodeKind::List => lists_match(list, &data),
            _ => false,
        };
        if !continues_list {
            container = self.add_child(container, NodeValue::List(data.clone()), start_column);
        }
        self.add_child(container, NodeValue::Item(data), start_column)
    }

    /// Adds a new open block under the container at `depth`, closing
    /// blocks above it and any that cannot hold the new kind.
    fn add_child(&mut self, depth: usize, value: NodeValue, start_column: usize) -> usize {
        self.close_to(depth + 1);
        let kind = value.kind();
        while self.containers.depth() > 1
            && !self.tree.node(self.containers.last()).value.kind().can_contain(kind)
        {
            self.close_to(self.containers.depth() - 1);
        }

        let parent = self.containers.last();
        let child = self.tree.alloc(value);
        self.tree.node_mut(child).sourcepos = Sourcepos {
            start_line: self.line_number,
            start_column,
            end_line: 0,
            end_column: 0,
        };
        self.tree.append_unchecked(parent, child);
        self.containers.push(child);
        log::trace!("opened {kind} at {}:{start_column}", self.line_number);
        self.containers.depth() - 1
    }

    fn add_text_to_container(
        &mut self,
        line: &str,
        container: usize,
        last_matched: NodeId,
        old_tip: NodeId,
    ) {
        self.find_first_nonspace(line);
        let node = self.containers.get(container);

        if self.blank
            && let Some(last_child) = self.tree.node(node).last_child
        {
            self.tree.node_mut(last_child).last_line_blank = true;
        }

        let data = self.tree.node(node);
        let last_line_blank = self.blank
            && match &data.value {
                NodeValue::BlockQuote | NodeValue::Heading(_) | NodeValue::ThematicBreak => false,
                NodeValue::CodeBlock(code) => !code.fenced,
                NodeValue::Item(_) => {
                    !(data.first_child.is_none() && data.sourcepos.start_line == self.line_number)
                }
                _ => true,
            };
        self.tree.node_mut(node).last_line_blank = last_line_blank;
        for depth in 0..container {
            let ancestor = self.containers.get(depth);
            self.tree.node_mut(ancestor).last_line_blank = false;
        }

        // Lazy paragraph continuation.
        if old_tip != last_matched
            && node == last_matched
            && !self.blank
            && self.tree.get(old_tip).is_some_and(|tip| tip.value.kind() == NodeKind::Paragraph)
        {
            self.add_line(line, old_tip);
            return;
        }

        self.close_to(container + 1);

        match &self.tree.node(node).value {
            NodeValue::CodeBlock(_) => self.add_line(line, node),
            NodeValue::HtmlBlock(html) => {
                let block_type = html.block_type;
                self.add_line(line, node);
                if html_block_ends(block_type, line, self.first_nonspace) {
                    self.close_to(container);
                    self.end_on_current_line(node, line);
                }
            }
            _ if self.blank => {}
            NodeValue::Heading(heading) => {
                let end = if heading.setext {
                    line.len()
                } else {
                    chop_trailing_hashes(line)
                };
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                self.add_line(&line[..end], node);
            }
            NodeValue::Paragraph => {
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                self.add_line(line, node);
            }
            _ => {
                let start_column = self.first_nonspace + 1;
                let paragraph = self.add_child(container, NodeValue::Paragraph, start_column);
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                let paragraph = self.containers.get(paragraph);
                self.add_line(line, paragraph);
            }
        }
    }

    fn add_line(&mut self, line: &str, node: NodeId) {
        let mut padding = 0;
        if self.partially_consumed_tab {
            self.offset += 1;
            padding = TAB_STOP - (self.column % TAB_STOP);
        }
        let rest = line.get(self.offset..).unwrap_or("");
        let content = &mut self.tree.node_mut(node).content;
        content.extend(std::iter::repeat_n(' ', padding));
        content.push_str(rest);
    }

    /// For blocks closed by their own end marker rather than by a later line.
    fn end_on_current_line(&mut self, node: NodeId, line: &str) {
        if let Some(data) = self.tree.get_mut(node) {
            data.sourcepos.end_line = self.line_number;
            data.sourcepos.end_column = line.len() - 1;
        }
    }

    fn close_to(&mut self, keep: usize) {
        while self.containers.depth() > keep {
            if let Some(node) = self.containers.pop() {
                self.finalize(node);
            }
        }
    }

    fn finalize(&mut self, node: NodeId) {
        let kind = self.tree.node(node).value.kind();
        let end_line = if self.in_line {
            self.line_number.saturating_sub(1)
        } else {
            self.line_number
        };
        let end_column = self.last_line_length;
        let sourcepos = &mut self.tree.node_mut(node).sourcepos;
        sourcepos.end_line = end_line;
        sourcepos.end_column = end_column;

        log::trace!("closing {kind} ending at {end_line}:{end_column}");

        match kind {
            NodeKind::Paragraph => {
                if !self.resolve_reference_definitions(node) {
                    self.tree.detach(node);
                    self.tree.free_subtree(node);
                }
            }
            NodeKind::CodeBlock => self.finalize_code_block(node),
            NodeKind::HtmlBlock => {
                let data = self.tree.node_mut(node);
                let content = mem::take(&mut data.content);
                if let NodeValue::HtmlBlock(html) = &mut data.value {
                    html.literal = content;
                }
            }
            NodeKind::List => {
                let tight = self.list_is_tight(node);
                if let NodeValue::List(list) = &mut self.tree.node_mut(node).value {
                    list.tight = tight;
                }
            }
            _ => {}
        }
    }

    fn finalize_code_block(&mut self, node: NodeId) {
        let data = self.tree.node_mut(node);
        let mut content = mem::take(&mut data.content);
        let NodeValue::CodeBlock(code) = &mut data.value else {
            return;
        };

        if code.fenced {
            let (first_line, rest) = match content.find('\n') {
                Some(nl) => (&content[..nl], &content[nl + 1..]),
                None => (content.as_str(), ""),
            };
            code.info = unescape_string(first_line.trim_matches(|c: char| {
                c.is_ascii() && utils::is_markdown_space(c as u8)
            }));
            code.literal = rest.to_string();
        } else {
            remove_trailing_blank_lines(&mut content);
            content.push('\n');
            code.literal = content;
        }
    }

    /// Strips leading reference definitions from a paragraph. Returns
    /// whether anything other than whitespace is left.
    fn resolve_reference_definitions(&mut self, paragraph: NodeId) -> bool {
        let content = mem::take(&mut self.tree.node_mut(paragraph).content);
        let mut rest = content.as_str();
        while rest.starts_with('[')
            && let Some(consumed) =
                try_parse_reference_definition(rest, &mut self.reference_registry)
        {
            rest = &rest[consumed..];
        }
        let has_content = !is_blank(rest);
        self.tree.node_mut(paragraph).content = rest.to_string();
        has_content
    }

    fn ends_with_blank_line(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let data = self.tree.node(id);
            if data.last_line_blank {
                return true;
            }
            current = match data.value.kind() {
                NodeKind::List | NodeKind::Item => data.last_child,
                _ => None,
            };
        }
        false
    }

    fn list_is_tight(&self, list: NodeId) -> bool {
        for item in self.tree.children(list) {
            let item_data = self.tree.node(item);
            if item_data.last_line_blank && item_data.next.is_some() {
                return false;
            }
            for child in self.tree.children(item) {
                let has_following = item_data.next.is_some() || self.tree.node(child).next.is_some();
                if has_following && self.ends_with_blank_line(child) {
                    return false;
                }
            }
        }
        true
    }
}
