//! Node kinds and the containment rules between them.

use std::fmt;

/// The closed set of node types a [`Tree`](super::Tree) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    // Blocks
    Document,
    BlockQuote,
    List,
    Item,
    CodeBlock,
    HtmlBlock,
    CustomBlock,
    Paragraph,
    Heading,
    ThematicBreak,

    // Inlines
    Text,
    SoftBreak,
    LineBreak,
    Code,
    HtmlInline,
    CustomInline,
    Emph,
    Strong,
    Link,
    Image,
}

impl NodeKind {
    /// Snake-case name used by the debug printer and error messages.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::BlockQuote => "block_quote",
            NodeKind::List => "list",
            NodeKind::Item => "item",
            NodeKind::CodeBlock => "code_block",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::CustomBlock => "custom_block",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::ThematicBreak => "thematic_break",
            NodeKind::Text => "text",
            NodeKind::SoftBreak => "softbreak",
            NodeKind::LineBreak => "linebreak",
            NodeKind::Code => "code",
            NodeKind::HtmlInline => "html_inline",
            NodeKind::CustomInline => "custom_inline",
            NodeKind::Emph => "emph",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
        }
    }

    pub fn is_block(self) -> bool {
        self <= NodeKind::ThematicBreak
    }

    pub fn is_inline(self) -> bool {
        !self.is_block()
    }

    /// Kinds that never have children. Traversal emits only an enter event
    /// for these.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::ThematicBreak
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::Text
                | NodeKind::SoftBreak
                | NodeKind::LineBreak
                | NodeKind::Code
                | NodeKind::HtmlInline
        )
    }

    /// Whether a node of this kind may directly contain a `child` node.
    pub fn can_contain(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Document
            | NodeKind::BlockQuote
            | NodeKind::Item
            | NodeKind::CustomBlock => child.is_block() && child != NodeKind::Item,
            NodeKind::List => child == NodeKind::Item,
            NodeKind::Paragraph
            | NodeKind::Heading
            | NodeKind::Emph
            | NodeKind::Strong
            | NodeKind::Link
            | NodeKind::Image
            | NodeKind::CustomInline => child.is_inline(),
            _ => false,
        }
    }

    /// Leaf blocks that collect raw lines while the block parser has them open.
    pub(crate) fn accepts_lines(self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_inline_split() {
        assert!(NodeKind::Document.is_block());
        assert!(NodeKind::ThematicBreak.is_block());
        assert!(NodeKind::Text.is_inline());
        assert!(NodeKind::Image.is_inline());
        assert!(!NodeKind::Text.is_block());
    }

    #[test]
    fn test_list_only_contains_items() {
        assert!(NodeKind::List.can_contain(NodeKind::Item));
        assert!(!NodeKind::List.can_contain(NodeKind::Paragraph));
        assert!(!NodeKind::Document.can_contain(NodeKind::Item));
    }

    #[test]
    fn test_inline_containers() {
        assert!(NodeKind::Heading.can_contain(NodeKind::Text));
        assert!(NodeKind::Paragraph.can_contain(NodeKind::Link));
        assert!(!NodeKind::Paragraph.can_contain(NodeKind::Paragraph));
        assert!(!NodeKind::Text.can_contain(NodeKind::Text));
    }

    #[test]
    fn test_names() {
        assert_eq!(NodeKind::BlockQuote.to_string(), "block_quote");
        assert_eq!(NodeKind::HtmlInline.name(), "html_inline");
    }
}
