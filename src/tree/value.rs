//! Per-kind node payloads.

use super::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    #[default]
    Bullet,
    Ordered,
}

/// Delimiter after an ordered list number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDelimType {
    Period,
    Paren,
}

/// Metadata shared by lists and their items.
///
/// Items carry a copy of the data their marker produced; the parser uses it
/// to decide whether a new item continues the current list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListData {
    pub list_type: ListType,
    pub delimiter: Option<ListDelimType>,
    pub start: usize,
    pub tight: bool,
    pub bullet_char: u8,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Marker width plus the spaces that follow it.
    pub padding: usize,
}

impl Default for ListData {
    fn default() -> Self {
        Self {
            list_type: ListType::Bullet,
            delimiter: None,
            start: 1,
            tight: false,
            bullet_char: 0,
            marker_offset: 0,
            padding: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingData {
    pub level: u8,
    pub setext: bool,
}

impl Default for HeadingData {
    fn default() -> Self {
        Self {
            level: 1,
            setext: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockData {
    pub fenced: bool,
    pub fence_char: u8,
    pub fence_length: usize,
    pub fence_offset: usize,
    pub info: String,
    pub literal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlBlockData {
    pub literal: String,
    /// Which of the seven start conditions opened the block (0 when built
    /// by hand).
    pub(crate) block_type: u8,
}

impl HtmlBlockData {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            block_type: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkData {
    pub url: String,
    pub title: String,
}

/// Raw text emitted around the children of a custom node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomData {
    pub on_enter: String,
    pub on_exit: String,
}

/// Tagged node payload. The variant determines the node's [`NodeKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Document,
    BlockQuote,
    List(ListData),
    Item(ListData),
    CodeBlock(CodeBlockData),
    HtmlBlock(HtmlBlockData),
    CustomBlock(CustomData),
    Paragraph,
    Heading(HeadingData),
    ThematicBreak,
    Text(String),
    SoftBreak,
    LineBreak,
    Code(String),
    HtmlInline(String),
    CustomInline(CustomData),
    Emph,
    Strong,
    Link(LinkData),
    Image(LinkData),
}

impl NodeValue {
    /// Zero-valued payload for a freshly created node.
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Document => NodeValue::Document,
            NodeKind::BlockQuote => NodeValue::BlockQuote,
            NodeKind::List => NodeValue::List(ListData::default()),
            NodeKind::Item => NodeValue::Item(ListData::default()),
            NodeKind::CodeBlock => NodeValue::CodeBlock(CodeBlockData::default()),
            NodeKind::HtmlBlock => NodeValue::HtmlBlock(HtmlBlockData::default()),
            NodeKind::CustomBlock => NodeValue::CustomBlock(CustomData::default()),
            NodeKind::Paragraph => NodeValue::Paragraph,
            NodeKind::Heading => NodeValue::Heading(HeadingData::default()),
            NodeKind::ThematicBreak => NodeValue::ThematicBreak,
            NodeKind::Text => NodeValue::Text(String::new()),
            NodeKind::SoftBreak => NodeValue::SoftBreak,
            NodeKind::LineBreak => NodeValue::LineBreak,
            NodeKind::Code => NodeValue::Code(String::new()),
            NodeKind::HtmlInline => NodeValue::HtmlInline(String::new()),
            NodeKind::CustomInline => NodeValue::CustomInline(CustomData::default()),
            NodeKind::Emph => NodeValue::Emph,
            NodeKind::Strong => NodeValue::Strong,
            NodeKind::Link => NodeValue::Link(LinkData::default()),
            NodeKind::Image => NodeValue::Image(LinkData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Document => NodeKind::Document,
            NodeValue::BlockQuote => NodeKind::BlockQuote,
            NodeValue::List(_) => NodeKind::List,
            NodeValue::Item(_) => NodeKind::Item,
            NodeValue::CodeBlock(_) => NodeKind::CodeBlock,
            NodeValue::HtmlBlock(_) => NodeKind::HtmlBlock,
            NodeValue::CustomBlock(_) => NodeKind::CustomBlock,
            NodeValue::Paragraph => NodeKind::Paragraph,
            NodeValue::Heading(_) => NodeKind::Heading,
            NodeValue::ThematicBreak => NodeKind::ThematicBreak,
            NodeValue::Text(_) => NodeKind::Text,
            NodeValue::SoftBreak => NodeKind::SoftBreak,
            NodeValue::LineBreak => NodeKind::LineBreak,
            NodeValue::Code(_) => NodeKind::Code,
            NodeValue::HtmlInline(_) => NodeKind::HtmlInline,
            NodeValue::CustomInline(_) => NodeKind::CustomInline,
            NodeValue::Emph => NodeKind::Emph,
            NodeValue::Strong => NodeKind::Strong,
            NodeValue::Link(_) => NodeKind::Link,
            NodeValue::Image(_) => NodeKind::Image,
        }
    }

    /// The literal text of kinds that carry one.
    pub fn literal(&self) -> Option<&str> {
        match self {
            NodeValue::Text(s) | NodeValue::Code(s) | NodeValue::HtmlInline(s) => Some(s),
            NodeValue::CodeBlock(code) => Some(&code.literal),
            NodeValue::HtmlBlock(html) => Some(&html.literal),
            NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom) => {
                Some(&custom.on_enter)
            }
            _ => None,
        }
    }

    pub(crate) fn literal_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeValue::Text(s) | NodeValue::Code(s) | NodeValue::HtmlInline(s) => Some(s),
            NodeValue::CodeBlock(code) => Some(&mut code.literal),
            NodeValue::HtmlBlock(html) => Some(&mut html.literal),
            NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom) => {
                Some(&mut custom.on_enter)
            }
            _ => None,
        }
    }
}
