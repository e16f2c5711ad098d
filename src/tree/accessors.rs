//! Navigation and per-kind attribute accessors.
//!
//! Getters return a zero value (empty string, `0`, `false`, `None`) when the
//! node is stale or its kind lacks the attribute. Setters refuse with
//! [`TreeError::Unsupported`] and leave the node unchanged.

use super::{ListDelimType, ListType, NodeId, NodeKind, NodeValue, Sourcepos, Tree};
use crate::error::TreeError;

impl Tree {
    /// Kind of a live node; `None` for stale or foreign ids.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|node| node.value.kind())
    }

    /// Snake-case kind name, or `"none"` for stale ids.
    pub fn kind_name(&self, id: NodeId) -> &'static str {
        self.kind(id).map_or("none", NodeKind::name)
    }

    pub fn value(&self, id: NodeId) -> Option<&NodeValue> {
        self.get(id).map(|node| &node.value)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.last_child)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.next)
    }

    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.prev)
    }

    pub fn sourcepos(&self, id: NodeId) -> Sourcepos {
        self.get(id).map(|node| node.sourcepos).unwrap_or_default()
    }

    /// Literal text of `Text`, `Code`, `HtmlInline`, `CodeBlock` and
    /// `HtmlBlock` nodes; the `on_enter` text of custom nodes.
    pub fn string_content(&self, id: NodeId) -> &str {
        self.value(id).and_then(NodeValue::literal).unwrap_or("")
    }

    pub fn set_string_content(&mut self, id: NodeId, content: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let kind = value.kind();
        match value.literal_mut() {
            Some(literal) => {
                literal.clear();
                literal.push_str(content);
                Ok(())
            }
            None => Err(unsupported(kind, "string content")),
        }
    }

    /// Heading level, or 0 when `id` is not a heading.
    pub fn heading_level(&self, id: NodeId) -> u8 {
        match self.value(id) {
            Some(NodeValue::Heading(heading)) => heading.level,
            _ => 0,
        }
    }

    pub fn set_heading_level(&mut self, id: NodeId, level: u8) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let NodeValue::Heading(heading) = value else {
            return Err(unsupported(value.kind(), "heading level"));
        };
        if !(1..=6).contains(&level) {
            return Err(TreeError::OutOfRange {
                attribute: "heading level",
                value: level as usize,
                min: 1,
                max: 6,
            });
        }
        heading.level = level;
        Ok(())
    }

    pub fn list_type(&self, id: NodeId) -> Option<ListType> {
        match self.value(id) {
            Some(NodeValue::List(list)) => Some(list.list_type),
            _ => None,
        }
    }

    pub fn set_list_type(&mut self, id: NodeId, list_type: ListType) -> Result<(), TreeError> {
        self.with_list(id, "list type", |list| list.list_type = list_type)
    }

    pub fn list_delim(&self, id: NodeId) -> Option<ListDelimType> {
        match self.value(id) {
            Some(NodeValue::List(list)) => list.delimiter,
            _ => None,
        }
    }

    pub fn set_list_delim(
        &mut self,
        id: NodeId,
        delimiter: Option<ListDelimType>,
    ) -> Result<(), TreeError> {
        self.with_list(id, "list delimiter", |list| list.delimiter = delimiter)
    }

    /// Start number of an ordered list, or 0 when `id` is not a list.
    pub fn list_start(&self, id: NodeId) -> usize {
        match self.value(id) {
            Some(NodeValue::List(list)) => list.start,
            _ => 0,
        }
    }

    pub fn set_list_start(&mut self, id: NodeId, start: usize) -> Result<(), TreeError> {
        self.with_list(id, "list start", |list| list.start = start)
    }

    pub fn list_tight(&self, id: NodeId) -> bool {
        match self.value(id) {
            Some(NodeValue::List(list)) => list.tight,
            _ => false,
        }
    }

    pub fn set_list_tight(&mut self, id: NodeId, tight: bool) -> Result<(), TreeError> {
        self.with_list(id, "list tightness", |list| list.tight = tight)
    }

    pub fn fence_info(&self, id: NodeId) -> &str {
        match self.value(id) {
            Some(NodeValue::CodeBlock(code)) => &code.info,
            _ => "",
        }
    }

    pub fn set_fence_info(&mut self, id: NodeId, info: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let NodeValue::CodeBlock(code) = value else {
            return Err(unsupported(value.kind(), "fence info"));
        };
        code.info = info.to_string();
        Ok(())
    }

    pub fn url(&self, id: NodeId) -> &str {
        match self.value(id) {
            Some(NodeValue::Link(link) | NodeValue::Image(link)) => &link.url,
            _ => "",
        }
    }

    pub fn set_url(&mut self, id: NodeId, url: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let (NodeValue::Link(link) | NodeValue::Image(link)) = value else {
            return Err(unsupported(value.kind(), "url"));
        };
        link.url = url.to_string();
        Ok(())
    }

    pub fn title(&self, id: NodeId) -> &str {
        match self.value(id) {
            Some(NodeValue::Link(link) | NodeValue::Image(link)) => &link.title,
            _ => "",
        }
    }

    pub fn set_title(&mut self, id: NodeId, title: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let (NodeValue::Link(link) | NodeValue::Image(link)) = value else {
            return Err(unsupported(value.kind(), "title"));
        };
        link.title = title.to_string();
        Ok(())
    }

    pub fn on_enter(&self, id: NodeId) -> &str {
        match self.value(id) {
            Some(NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom)) => {
                &custom.on_enter
            }
            _ => "",
        }
    }

    pub fn set_on_enter(&mut self, id: NodeId, on_enter: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let (NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom)) = value else {
            return Err(unsupported(value.kind(), "on_enter"));
        };
        custom.on_enter = on_enter.to_string();
        Ok(())
    }

    pub fn on_exit(&self, id: NodeId) -> &str {
        match self.value(id) {
            Some(NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom)) => {
                &custom.on_exit
            }
            _ => "",
        }
    }

    pub fn set_on_exit(&mut self, id: NodeId, on_exit: &str) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let (NodeValue::CustomBlock(custom) | NodeValue::CustomInline(custom)) = value else {
            return Err(unsupported(value.kind(), "on_exit"));
        };
        custom.on_exit = on_exit.to_string();
        Ok(())
    }

    fn value_mut(&mut self, id: NodeId) -> Result<&mut NodeValue, TreeError> {
        self.get_mut(id)
            .map(|node| &mut node.value)
            .ok_or(TreeError::InvalidNode(id))
    }

    fn with_list(
        &mut self,
        id: NodeId,
        attribute: &'static str,
        update: impl FnOnce(&mut super::ListData),
    ) -> Result<(), TreeError> {
        let value = self.value_mut(id)?;
        let NodeValue::List(list) = value else {
            return Err(unsupported(value.kind(), attribute));
        };
        update(list);
        Ok(())
    }
}

fn unsupported(kind: NodeKind, attribute: &'static str) -> TreeError {
    TreeError::Unsupported { kind, attribute }
}
