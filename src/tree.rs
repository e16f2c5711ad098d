//! Arena-backed document tree.
//!
//! Every node lives in a [`Tree`] and is addressed by a [`NodeId`]. Only the
//! parent-to-child direction owns anything; `parent`, `prev` and `next` are
//! plain ids. Freed slots are reused, and each slot carries a generation so
//! that ids of destroyed nodes stop resolving instead of aliasing new nodes.

mod accessors;
mod iter;
mod kind;
mod mutate;
mod value;

pub use iter::{Children, NodeEvent, Traverse};
pub use kind::NodeKind;
pub use value::{
    CodeBlockData, CustomData, HeadingData, HtmlBlockData, LinkData, ListData, ListDelimType,
    ListType, NodeValue,
};

/// Stable handle to a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// 1-based line/column span of a node in the source text. All zero for
/// nodes that were built by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sourcepos {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) value: NodeValue,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) sourcepos: Sourcepos,
    /// Raw text collected by the block parser before inline parsing.
    pub(crate) content: String,
    pub(crate) last_line_blank: bool,
}

impl NodeData {
    fn new(value: NodeValue) -> Self {
        Self {
            value,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            sourcepos: Sourcepos::default(),
            content: String::new(),
            last_line_blank: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

/// A document tree plus any detached nodes created alongside it.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree whose root is an empty `Document` node.
    pub fn new() -> Self {
        Self::with_root(NodeValue::Document)
    }

    pub(crate) fn with_root(value: NodeValue) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.alloc(value);
        tree
    }

    /// The node this tree was built around. For parsed trees this is the
    /// `Document`. It stops resolving if the caller destroys it.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates a detached node with a zero-valued payload.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(NodeValue::for_kind(kind))
    }

    /// Creates a detached node with the given payload.
    pub fn create_with_value(&mut self, value: NodeValue) -> NodeId {
        self.alloc(value)
    }

    pub(crate) fn alloc(&mut self, value: NodeValue) -> NodeId {
        let data = NodeData::new(value);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(data);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(data),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Returns the slot of a freed node to the free list.
    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize)
            && slot.generation == id.generation
            && slot.node.take().is_some()
        {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    /// Whether `id` refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Internal access for ids the parsers created themselves.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale, which would be a bug in this crate.
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?} used internally"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` is stale, which would be a bug in this crate.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?} used internally"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_document_root() {
        let tree = Tree::new();
        assert_eq!(tree.kind(tree.root()), Some(NodeKind::Document));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_freed_slot_is_reused_with_new_generation() {
        let mut tree = Tree::new();
        let text = tree.create(NodeKind::Text);
        tree.destroy(text).unwrap();
        assert!(!tree.contains(text));

        let again = tree.create(NodeKind::Emph);
        assert_eq!(again.index, text.index);
        assert_ne!(again, text);
        assert_eq!(tree.kind(text), None);
        assert_eq!(tree.kind(again), Some(NodeKind::Emph));
    }
}
