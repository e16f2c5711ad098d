//! Child iteration and enter/exit traversal.

use super::{NodeId, Tree};

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|node| node.next);
        Some(current)
    }
}

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    Enter(NodeId),
    Exit(NodeId),
}

/// Depth-first walk yielding `Enter`/`Exit` pairs. Leaf kinds only yield
/// `Enter`. The walk never leaves the subtree it started on.
pub struct Traverse<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeEvent>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeEvent;

    fn next(&mut self) -> Option<NodeEvent> {
        let current = self.next?;
        self.next = self.following(current);
        Some(current)
    }
}

impl Traverse<'_> {
    fn following(&self, event: NodeEvent) -> Option<NodeEvent> {
        let (node, entering) = match event {
            NodeEvent::Enter(node) => (node, true),
            NodeEvent::Exit(node) => (node, false),
        };
        let data = self.tree.get(node)?;

        if entering && !data.value.kind().is_leaf() {
            return Some(match data.first_child {
                Some(child) => NodeEvent::Enter(child),
                None => NodeEvent::Exit(node),
            });
        }
        if node == self.root {
            return None;
        }
        match (data.next, data.parent) {
            (Some(next), _) => Some(NodeEvent::Enter(next)),
            (None, Some(parent)) => Some(NodeEvent::Exit(parent)),
            (None, None) => None,
        }
    }
}

impl Tree {
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).and_then(|node| node.first_child),
        }
    }

    /// Walks the subtree rooted at `id`. Empty for stale ids.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse {
            tree: self,
            root: id,
            next: self.contains(id).then_some(NodeEvent::Enter(id)),
        }
    }

    /// Every node of the subtree in document order, `id` first.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse(id).filter_map(|event| match event {
            NodeEvent::Enter(node) => Some(node),
            NodeEvent::Exit(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn test_traverse_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        let emph = tree.create(NodeKind::Emph);
        let text = tree.create(NodeKind::Text);
        tree.append_child(root, para).unwrap();
        tree.append_child(para, emph).unwrap();
        tree.append_child(emph, text).unwrap();

        let events: Vec<_> = tree.traverse(root).collect();
        assert_eq!(
            events,
            vec![
                NodeEvent::Enter(root),
                NodeEvent::Enter(para),
                NodeEvent::Enter(emph),
                NodeEvent::Enter(text),
                NodeEvent::Exit(emph),
                NodeEvent::Exit(para),
                NodeEvent::Exit(root),
            ]
        );
    }

    #[test]
    fn test_traverse_stays_inside_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let first = tree.create(NodeKind::Paragraph);
        let second = tree.create(NodeKind::Paragraph);
        tree.append_child(root, first).unwrap();
        tree.append_child(root, second).unwrap();

        let events: Vec<_> = tree.traverse(first).collect();
        assert_eq!(events, vec![NodeEvent::Enter(first), NodeEvent::Exit(first)]);
    }

    #[test]
    fn test_children() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create(NodeKind::ThematicBreak);
        let b = tree.create(NodeKind::Paragraph);
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.children(a).count(), 0);
    }
}
