//! Structural edits: attach, detach, destroy.
//!
//! Every public operation validates first and mutates second, so a returned
//! error means the tree is untouched.

use super::{NodeEvent, NodeId, NodeKind, NodeValue, Tree};
use crate::error::TreeError;

impl Tree {
    /// Makes `child` the last child of `parent`, detaching it from wherever
    /// it was first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.append_unchecked(parent, child);
        Ok(())
    }

    /// Makes `child` the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.detach(child);
        let old_first = self.node(parent).first_child;
        {
            let data = self.node_mut(child);
            data.parent = Some(parent);
            data.next = old_first;
            data.prev = None;
        }
        match old_first {
            Some(first) => self.node_mut(first).prev = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
        self.node_mut(parent).first_child = Some(child);
        Ok(())
    }

    /// Places `sibling` directly before `node` under `node`'s parent.
    pub fn insert_before(&mut self, node: NodeId, sibling: NodeId) -> Result<(), TreeError> {
        let parent = self.check_insert(node, sibling)?;
        self.insert_before_unchecked(parent, node, sibling);
        Ok(())
    }

    /// Places `sibling` directly after `node` under `node`'s parent.
    pub fn insert_after(&mut self, node: NodeId, sibling: NodeId) -> Result<(), TreeError> {
        let parent = self.check_insert(node, sibling)?;
        self.insert_after_unchecked(parent, node, sibling);
        Ok(())
    }

    /// Detaches `node` from its parent and siblings. The node and its
    /// subtree stay alive and can be attached elsewhere.
    pub fn unlink(&mut self, node: NodeId) -> Result<(), TreeError> {
        if !self.contains(node) {
            return Err(TreeError::InvalidNode(node));
        }
        self.detach(node);
        Ok(())
    }

    /// Unlinks `node` and frees it together with all of its descendants.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), TreeError> {
        if !self.contains(node) {
            return Err(TreeError::InvalidNode(node));
        }
        self.detach(node);
        self.free_subtree(node);
        Ok(())
    }

    /// Alias of [`Tree::destroy`].
    pub fn free(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.destroy(node)
    }

    /// Moves the subtree rooted at `node` into a new tree of its own.
    ///
    /// The ids under `node` stop resolving in `self`; the returned tree has
    /// the moved node as its root.
    pub fn split_off(&mut self, node: NodeId) -> Result<Tree, TreeError> {
        let value = match self.get(node) {
            Some(data) => data.value.clone(),
            None => return Err(TreeError::InvalidNode(node)),
        };
        self.detach(node);

        let mut other = Tree::with_root(value);
        other.node_mut(other.root).sourcepos = self.node(node).sourcepos;

        let mut parents = vec![other.root];
        for event in self.traverse(node).skip(1) {
            match event {
                NodeEvent::Enter(id) => {
                    let data = self.node(id);
                    let copy = other.alloc(data.value.clone());
                    other.node_mut(copy).sourcepos = data.sourcepos;
                    if let Some(&parent) = parents.last() {
                        other.append_unchecked(parent, copy);
                    }
                    if !data.value.kind().is_leaf() {
                        parents.push(copy);
                    }
                }
                NodeEvent::Exit(_) => {
                    parents.pop();
                }
            }
        }

        self.free_subtree(node);
        Ok(other)
    }

    /// Merges runs of adjacent `Text` siblings under `node` into one node.
    pub fn consolidate_text_nodes(&mut self, node: NodeId) {
        let texts: Vec<NodeId> = self
            .descendants(node)
            .filter(|&id| self.node(id).value.kind() == NodeKind::Text)
            .collect();

        for id in texts {
            if !self.contains(id) {
                continue;
            }
            while let Some(next) = self.node(id).next {
                let NodeValue::Text(extra) = &self.node(next).value else {
                    break;
                };
                let extra = extra.clone();
                if let NodeValue::Text(literal) = &mut self.node_mut(id).value {
                    literal.push_str(&extra);
                }
                let end = self.node(next).sourcepos;
                let pos = &mut self.node_mut(id).sourcepos;
                pos.end_line = end.end_line;
                pos.end_column = end.end_column;
                self.detach(next);
                self.free_subtree(next);
            }
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_kind = self.kind(parent).ok_or(TreeError::InvalidNode(parent))?;
        let child_kind = self.kind(child).ok_or(TreeError::InvalidNode(child))?;
        if parent == child {
            return Err(TreeError::SelfReference);
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        if !parent_kind.can_contain(child_kind) {
            return Err(TreeError::InvalidChild {
                parent: parent_kind,
                child: child_kind,
            });
        }
        Ok(())
    }

    /// Validates an insert next to `node` and returns `node`'s parent.
    fn check_insert(&self, node: NodeId, sibling: NodeId) -> Result<NodeId, TreeError> {
        let data = self.get(node).ok_or(TreeError::InvalidNode(node))?;
        if !self.contains(sibling) {
            return Err(TreeError::InvalidNode(sibling));
        }
        if node == sibling {
            return Err(TreeError::SelfReference);
        }
        let parent = data.parent.ok_or(TreeError::NoParent(node))?;
        self.check_attach(parent, sibling)?;
        Ok(parent)
    }

    /// Whether `ancestor` is `node` itself or lies on its parent chain.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|data| data.parent);
        }
        false
    }

    pub(crate) fn append_unchecked(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(parent)
                .value
                .kind()
                .can_contain(self.node(child).value.kind())
        );
        self.detach(child);
        let old_last = self.node(parent).last_child;
        {
            let data = self.node_mut(child);
            data.parent = Some(parent);
            data.prev = old_last;
            data.next = None;
        }
        match old_last {
            Some(last) => self.node_mut(last).next = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        self.node_mut(parent).last_child = Some(child);
    }

    fn insert_before_unchecked(&mut self, parent: NodeId, node: NodeId, sibling: NodeId) {
        self.detach(sibling);
        let prev = self.node(node).prev;
        {
            let data = self.node_mut(sibling);
            data.parent = Some(parent);
            data.prev = prev;
            data.next = Some(node);
        }
        self.node_mut(node).prev = Some(sibling);
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(sibling),
            None => self.node_mut(parent).first_child = Some(sibling),
        }
    }

    fn insert_after_unchecked(&mut self, parent: NodeId, node: NodeId, sibling: NodeId) {
        self.detach(sibling);
        let next = self.node(node).next;
        {
            let data = self.node_mut(sibling);
            data.parent = Some(parent);
            data.prev = Some(node);
            data.next = next;
        }
        self.node_mut(node).next = Some(sibling);
        match next {
            Some(next) => self.node_mut(next).prev = Some(sibling),
            None => self.node_mut(parent).last_child = Some(sibling),
        }
    }

    /// Inserts `sibling` after `node`, for parser use on known-valid ids.
    pub(crate) fn insert_after_internal(&mut self, node: NodeId, sibling: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.insert_after_unchecked(parent, node, sibling);
        }
    }

    /// Inserts `sibling` before `node`, for parser use on known-valid ids.
    pub(crate) fn insert_before_internal(&mut self, node: NodeId, sibling: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.insert_before_unchecked(parent, node, sibling);
        }
    }

    pub(crate) fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let data = self.node_mut(node);
            let links = (data.parent, data.prev, data.next);
            data.parent = None;
            data.prev = None;
            data.next = None;
            links
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).last_child = prev;
                }
            }
        }
    }

    /// Frees `node` and its descendants. `node` must already be detached.
    pub(crate) fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            self.release(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sibling_order(tree: &Tree, parent: NodeId) -> Vec<NodeId> {
        tree.children(parent).collect()
    }

    fn assert_links_consistent(tree: &Tree, parent: NodeId) {
        let children = sibling_order(tree, parent);
        assert_eq!(tree.first_child(parent), children.first().copied());
        assert_eq!(tree.last_child(parent), children.last().copied());
        for pair in children.windows(2) {
            assert_eq!(tree.next(pair[0]), Some(pair[1]));
            assert_eq!(tree.previous(pair[1]), Some(pair[0]));
        }
        for &child in &children {
            assert_eq!(tree.parent(child), Some(parent));
        }
        if let Some(&first) = children.first() {
            assert_eq!(tree.previous(first), None);
        }
        if let Some(&last) = children.last() {
            assert_eq!(tree.next(last), None);
        }
    }

    fn three_paragraphs() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create(NodeKind::Paragraph);
        let b = tree.create(NodeKind::Paragraph);
        let c = tree.create(NodeKind::Paragraph);
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(root, c).unwrap();
        (tree, a, b, c)
    }

    #[test]
    fn test_append_and_prepend() {
        let (mut tree, a, b, c) = three_paragraphs();
        let root = tree.root();
        assert_eq!(sibling_order(&tree, root), vec![a, b, c]);

        tree.prepend_child(root, c).unwrap();
        assert_eq!(sibling_order(&tree, root), vec![c, a, b]);
        assert_links_consistent(&tree, root);
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut tree, a, b, c) = three_paragraphs();
        let root = tree.root();

        tree.insert_before(a, c).unwrap();
        assert_eq!(sibling_order(&tree, root), vec![c, a, b]);
        assert_links_consistent(&tree, root);

        tree.insert_after(b, c).unwrap();
        assert_eq!(sibling_order(&tree, root), vec![a, b, c]);
        assert_links_consistent(&tree, root);

        tree.insert_after(a, c).unwrap();
        assert_eq!(sibling_order(&tree, root), vec![a, c, b]);
        assert_links_consistent(&tree, root);
    }

    #[test]
    fn test_unlink_then_reinsert_restores_order() {
        let (mut tree, a, b, _c) = three_paragraphs();
        let root = tree.root();
        let original = sibling_order(&tree, root);

        tree.unlink(a).unwrap();
        assert_eq!(tree.parent(a), None);
        tree.insert_before(b, a).unwrap();
        tree.insert_after(a, b).unwrap();
        assert_eq!(sibling_order(&tree, root), original);
        assert_links_consistent(&tree, root);
    }

    #[test]
    fn test_unlink_keeps_subtree_alive() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        let text = tree.create(NodeKind::Text);
        tree.append_child(root, para).unwrap();
        tree.append_child(para, text).unwrap();

        tree.unlink(para).unwrap();
        assert_eq!(tree.first_child(root), None);
        assert!(tree.contains(para));
        assert_eq!(tree.first_child(para), Some(text));
    }

    #[test]
    fn test_destroy_frees_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        let text = tree.create(NodeKind::Text);
        tree.append_child(root, para).unwrap();
        tree.append_child(para, text).unwrap();

        tree.destroy(para).unwrap();
        assert!(!tree.contains(para));
        assert!(!tree.contains(text));
        assert_eq!(tree.first_child(root), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.destroy(para), Err(TreeError::InvalidNode(para)));
    }

    #[test]
    fn test_rejects_self_and_cycles() {
        let mut tree = Tree::new();
        let root = tree.root();
        let quote = tree.create(NodeKind::BlockQuote);
        let inner = tree.create(NodeKind::BlockQuote);
        tree.append_child(root, quote).unwrap();
        tree.append_child(quote, inner).unwrap();

        assert_eq!(
            tree.append_child(quote, quote),
            Err(TreeError::SelfReference)
        );
        assert_eq!(
            tree.append_child(inner, quote),
            Err(TreeError::Cycle {
                parent: inner,
                child: quote
            })
        );
        assert_eq!(
            tree.append_child(inner, root),
            Err(TreeError::Cycle {
                parent: inner,
                child: root
            })
        );
        assert_eq!(tree.parent(inner), Some(quote));
    }

    #[test]
    fn test_rejects_insert_next_to_root() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        assert_eq!(tree.insert_before(root, para), Err(TreeError::NoParent(root)));
        assert_eq!(tree.insert_after(root, para), Err(TreeError::NoParent(root)));
    }

    #[test]
    fn test_containment_rules() {
        let mut tree = Tree::new();
        let root = tree.root();
        let list = tree.create(NodeKind::List);
        let para = tree.create(NodeKind::Paragraph);
        let item = tree.create(NodeKind::Item);

        assert_eq!(
            tree.append_child(list, para),
            Err(TreeError::InvalidChild {
                parent: NodeKind::List,
                child: NodeKind::Paragraph
            })
        );
        assert_eq!(
            tree.append_child(root, item),
            Err(TreeError::InvalidChild {
                parent: NodeKind::Document,
                child: NodeKind::Item
            })
        );
        tree.append_child(list, item).unwrap();
        tree.append_child(item, para).unwrap();
        tree.append_child(root, list).unwrap();
    }

    #[test]
    fn test_failed_attach_leaves_child_in_place() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        let list = tree.create(NodeKind::List);
        tree.append_child(root, para).unwrap();

        assert!(tree.append_child(list, para).is_err());
        assert_eq!(tree.parent(para), Some(root));
    }

    #[test]
    fn test_split_off_moves_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        let text = tree.create(NodeKind::Text);
        tree.set_string_content(text, "moved").unwrap();
        tree.append_child(root, para).unwrap();
        tree.append_child(para, text).unwrap();

        let other = tree.split_off(para).unwrap();
        assert!(!tree.contains(para));
        assert_eq!(tree.first_child(root), None);

        let other_root = other.root();
        assert_eq!(other.kind(other_root), Some(NodeKind::Paragraph));
        let moved = other.first_child(other_root).unwrap();
        assert_eq!(other.string_content(moved), "moved");
    }

    #[test]
    fn test_consolidate_text_nodes() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph);
        tree.append_child(root, para).unwrap();
        for part in ["a", "b", "c"] {
            let text = tree.create(NodeKind::Text);
            tree.set_string_content(text, part).unwrap();
            tree.append_child(para, text).unwrap();
        }

        tree.consolidate_text_nodes(root);
        let children: Vec<_> = tree.children(para).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.string_content(children[0]), "abc");
    }
}
