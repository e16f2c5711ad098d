use crate::tree::NodeId;

/// Open blocks from the document (index 0) down to the innermost one.
pub(crate) struct ContainerStack {
    root: NodeId,
    stack: Vec<NodeId>,
}

impl ContainerStack {
    pub(crate) fn new(root: NodeId) -> Self {
        Self {
            root,
            stack: vec![root],
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost open block. Falls back to the document once everything
    /// has been closed.
    pub(crate) fn last(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.root)
    }

    pub(crate) fn get(&self, idx: usize) -> NodeId {
        self.stack.get(idx).copied().unwrap_or(self.root)
    }

    pub(crate) fn push(&mut self, node: NodeId) {
        self.stack.push(node);
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.stack.iter().copied()
    }
}
