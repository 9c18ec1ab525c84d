//! Ordered N-ary tree stored in an arena.
//!
//! Nodes are addressed by [`NodeKey`]s handed out sequentially and never
//! reused, so a key held by a caller stays valid (or becomes dangling and
//! resolves to `None`) across insertions and removals. Child 0 of a node is
//! its main line; later children are alternatives.

use std::fmt;

/// Stable address of a tree node
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeKey(usize);

impl NodeKey {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

#[derive(Clone, Debug)]
pub struct HistoryTree<T> {
    nodes: Vec<Option<Node<T>>>,
    len: usize,
}

impl<T> HistoryTree<T> {
    /// Tree holding only `root`, which gets key 0.
    #[must_use]
    pub fn new(root: T) -> Self {
        HistoryTree {
            nodes: vec![Some(Node {
                value: root,
                parent: None,
                children: Vec::new(),
            })],
            len: 1,
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeKey {
        NodeKey(0)
    }

    /// Number of live nodes, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, key: NodeKey) -> Option<&Node<T>> {
        self.nodes.get(key.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node<T>> {
        self.nodes.get_mut(key.0).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.node(key).is_some()
    }

    /// Value stored at `key`
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.node(key).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        self.node_mut(key).map(|n| &mut n.value)
    }

    #[must_use]
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.node(key).and_then(|n| n.parent)
    }

    /// Children of `key` in order; empty for a leaf or a missing key.
    #[must_use]
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.node(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `key` among its siblings
    #[must_use]
    pub fn child_index(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|&c| c == key)
    }

    /// Number of edges between `key` and the root
    #[must_use]
    pub fn depth(&self, key: NodeKey) -> Option<usize> {
        self.contains(key).then(|| self.ancestors(key).count())
    }

    /// Proper ancestors of `key`, nearest first
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.parent(key), move |&k| self.parent(k))
    }

    /// Append `value` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is not in the tree.
    pub fn insert(&mut self, parent: NodeKey, value: T) -> Option<NodeKey> {
        if !self.contains(parent) {
            return None;
        }
        let key = NodeKey(self.nodes.len());
        self.nodes.push(Some(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
        }));
        self.node_mut(parent)?.children.push(key);
        self.len += 1;
        Some(key)
    }

    /// First node in pre-order whose value satisfies `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<NodeKey> {
        self.pre_order(self.root())
            .find(|&k| self.get(k).is_some_and(&mut pred))
    }

    /// Detach `key` from its parent and drop its whole subtree.
    ///
    /// Returns the removed node's value. The root cannot be removed.
    pub fn remove(&mut self, key: NodeKey) -> Option<T> {
        let parent = self.parent(key)?;
        let subtree: Vec<NodeKey> = self.post_order(key);
        self.node_mut(parent)?.children.retain(|&c| c != key);

        let mut removed = None;
        for k in subtree {
            let node = self.nodes[k.0].take();
            self.len -= 1;
            if k == key {
                removed = node.map(|n| n.value);
            }
        }
        removed
    }

    /// Move `key` to child index 0 of its parent, keeping the order of its
    /// other siblings. Returns `false` for the root or a missing key.
    pub fn promote(&mut self, key: NodeKey) -> bool {
        let Some(parent) = self.parent(key) else {
            return false;
        };
        let Some(node) = self.node_mut(parent) else {
            return false;
        };
        match node.children.iter().position(|&c| c == key) {
            Some(index) => {
                node.children[..=index].rotate_right(1);
                true
            }
            None => false,
        }
    }

    /// Node first, then each child's subtree in order.
    pub fn pre_order(&self, start: NodeKey) -> PreOrder<'_, T> {
        let stack = if self.contains(start) { vec![start] } else { Vec::new() };
        PreOrder { tree: self, stack }
    }

    /// Each child's subtree in order, then the node.
    #[must_use]
    pub fn post_order(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if !self.contains(start) {
            return out;
        }
        // (node, children already expanded)
        let mut stack = vec![(start, false)];
        while let Some((key, expanded)) = stack.pop() {
            if expanded {
                out.push(key);
                continue;
            }
            stack.push((key, true));
            for &child in self.children(key).iter().rev() {
                stack.push((child, false));
            }
        }
        out
    }

    /// `start`, then repeatedly its first child: the main line from `start`.
    pub fn leftmost(&self, start: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        let first = self.contains(start).then_some(start);
        std::iter::successors(first, move |&k| self.children(k).first().copied())
    }

    /// Keys from the root down to `key`, both included
    #[must_use]
    pub fn path_to(&self, key: NodeKey) -> Vec<NodeKey> {
        if !self.contains(key) {
            return Vec::new();
        }
        let mut path: Vec<NodeKey> = self.ancestors(key).collect();
        path.reverse();
        path.push(key);
        path
    }
}

/// Iterator returned by [`HistoryTree::pre_order`]
pub struct PreOrder<'a, T> {
    tree: &'a HistoryTree<T>,
    stack: Vec<NodeKey>,
}

impl<T> Iterator for PreOrder<'_, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(key).iter().rev().copied());
        Some(key)
    }
}
