use crate::{Fragment, Leaf, Node};

/// A node visited during traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Fragment(&'a Fragment),
    Leaf(&'a Leaf),
}

impl NodeRef<'_> {
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(self, NodeRef::Fragment(_))
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    #[inline]
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Leaf(leaf) => NodeRef::Leaf(leaf),
            Node::Fragment(fragment) => NodeRef::Fragment(fragment),
        }
    }
}

impl Fragment {
    /// Depth-first, pre-order walk over this fragment and all of its
    /// descendants. The callback receives the node, its depth (this fragment
    /// is at `level`), and whether the node is a fragment.
    pub fn traverse<F>(&self, level: usize, mut f: F)
    where
        F: FnMut(NodeRef<'_>, usize, bool),
    {
        fn traverse(this: &Fragment, level: usize, f: &mut impl FnMut(NodeRef<'_>, usize, bool)) {
            f(NodeRef::Fragment(this), level, true);
            for child in this.children() {
                match child {
                    Node::Fragment(fragment) => traverse(fragment, level + 1, f),
                    Node::Leaf(leaf) => f(NodeRef::Leaf(leaf), level + 1, false),
                }
            }
        }

        traverse(self, level, &mut f);
    }

    /// With `recursive`, the number of leaf values anywhere below this
    /// fragment. Otherwise the number of direct children.
    #[must_use]
    pub fn size(&self, recursive: bool) -> usize {
        if !recursive {
            return self.children().len();
        }

        let mut size = 0;
        self.traverse(0, |_, _, has_children| {
            if !has_children {
                size += 1;
            }
        });
        size
    }
}
