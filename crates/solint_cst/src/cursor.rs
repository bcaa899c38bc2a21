//! Tree cursor.
//!
//! A cursor is a position inside a tree plus the path that led there. It
//! borrows the tree and never outlives it. Cursors created with
//! [`Cursor::spawn`] treat their starting node as the root: they never walk
//! above it or past its last descendant.

use crate::query::{Query, QueryMatchIterator};
use crate::{CstNode, EdgeLabel, TextRange};

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    current: &'a CstNode<'a>,
    /// Parents of `current` with the index of the child taken at each level.
    ancestors: Vec<(&'a CstNode<'a>, usize)>,
    completed: bool,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at `root`.
    pub fn new(root: &'a CstNode<'a>) -> Self {
        Self {
            current: root,
            ancestors: Vec::new(),
            completed: false,
        }
    }

    /// The node under the cursor.
    #[inline]
    pub fn node(&self) -> &'a CstNode<'a> {
        self.current
    }

    #[inline]
    pub fn label(&self) -> Option<EdgeLabel> {
        self.current.label
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        self.current.range
    }

    /// Number of levels below the cursor's root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// True once a pre-order walk has moved past the last node.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// A fresh cursor rooted at the current node.
    pub fn spawn(&self) -> Cursor<'a> {
        Cursor::new(self.current)
    }

    /// A copy of this cursor moved to the child at `index`.
    pub fn child(&self, index: usize) -> Option<Cursor<'a>> {
        let children: &'a [CstNode<'a>] = self.current.children;
        let node = children.get(index)?;
        let mut ancestors = self.ancestors.clone();
        ancestors.push((self.current, index));
        Some(Cursor {
            current: node,
            ancestors,
            completed: false,
        })
    }

    /// Cursors for every non-trivia child, in order.
    pub fn significant_children(&self) -> Vec<Cursor<'a>> {
        self.current
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.is_trivia())
            .filter_map(|(index, _)| self.child(index))
            .collect()
    }

    pub fn go_to_first_child(&mut self) -> bool {
        let children: &'a [CstNode<'a>] = self.current.children;
        match children.first() {
            Some(first) => {
                self.ancestors.push((self.current, 0));
                self.current = first;
                true
            }
            None => false,
        }
    }

    pub fn go_to_next_sibling(&mut self) -> bool {
        let Some((parent, index)) = self.ancestors.last_mut() else {
            return false;
        };
        let siblings: &'a [CstNode<'a>] = parent.children;
        match siblings.get(*index + 1) {
            Some(next) => {
                *index += 1;
                self.current = next;
                true
            }
            None => false,
        }
    }

    pub fn go_to_parent(&mut self) -> bool {
        match self.ancestors.pop() {
            Some((parent, _)) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Moves to the next node in pre-order.
    ///
    /// Returns false and marks the cursor completed when the walk is over.
    pub fn go_to_next(&mut self) -> bool {
        if self.completed {
            return false;
        }
        if self.go_to_first_child() {
            return true;
        }
        self.go_to_next_non_descendant()
    }

    /// Moves to the next node in pre-order that is not below the current one.
    pub fn go_to_next_non_descendant(&mut self) -> bool {
        if self.completed {
            return false;
        }
        loop {
            if self.go_to_next_sibling() {
                return true;
            }
            if !self.go_to_parent() {
                self.completed = true;
                return false;
            }
        }
    }

    /// Runs `queries` against this node and everything below it.
    ///
    /// Matches are produced lazily, one root node at a time.
    pub fn query(&self, queries: &[Query]) -> QueryMatchIterator<'a> {
        QueryMatchIterator::new(self.spawn(), queries.to_vec())
    }
}

/// Two cursors are equal when they point at the same node of the same tree.
impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.current, other.current)
    }
}

impl Eq for Cursor<'_> {}
