//! Whole-subtree walks that keep their own queue or stack.

use std::collections::VecDeque;

use crate::arena::Arena;
use crate::node::TreeNode;
use crate::tree::Children;
use crate::NodeIdx;

pub struct BreadthFirst<'a> {
    nodes: &'a Arena<TreeNode>,
    queue: VecDeque<NodeIdx>,
}

impl<'a> BreadthFirst<'a> {
    pub(crate) fn new(nodes: &'a Arena<TreeNode>, start: NodeIdx) -> Self {
        Self { nodes, queue: VecDeque::from([start]) }
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.queue.pop_front()?;
        self.queue.extend(Children::of(self.nodes, current));
        Some(current)
    }
}

/// Parents before children, siblings in order.
pub struct DepthFirstPre<'a> {
    nodes: &'a Arena<TreeNode>,
    stack: Vec<NodeIdx>,
}

impl<'a> DepthFirstPre<'a> {
    pub(crate) fn new(nodes: &'a Arena<TreeNode>, start: NodeIdx) -> Self {
        Self { nodes, stack: vec![start] }
    }
}

impl Iterator for DepthFirstPre<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(Children::of(self.nodes, current));
        self.stack[mark..].reverse();
        Some(current)
    }
}

/// Children before parents.
pub struct DepthFirstPost<'a> {
    nodes: &'a Arena<TreeNode>,
    stack: Vec<(NodeIdx, bool)>,
}

impl<'a> DepthFirstPost<'a> {
    pub(crate) fn new(nodes: &'a Arena<TreeNode>, start: NodeIdx) -> Self {
        Self { nodes, stack: vec![(start, false)] }
    }
}

impl Iterator for DepthFirstPost<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        loop {
            let (current, expanded) = self.stack.pop()?;
            if expanded {
                return Some(current);
            }
            self.stack.push((current, true));
            let mark = self.stack.len();
            self.stack.extend(Children::of(self.nodes, current).map(|child| (child, false)));
            self.stack[mark..].reverse();
        }
    }
}
