//! Densely packed SGF game trees.
//!
//! Nodes and property values live in two `u16`-indexed arenas owned by a
//! [`GameTree`]. Child lists and property lists are circular: a node keeps
//! only the tail, and the head is `tail.next`.

mod arena;
mod info;
mod labels;
mod node;
pub mod printer;
pub mod properties;
mod traverse;
mod tree;
mod value;

pub use arena::{Arena, Key, MAX_ENTRIES};
pub use info::{GameInfo, GameResult, Komi, TimeLimit};
pub use node::{NodeKind, TreeNode};
pub use traverse::{BreadthFirst, DepthFirstPost, DepthFirstPre};
pub use tree::{Children, GameTree, Properties, ROOT};
pub use value::{PropRef, PropertyValue};

pub type NodeIdx = Key<TreeNode>;
pub type PropIdx = Key<PropertyValue>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("node capacity of {MAX_ENTRIES} exceeded")]
    Nodes,
    #[error("property capacity of {MAX_ENTRIES} exceeded")]
    Properties,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("{0:?} nodes cannot hold properties")]
    NoProperties(NodeKind),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("missing move in interior node")]
    Missing,
    #[error("not a move or interior node: {0:?}")]
    NotAMove(NodeKind),
    #[error("bad move value {0:?}")]
    BadValue(String),
}
