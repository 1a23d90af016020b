use std::fmt::Write as _;

use kifu_board::coord::{decode_loc, encode_loc};
use kifu_board::{BoardEngine, BoardError, Color, Goban, Loc, Point, handicap_points};

use crate::arena::Arena;
use crate::node::{NodeKind, Payload, TreeNode};
use crate::properties::{PropId, ValueKind};
use crate::traverse::{BreadthFirst, DepthFirstPost, DepthFirstPre};
use crate::value::PropertyValue;
use crate::{CapacityError, GameInfo, MoveError, NodeIdx, PropIdx, TreeError};

/// Index of the root node in every tree.
pub const ROOT: NodeIdx = NodeIdx::new(0);

/// A parsed collection of game records together with the board that was
/// driven while building it.
#[derive(Clone, Debug)]
pub struct GameTree<B = Goban> {
    nodes: Arena<TreeNode>,
    props: Arena<PropertyValue>,
    pub info: GameInfo,
    board: B,
    deleted: usize,
}

impl<B: BoardEngine + Default> Default for GameTree<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: BoardEngine> GameTree<B> {
    pub fn new(board: B) -> Self {
        let mut nodes = Arena::new();
        let _ = nodes.alloc(TreeNode::new(ROOT, NodeKind::Root, None, None, 0));
        Self { nodes, props: Arena::new(), info: GameInfo::default(), board, deleted: 0 }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }

    pub fn node(&self, idx: NodeIdx) -> &TreeNode {
        &self.nodes[idx]
    }

    pub fn get(&self, idx: NodeIdx) -> Option<&TreeNode> {
        self.nodes.get(idx)
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.nodes[idx].parent()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn property_count(&self) -> usize {
        self.props.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIdx> + use<B> {
        self.nodes.keys()
    }

    pub fn add_child(
        &mut self,
        parent: NodeIdx,
        kind: NodeKind,
        depth: u32,
    ) -> Result<NodeIdx, CapacityError> {
        self.insert_node(parent, kind, None, depth)
    }

    pub fn add_move_child(
        &mut self,
        parent: NodeIdx,
        color: Color,
        loc: Loc,
        depth: u32,
    ) -> Result<NodeIdx, CapacityError> {
        self.insert_node(parent, NodeKind::for_move(color), Some(loc), depth)
    }

    pub fn add_sequence_child(
        &mut self,
        parent: NodeIdx,
        loc: Loc,
        depth: u32,
    ) -> Result<NodeIdx, CapacityError> {
        self.insert_node(parent, NodeKind::Sequence, Some(loc), depth)
    }

    /// The new node becomes the tail of the parent's child list.
    fn insert_node(
        &mut self,
        parent: NodeIdx,
        kind: NodeKind,
        loc: Option<Loc>,
        depth: u32,
    ) -> Result<NodeIdx, CapacityError> {
        let this = self.nodes.next_key().ok_or(CapacityError::Nodes)?;
        let node = TreeNode::new(this, kind, Some(parent), loc, depth);
        let idx = self.nodes.alloc(node).map_err(|_| CapacityError::Nodes)?;
        if let Some(tail) = self.nodes[parent].children.replace(idx) {
            self.nodes[idx].next_sibling = self.nodes[tail].next_sibling;
            self.nodes[tail].next_sibling = idx;
        }
        Ok(idx)
    }

    /// Appends `value` to the node's property list. A move node first turns
    /// into an interior node whose first property is its move.
    pub fn add_property(
        &mut self,
        node: NodeIdx,
        value: PropertyValue,
    ) -> Result<PropIdx, TreeError> {
        let needed = if self.nodes[node].inline_move().is_some() { 2 } else { 1 };
        if self.props.remaining() < needed {
            return Err(CapacityError::Properties.into());
        }
        if let Some((color, loc)) = self.nodes[node].open_properties()? {
            let moved = self.move_value(color, loc);
            self.link_property(node, moved)?;
        }
        Ok(self.link_property(node, value)?)
    }

    fn link_property(
        &mut self,
        node: NodeIdx,
        mut value: PropertyValue,
    ) -> Result<PropIdx, CapacityError> {
        let this = self.props.next_key().ok_or(CapacityError::Properties)?;
        let tail = self.nodes[node].property_tail();
        value.next = match tail {
            Some(tail) => self.props[tail].next,
            None => this,
        };
        let idx = self.props.alloc(value).map_err(|_| CapacityError::Properties)?;
        if let Some(tail) = tail {
            self.props[tail].next = idx;
        }
        self.nodes[node].payload = Payload::Properties(Some(idx));
        Ok(idx)
    }

    pub fn move_value(&self, color: Color, loc: Loc) -> PropertyValue {
        let id = match color {
            Color::Black => PropId::B,
            Color::White => PropId::W,
        };
        PropertyValue::new(id, ValueKind::Move, encode_loc(loc, self.info.is_ff4()))
    }

    /// Stores a move in `node`: inline when the node is still empty,
    /// otherwise as a `B`/`W` property.
    pub fn record_move(&mut self, node: NodeIdx, color: Color, loc: Loc) -> Result<(), TreeError> {
        if self.nodes[node].close_as_move(color, loc) {
            return Ok(());
        }
        let value = self.move_value(color, loc);
        self.add_property(node, value).map(drop)
    }

    /// Makes an empty interior node the first link of a sequence chain.
    pub fn record_sequence(&mut self, node: NodeIdx, loc: Loc) -> bool {
        self.nodes[node].close_as_sequence(loc)
    }

    pub fn children(&self, node: NodeIdx) -> Children<'_> {
        Children::of(&self.nodes, node)
    }

    pub fn properties(&self, node: NodeIdx) -> Properties<'_> {
        let tail = self.nodes[node].property_tail();
        Properties { props: &self.props, next: tail.map(|t| self.props[t].next), tail }
    }

    pub fn first_child(&self, node: NodeIdx) -> Option<NodeIdx> {
        self.nodes[node].children.map(|tail| self.nodes[tail].next_sibling)
    }

    pub fn has_siblings(&self, node: NodeIdx) -> bool {
        self.nodes[node].next_sibling != node
    }

    pub fn is_first_child(&self, node: NodeIdx) -> bool {
        self.parent(node).is_some_and(|parent| self.first_child(parent) == Some(node))
    }

    /// The move made in `node`, inline or from its first `B`/`W` property.
    pub fn get_move(&self, node: NodeIdx) -> Result<(Loc, Color), MoveError> {
        let n = &self.nodes[node];
        if let Some(found) = n.inline_move() {
            return Ok(found);
        }
        if n.kind() != NodeKind::Interior {
            return Err(MoveError::NotAMove(n.kind()));
        }
        let (value, color) = self
            .properties(node)
            .find_map(|(_, value)| Some((value, value.move_color()?)))
            .ok_or(MoveError::Missing)?;
        let loc = decode_loc(value.text(), self.board.size())
            .map_err(|_| MoveError::BadValue(value.text().to_owned()))?;
        Ok((loc, color))
    }

    /// The child of `parent` whose move is played at `loc`.
    pub fn find_child(&self, parent: NodeIdx, loc: Loc) -> Option<NodeIdx> {
        self.children(parent).find(|&child| self.get_move(child).is_ok_and(|(l, _)| l == loc))
    }

    pub fn property(&self, idx: PropIdx) -> &PropertyValue {
        &self.props[idx]
    }

    pub fn find_property(&self, node: NodeIdx, id: PropId) -> Option<&PropertyValue> {
        self.properties(node).map(|(_, value)| value).find(|value| value.is(id))
    }

    pub fn has_property(&self, node: NodeIdx, id: PropId, text: &str) -> bool {
        self.properties(node).any(|(_, value)| value.is(id) && value.text() == text)
    }

    /// Unlinks every `id` property of `node`. The slots stay allocated and
    /// are only counted.
    pub fn remove_properties(&mut self, node: NodeIdx, id: PropId) -> usize {
        let (kept, removed): (Vec<_>, Vec<_>) =
            self.properties(node).map(|(idx, value)| (idx, value.is(id))).partition(|p| !p.1);
        if removed.is_empty() {
            return 0;
        }
        for (i, &(idx, _)) in kept.iter().enumerate() {
            self.props[idx].next = kept[(i + 1) % kept.len()].0;
        }
        self.nodes[node].payload = Payload::Properties(kept.last().map(|&(idx, _)| idx));
        self.deleted += removed.len();
        removed.len()
    }

    pub fn deleted_properties(&self) -> usize {
        self.deleted
    }

    /// Puts the fixed handicap stones on the board and records them.
    pub fn place_handicap(&mut self, handicap: u8) -> Result<Vec<Point>, BoardError> {
        let size = self.board.size();
        let points = if size.is_square() { handicap_points(handicap, size.cols) } else { vec![] };
        for &point in &points {
            self.board.setup(point, Some(Color::Black))?;
        }
        self.info.handicap = handicap;
        self.info.handicap_stones.clone_from(&points);
        Ok(points)
    }

    pub fn breadth_first(&self, start: NodeIdx) -> BreadthFirst<'_> {
        BreadthFirst::new(&self.nodes, start)
    }

    pub fn depth_first_pre(&self, start: NodeIdx) -> DepthFirstPre<'_> {
        DepthFirstPre::new(&self.nodes, start)
    }

    pub fn depth_first_post(&self, start: NodeIdx) -> DepthFirstPost<'_> {
        DepthFirstPost::new(&self.nodes, start)
    }

    /// One line per node, indented by tree depth.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((idx, level)) = stack.pop() {
            let node = &self.nodes[idx];
            let _ = write!(out, "{:indent$}{idx} {:?}", "", node.kind(), indent = level * 2);
            match node.location() {
                Some(Loc::Pass) => out.push_str(" pass"),
                Some(Loc::Point(point)) => {
                    let _ = write!(out, " {point}");
                }
                None => {
                    for (_, value) in self.properties(idx) {
                        let _ = write!(out, " {}[{}]", value.prop().ident(), value.text());
                    }
                }
            }
            out.push('\n');
            let children = self.children(idx).collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
        }
        out
    }
}

/// Children of a node, first to last.
#[derive(Clone)]
pub struct Children<'a> {
    nodes: &'a Arena<TreeNode>,
    next: Option<NodeIdx>,
    tail: Option<NodeIdx>,
}

impl<'a> Children<'a> {
    pub(crate) fn of(nodes: &'a Arena<TreeNode>, node: NodeIdx) -> Self {
        let tail = nodes[node].children;
        Self { nodes, next: tail.map(|t| nodes[t].next_sibling), tail }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = (Some(current) != self.tail).then(|| self.nodes[current].next_sibling);
        Some(current)
    }
}

/// Properties of a node in insertion order.
#[derive(Clone)]
pub struct Properties<'a> {
    props: &'a Arena<PropertyValue>,
    next: Option<PropIdx>,
    tail: Option<PropIdx>,
}

impl<'a> Iterator for Properties<'a> {
    type Item = (PropIdx, &'a PropertyValue);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let value = &self.props[current];
        self.next = (Some(current) != self.tail).then_some(value.next);
        Some((current, value))
    }
}
