use kifu_board::{Color, Loc};

use crate::{NodeIdx, PropIdx, TreeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Collection,
    GameInfo,
    Interior,
    BlackMove,
    WhiteMove,
    Sequence,
    Transfer,
}

impl NodeKind {
    pub fn for_move(color: Color) -> Self {
        match color {
            Color::Black => Self::BlackMove,
            Color::White => Self::WhiteMove,
        }
    }

    pub fn move_color(self) -> Option<Color> {
        match self {
            Self::BlackMove => Some(Color::Black),
            Self::WhiteMove => Some(Color::White),
            _ => None,
        }
    }

    fn carries_location(self) -> bool {
        matches!(self, Self::BlackMove | Self::WhiteMove | Self::Sequence)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Payload {
    Location(Loc),
    Properties(Option<PropIdx>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    kind: NodeKind,
    parent: Option<NodeIdx>,
    pub(crate) children: Option<NodeIdx>,
    pub(crate) next_sibling: NodeIdx,
    pub(crate) payload: Payload,
    move_depth: u32,
}

impl TreeNode {
    pub(crate) fn new(
        this: NodeIdx,
        kind: NodeKind,
        parent: Option<NodeIdx>,
        loc: Option<Loc>,
        move_depth: u32,
    ) -> Self {
        let payload = match loc {
            Some(loc) if kind.carries_location() => Payload::Location(loc),
            _ if kind.carries_location() => Payload::Location(Loc::Pass),
            _ => Payload::Properties(None),
        };
        Self { kind, parent, children: None, next_sibling: this, payload, move_depth }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn move_depth(&self) -> u32 {
        self.move_depth
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// The location stored in the node itself, for move and sequence nodes.
    pub fn location(&self) -> Option<Loc> {
        match self.payload {
            Payload::Location(loc) => Some(loc),
            Payload::Properties(_) => None,
        }
    }

    pub fn inline_move(&self) -> Option<(Loc, Color)> {
        Some((self.location()?, self.kind.move_color()?))
    }

    pub(crate) fn property_tail(&self) -> Option<PropIdx> {
        match self.payload {
            Payload::Properties(tail) => tail,
            Payload::Location(_) => None,
        }
    }

    /// Makes the node able to hold properties.
    ///
    /// A move node turns into an interior node and hands back its move, which
    /// the caller stores as the first property. Sequence nodes never hold
    /// properties.
    pub(crate) fn open_properties(&mut self) -> Result<Option<(Color, Loc)>, TreeError> {
        match (self.kind, self.payload) {
            (_, Payload::Properties(_)) => Ok(None),
            (NodeKind::BlackMove | NodeKind::WhiteMove, Payload::Location(loc)) => {
                let color = self.kind.move_color().ok_or(TreeError::NoProperties(self.kind))?;
                self.kind = NodeKind::Interior;
                self.payload = Payload::Properties(None);
                Ok(Some((color, loc)))
            }
            (kind, Payload::Location(_)) => Err(TreeError::NoProperties(kind)),
        }
    }

    /// Turns an empty interior node into a move node.
    pub(crate) fn close_as_move(&mut self, color: Color, loc: Loc) -> bool {
        self.close(NodeKind::for_move(color), loc)
    }

    pub(crate) fn close_as_sequence(&mut self, loc: Loc) -> bool {
        self.close(NodeKind::Sequence, loc)
    }

    fn close(&mut self, kind: NodeKind, loc: Loc) -> bool {
        if self.kind == NodeKind::Interior && self.payload == Payload::Properties(None) {
            self.kind = kind;
            self.payload = Payload::Location(loc);
            true
        } else {
            false
        }
    }
}
