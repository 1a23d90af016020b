//! Opening patterns mined from many game records.
//!
//! A [`PatternTree`] is a regular [`GameTree`] whose lines are canonical:
//! every merged record is first turned by the board symmetry that brings
//! its first move to the upper right corner, so rotated and mirrored
//! openings share nodes. Variations of a record are merged too and their
//! first moves are marked as bad moves.

mod miner;

use kifu_board::{BoardEngine, BoardError, BoardSize, Color, Goban, Point, Symmetry};
use kifu_tree::properties::PropId;
use kifu_tree::{
    CapacityError, GameTree, MoveError, NodeIdx, NodeKind, PropertyValue, ROOT, TreeError,
};

/// Index of the collection node in every well-formed record.
pub const COLLECTION: NodeIdx = NodeIdx::new(1);
/// Index of the first game-info node in every well-formed record.
pub const GAME_INFO: NodeIdx = NodeIdx::new(2);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("handicap {0} has no stone layout")]
    BadHandicap(u8),
    #[error("record is {found}, patterns are {expected}")]
    SizeMismatch { expected: BoardSize, found: BoardSize },
    #[error("expected a {kind:?} node at {expected}")]
    Layout { kind: NodeKind, expected: NodeIdx },
    #[error("{kind:?} node {node} inside the record")]
    Misplaced { node: NodeIdx, kind: NodeKind },
    #[error("record has no moves")]
    NoMoves,
    #[error("first move is {found:?}, expected {expected:?}")]
    WrongFirstColor { expected: Color, found: Color },
    #[error("{kind:?} node {node} is not supported")]
    UnsupportedNode { node: NodeIdx, kind: NodeKind },
    #[error("node {node}: {source}")]
    Move { node: NodeIdx, source: MoveError },
    #[error("node {node}: point {point} is off the board")]
    OffBoard { node: NodeIdx, point: Point },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type Result<T, E = PatternError> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep whatever was merged before an error.
    #[default]
    Partial,
    /// Put the pattern tree back as it was when any error occurred.
    AllOrNothing,
}

#[derive(Clone, Debug, Default)]
pub struct MergeOptions {
    /// Deepest move, counted from the first one, that is merged.
    pub move_limit: Option<u32>,
    /// Most new pattern nodes a single line may add.
    pub node_limit: Option<u32>,
    pub policy: MergePolicy,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// The transform applied to every move of the record.
    pub symmetry: Option<Symmetry>,
    pub errors: Vec<PatternError>,
    pub nodes_added: usize,
    pub lines_expanded: usize,
    /// Records of the collection after the first, which are not merged.
    pub records_skipped: usize,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct PatternTree {
    tree: GameTree<Goban>,
    handicap: u8,
    good: Option<Color>,
}

impl PatternTree {
    /// An empty pattern tree whose game-info node describes the board and
    /// the handicap stones.
    pub fn new(size: BoardSize, handicap: u8) -> Result<Self> {
        if handicap == 1 || handicap > 9 {
            return Err(PatternError::BadHandicap(handicap));
        }
        let mut tree = GameTree::new(Goban::new(size, true));
        let collection = tree.add_child(ROOT, NodeKind::Collection, 0)?;
        let info = tree.add_child(collection, NodeKind::GameInfo, 0)?;
        tree.info.file_format = 4;
        tree.info.size = size;

        let version = concat!("kifu:", env!("CARGO_PKG_VERSION"));
        for (id, text) in [
            (PropId::FF, "4".to_owned()),
            (PropId::GM, "1".to_owned()),
            (PropId::CA, "UTF-8".to_owned()),
            (PropId::AP, version.to_owned()),
            (PropId::ST, "1".to_owned()),
            (PropId::SZ, size.to_string()),
            (PropId::HA, handicap.to_string()),
        ] {
            tree.add_property(info, PropertyValue::new(id, id.def().value, text))?;
        }

        let stones = tree.place_handicap(handicap)?;
        if !stones.is_empty() {
            let text = stones.iter().map(ToString::to_string).collect::<String>();
            tree.add_property(info, PropertyValue::new(PropId::AB, PropId::AB.def().value, text))?;
        }
        Ok(Self { tree, handicap, good: None })
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn into_tree(self) -> GameTree {
        self.tree
    }

    pub fn handicap(&self) -> u8 {
        self.handicap
    }

    pub fn size(&self) -> BoardSize {
        self.tree.board().size()
    }

    /// The next merged move is marked good for `color`, once.
    pub fn mark_next_good(&mut self, color: Color) {
        self.good = Some(color);
    }

    /// Merges the main line and every variation of the first record of
    /// `source`. A line that fails is abandoned and the others are still
    /// merged, unless the policy is [`MergePolicy::AllOrNothing`].
    pub fn merge<B: BoardEngine>(
        &mut self,
        source: &GameTree<B>,
        options: &MergeOptions,
    ) -> MergeReport {
        let backup = (options.policy == MergePolicy::AllOrNothing).then(|| self.tree.clone());
        let mut report = MergeReport::default();
        if let Err(error) = miner::Miner::new(self, source, options, &mut report).run() {
            report.errors.push(error);
        }

        if let Some(backup) = backup.filter(|_| !report.errors.is_empty()) {
            self.tree = backup;
            report.nodes_added = 0;
            report.lines_expanded = 0;
        }
        tracing::debug!(
            symmetry = ?report.symmetry,
            nodes_added = report.nodes_added,
            lines = report.lines_expanded,
            errors = report.errors.len(),
            "merged record"
        );
        report
    }
}
