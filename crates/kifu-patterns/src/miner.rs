use std::collections::VecDeque;

use kifu_board::{BoardEngine, BoardSize, Color, Loc, Symmetry};
use kifu_tree::properties::PropId;
use kifu_tree::{GameTree, NodeIdx, NodeKind, PropertyValue};

use crate::{
    COLLECTION, GAME_INFO, MergeOptions, MergePolicy, MergeReport, PatternError, PatternTree,
    Result,
};

/// A line of the record still to be merged.
#[derive(Clone, Copy, Debug)]
struct Line {
    /// First record node of the line.
    source: NodeIdx,
    /// Pattern node the line continues from.
    parent: NodeIdx,
    /// Moves already merged before the line starts.
    depth: u32,
    main: bool,
}

pub(crate) struct Miner<'a, B> {
    patterns: &'a mut PatternTree,
    source: &'a GameTree<B>,
    options: &'a MergeOptions,
    report: &'a mut MergeReport,
    /// Variations in the order they were found.
    backlog: VecDeque<Line>,
}

impl<'a, B: BoardEngine> Miner<'a, B> {
    pub(crate) fn new(
        patterns: &'a mut PatternTree,
        source: &'a GameTree<B>,
        options: &'a MergeOptions,
        report: &'a mut MergeReport,
    ) -> Self {
        Self { patterns, source, options, report, backlog: VecDeque::new() }
    }

    pub(crate) fn run(mut self) -> Result<()> {
        self.check_records()?;
        let expected = self.patterns.size();
        let found = self.record_size()?;
        if found != expected {
            return Err(PatternError::SizeMismatch { expected, found });
        }
        let Some(first) = self.check_layout()? else { return Ok(()) };
        let (loc, color) = self.get_move(first)?;
        // An off-board first move has no canonical form.
        self.transform(first, loc, Symmetry::Identity)?;
        let expected = if self.patterns.handicap == 0 { Color::Black } else { Color::White };
        if color != expected {
            return Err(PatternError::WrongFirstColor { expected, found: color });
        }

        let (_, symmetry) = self.patterns.tree.board().canonical(loc, self.patterns.handicap);
        self.report.symmetry = Some(symmetry);
        tracing::trace!(?symmetry, "canonical transform");

        let mut next = Some(Line { source: first, parent: GAME_INFO, depth: 0, main: true });
        while let Some(line) = next {
            match self.expand(line, symmetry) {
                Ok(()) => self.report.lines_expanded += 1,
                Err(error) if self.options.policy == MergePolicy::AllOrNothing => {
                    return Err(error);
                }
                Err(error) => {
                    tracing::trace!(source = %line.source, %error, "abandoned line");
                    self.report.errors.push(error);
                }
            }
            next = self.backlog.pop_front();
        }
        Ok(())
    }

    /// Board size of the first record. Later records of a collection may
    /// declare their own.
    fn record_size(&self) -> Result<BoardSize> {
        match self.source.find_property(GAME_INFO, PropId::SZ) {
            Some(value) => Ok(value.text().parse::<BoardSize>()?),
            None => Ok(BoardSize::default()),
        }
    }

    fn check_records(&mut self) -> Result<()> {
        let layout = [(COLLECTION, NodeKind::Collection), (GAME_INFO, NodeKind::GameInfo)];
        for (expected, kind) in layout {
            let found = self.source.get(expected).map(|node| node.kind());
            if found != Some(kind) {
                return Err(PatternError::Layout { kind, expected });
            }
        }
        let later = self.source.children(COLLECTION).skip(1).count();
        if later > 0 {
            tracing::debug!(later, "only the first record is merged");
        }
        self.report.records_skipped = later;
        Ok(())
    }

    /// Checks the shape of the first record and finds its first move.
    /// Unsupported nodes anywhere in that record are all reported and
    /// nothing is merged.
    fn check_layout(&mut self) -> Result<Option<NodeIdx>> {
        let mut first = None;
        let mut supported = true;
        for node in self.source.depth_first_pre(GAME_INFO).skip(1) {
            let kind = self.source.node(node).kind();
            match kind {
                NodeKind::Root | NodeKind::Collection | NodeKind::GameInfo => {
                    return Err(PatternError::Misplaced { node, kind });
                }
                NodeKind::Interior | NodeKind::BlackMove | NodeKind::WhiteMove => {
                    first.get_or_insert(node);
                }
                NodeKind::Sequence | NodeKind::Transfer => {
                    self.report.errors.push(PatternError::UnsupportedNode { node, kind });
                    supported = false;
                }
            }
        }
        if !supported {
            return Ok(None);
        }
        first.ok_or(PatternError::NoMoves).map(Some)
    }

    fn transform(&self, node: NodeIdx, loc: Loc, symmetry: Symmetry) -> Result<Loc> {
        let Loc::Point(point) = loc else { return Ok(Loc::Pass) };
        self.patterns
            .tree
            .board()
            .transform(loc, symmetry)
            .ok_or(PatternError::OffBoard { node, point })
    }

    fn get_move(&self, node: NodeIdx) -> Result<(Loc, Color)> {
        self.source.get_move(node).map_err(|source| PatternError::Move { node, source })
    }

    /// Follows first children from `line.source`, adding every move that is
    /// not in the pattern tree yet.
    fn expand(&mut self, line: Line, symmetry: Symmetry) -> Result<()> {
        let mut current = Some(line.source);
        let mut parent = line.parent;
        let mut depth = line.depth;
        let mut added = 0;
        let mut first = true;

        while let Some(node) = current {
            if self.options.move_limit.is_some_and(|limit| depth >= limit)
                || self.options.node_limit.is_some_and(|limit| added >= limit)
            {
                break;
            }
            let (loc, color) = self.get_move(node)?;
            let loc = self.transform(node, loc, symmetry)?;
            let (pattern, new) = self.find_or_add(parent, color, loc)?;
            if new {
                added += 1;
                self.report.nodes_added += 1;
            }

            if first && !line.main {
                self.annotate(pattern, PropId::BM, PropId::TR, loc)?;
            }
            if let Some(good) = self.patterns.good.take() {
                let marker = if good == Color::Black { PropId::GB } else { PropId::GW };
                self.annotate(pattern, marker, PropId::SQ, loc)?;
            }
            first = false;

            if self.source.is_first_child(node) {
                self.queue_siblings(node, parent, depth);
            }
            depth += 1;
            parent = pattern;
            current = self.source.first_child(node);
        }
        Ok(())
    }

    fn queue_siblings(&mut self, node: NodeIdx, parent: NodeIdx, depth: u32) {
        let Some(source_parent) = self.source.parent(node) else { return };
        for sibling in self.source.children(source_parent).skip(1) {
            tracing::trace!(%sibling, %parent, depth, "queued variation");
            self.backlog.push_back(Line { source: sibling, parent, depth, main: false });
        }
    }

    fn find_or_add(&mut self, parent: NodeIdx, color: Color, loc: Loc) -> Result<(NodeIdx, bool)> {
        let tree = &mut self.patterns.tree;
        if let Some(found) = tree.find_child(parent, loc) {
            return Ok((found, false));
        }
        Ok((tree.add_move_child(parent, color, loc, 0)?, true))
    }

    /// Adds `marker[1]` and `point_marker[loc]` unless they are there already.
    /// Passes are not marked.
    fn annotate(
        &mut self,
        node: NodeIdx,
        marker: PropId,
        point_marker: PropId,
        loc: Loc,
    ) -> Result<()> {
        let Loc::Point(point) = loc else { return Ok(()) };
        let tree = &mut self.patterns.tree;
        let text = point.to_string();
        for (id, text) in [(marker, "1"), (point_marker, text.as_str())] {
            if !tree.has_property(node, id, text) {
                tree.add_property(node, PropertyValue::new(id, id.def().value, text))?;
            }
        }
        Ok(())
    }
}
