//! Writes game trees back out as SGF text.

use std::io;

use kifu_board::BoardEngine;
use kifu_board::coord::encode_loc;

use crate::properties::ValueKind;
use crate::{GameTree, NodeIdx, NodeKind, PropertyValue, ROOT};

#[derive(Clone, Debug)]
pub struct PrintOptions {
    /// Moves written before a line break; `0` never breaks.
    pub moves_per_line: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { moves_per_line: 10 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("cannot print {0:?} nodes")]
    Unsupported(NodeKind),
    #[error("tree contains no games")]
    NoGames,
}

pub fn write_sgf<B: BoardEngine>(
    tree: &GameTree<B>,
    out: &mut impl io::Write,
    options: &PrintOptions,
) -> Result<(), PrintError> {
    let text = to_sgf_string(tree, options)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

pub fn to_sgf_string<B: BoardEngine>(
    tree: &GameTree<B>,
    options: &PrintOptions,
) -> Result<String, PrintError> {
    let games = tree
        .children(ROOT)
        .flat_map(|collection| tree.children(collection))
        .filter(|&idx| tree.node(idx).kind() == NodeKind::GameInfo)
        .collect::<Vec<_>>();
    if games.is_empty() {
        return Err(PrintError::NoGames);
    }

    let mut printer = Printer { tree, options, out: String::new(), column: 0 };
    for game in games {
        printer.game(game)?;
    }
    Ok(printer.out)
}

enum Step {
    Open,
    Node(NodeIdx),
    Close,
}

struct Printer<'a, B> {
    tree: &'a GameTree<B>,
    options: &'a PrintOptions,
    out: String,
    column: usize,
}

impl<B: BoardEngine> Printer<'_, B> {
    fn game(&mut self, game: NodeIdx) -> Result<(), PrintError> {
        self.out.push('(');
        self.column = 0;
        let mut stack = vec![Step::Node(game)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open => {
                    self.out.push_str("\n(");
                    self.column = 0;
                }
                Step::Close => self.out.push(')'),
                Step::Node(idx) => {
                    let last = self.node(idx)?;
                    let children = self.tree.children(last).collect::<Vec<_>>();
                    if let [only] = children[..] {
                        stack.push(Step::Node(only));
                    } else {
                        for &child in children.iter().rev() {
                            stack.extend([Step::Close, Step::Node(child), Step::Open]);
                        }
                    }
                }
            }
        }
        self.out.push_str("\n)\n");
        Ok(())
    }

    /// Writes one node, or a whole chain of sequence nodes, and returns the
    /// node whose children come next.
    fn node(&mut self, idx: NodeIdx) -> Result<NodeIdx, PrintError> {
        let node = self.tree.node(idx);
        match node.kind() {
            NodeKind::GameInfo => {
                self.out.push(';');
                for (_, value) in self.tree.properties(idx) {
                    self.property(value);
                    self.out.push('\n');
                }
                self.column = 0;
            }
            NodeKind::BlackMove | NodeKind::WhiteMove => {
                self.wrap();
                if let Some((loc, color)) = node.inline_move() {
                    let text = encode_loc(loc, self.tree.info.is_ff4());
                    self.out.push(';');
                    self.out.push(color.letter());
                    self.out.push('[');
                    self.out.push_str(&text);
                    self.out.push(']');
                }
            }
            NodeKind::Interior => {
                self.wrap();
                self.out.push(';');
                for (_, value) in self.tree.properties(idx) {
                    self.property(value);
                }
            }
            NodeKind::Sequence => return Ok(self.sequence(idx)),
            NodeKind::Root | NodeKind::Collection => {}
            kind @ NodeKind::Transfer => return Err(PrintError::Unsupported(kind)),
        }
        Ok(idx)
    }

    /// Sequence nodes that follow each other as only children print as one
    /// `S` property.
    fn sequence(&mut self, start: NodeIdx) -> NodeIdx {
        self.wrap();
        self.out.push_str(";S[");
        let mut current = start;
        loop {
            if let Some(loc) = self.tree.node(current).location() {
                self.out.push_str(&encode_loc(loc, false));
            }
            match self.tree.first_child(current) {
                Some(next)
                    if self.tree.node(next).kind() == NodeKind::Sequence
                        && !self.tree.has_siblings(next) =>
                {
                    current = next;
                }
                _ => break,
            }
        }
        self.out.push(']');
        current
    }

    fn wrap(&mut self) {
        let limit = self.options.moves_per_line;
        if limit > 0 && self.column == limit {
            self.out.push('\n');
            self.column = 0;
        }
        self.column += 1;
    }

    fn property(&mut self, value: &PropertyValue) {
        self.out.push_str(value.prop().ident());
        let text = value.text();
        match value.kind() {
            ValueKind::ListOfPoint
            | ValueKind::EListOfPoint
            | ValueKind::ListOfStone
            | ValueKind::CompressedListOfPoint
                if !text.is_empty() && text.is_ascii() && text.len() % 2 == 0 =>
            {
                for i in (0..text.len()).step_by(2) {
                    self.bracketed(&text[i..i + 2]);
                }
            }
            _ if value.move_color().is_some() && text == "tt" && self.tree.info.is_ff4() => {
                let size = self.tree.board().size();
                self.bracketed(if size.cols <= 19 && size.rows <= 19 { "" } else { text });
            }
            _ => self.bracketed(text),
        }
    }

    fn bracketed(&mut self, text: &str) {
        self.out.push('[');
        self.out.push_str(text);
        self.out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use kifu_board::{Color, Goban, Loc, Point};

    use super::*;
    use crate::properties::PropId;

    fn game() -> (GameTree, NodeIdx) {
        let mut tree = GameTree::new(Goban::default());
        let collection = tree.add_child(ROOT, NodeKind::Collection, 0).unwrap();
        let info = tree.add_child(collection, NodeKind::GameInfo, 0).unwrap();
        tree.info.file_format = 4;
        for (id, kind, text) in [
            (PropId::FF, ValueKind::Number1To4, "4"),
            (PropId::SZ, ValueKind::NumberOrComposedNumber, "19"),
            (PropId::AB, ValueKind::ListOfStone, "pddp"),
        ] {
            tree.add_property(info, PropertyValue::new(id, kind, text)).unwrap();
        }
        (tree, info)
    }

    #[test]
    fn branches_and_passes() {
        let (mut tree, info) = game();
        let main = tree.add_move_child(info, Color::White, Loc::Point(Point::new(2, 2)), 0).unwrap();
        tree.add_move_child(main, Color::Black, Loc::Pass, 1).unwrap();
        let side = tree.add_move_child(main, Color::Black, Loc::Point(Point::new(3, 3)), 1).unwrap();
        tree.add_property(side, PropertyValue::new(PropId::C, ValueKind::Text, "a \\] b")).unwrap();

        let text = to_sgf_string(&tree, &PrintOptions::default()).unwrap();
        expect![[r#"
            (;FF[4]
            SZ[19]
            AB[pd][dp]
            ;W[cc]
            (;B[])
            (;B[dd]C[a \] b])
            )
        "#]]
        .assert_eq(&text);
    }

    #[test]
    fn long_lines_wrap() {
        let (mut tree, info) = game();
        let mut parent = info;
        for i in 0..5u8 {
            let color = if i % 2 == 0 { Color::Black } else { Color::White };
            parent = tree.add_move_child(parent, color, Loc::Point(Point::new(i, i)), 0).unwrap();
        }
        let text = to_sgf_string(&tree, &PrintOptions { moves_per_line: 2 }).unwrap();
        assert!(text.ends_with(";B[aa];W[bb]\n;B[cc];W[dd]\n;B[ee]\n)\n"), "{text}");
    }

    #[test]
    fn sequences_collapse() {
        let (mut tree, info) = game();
        let first = tree.add_sequence_child(info, Loc::Point(Point::new(0, 0)), 0).unwrap();
        let second = tree.add_sequence_child(first, Loc::Point(Point::new(1, 0)), 0).unwrap();
        tree.add_move_child(second, Color::Black, Loc::Point(Point::new(2, 2)), 0).unwrap();
        let text = to_sgf_string(&tree, &PrintOptions::default()).unwrap();
        assert!(text.ends_with(";S[aaba];B[cc]\n)\n"), "{text}");
    }

    #[test]
    fn empty_trees_and_transfers_fail() {
        let tree = GameTree::new(Goban::default());
        assert!(matches!(to_sgf_string(&tree, &PrintOptions::default()), Err(PrintError::NoGames)));

        let (mut tree, info) = game();
        tree.add_child(info, NodeKind::Transfer, 0).unwrap();
        assert!(matches!(
            to_sgf_string(&tree, &PrintOptions::default()),
            Err(PrintError::Unsupported(NodeKind::Transfer))
        ));
    }
}
