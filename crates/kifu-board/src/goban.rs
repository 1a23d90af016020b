use crate::{BoardEngine, BoardError, BoardSize, Color, Loc, Point};

#[derive(Clone, Debug)]
enum Change {
    Move { loc: Loc, placed: bool },
    Setup { point: Point, previous: Option<Color>, placed: bool },
}

#[derive(Clone, Debug)]
struct MoveRecord {
    change: Change,
    removed: Vec<(Point, Color)>,
}

/// A go board with captures and a full undo history.
#[derive(Clone, Debug)]
pub struct Goban {
    size: BoardSize,
    apply: bool,
    cells: Vec<Option<Color>>,
    history: Vec<MoveRecord>,
    moves: u32,
}

impl Goban {
    pub fn new(size: BoardSize, apply: bool) -> Self {
        Self { size, apply, cells: vec![None; size.area()], history: Vec::new(), moves: 0 }
    }

    fn set(&mut self, point: Point, stone: Option<Color>) {
        let index = self.size.index(point);
        self.cells[index] = stone;
    }

    fn check(&self, point: Point) -> Result<(), BoardError> {
        if self.size.contains(point) {
            Ok(())
        } else {
            Err(BoardError::OffBoard(point, self.size))
        }
    }

    /// The chain containing `start` and whether it has a liberty.
    fn chain(&self, start: Point) -> (Vec<Point>, bool) {
        let Some(color) = self.status(start) else {
            return (Vec::new(), true);
        };
        let mut seen = vec![false; self.size.area()];
        let mut stack = vec![start];
        let mut chain = Vec::new();
        let mut free = false;
        seen[self.size.index(start)] = true;

        while let Some(point) = stack.pop() {
            chain.push(point);
            for next in self.size.adjacent(point) {
                match self.status(next) {
                    None => free = true,
                    Some(c) if c == color && !seen[self.size.index(next)] => {
                        seen[self.size.index(next)] = true;
                        stack.push(next);
                    }
                    Some(_) => {}
                }
            }
        }
        (chain, free)
    }

    fn remove_if_dead(&mut self, point: Point, removed: &mut Vec<(Point, Color)>) {
        let Some(color) = self.status(point) else { return };
        let (chain, free) = self.chain(point);
        if !free {
            for stone in chain {
                self.set(stone, None);
                removed.push((stone, color));
            }
        }
    }
}

impl Default for Goban {
    fn default() -> Self {
        Self::new(BoardSize::default(), true)
    }
}

impl BoardEngine for Goban {
    fn size(&self) -> BoardSize {
        self.size
    }

    fn reset(&mut self, size: BoardSize, apply: bool) {
        *self = Self::new(size, apply);
    }

    fn depth(&self) -> u32 {
        self.history.len() as u32
    }

    fn move_number(&self) -> u32 {
        self.moves
    }

    fn play(&mut self, loc: Loc, color: Color) -> Result<u32, BoardError> {
        let mut removed = Vec::new();
        let placed = match loc {
            Loc::Point(point) if self.apply => {
                self.check(point)?;
                if self.status(point).is_some() {
                    return Err(BoardError::Occupied(point));
                }
                self.set(point, Some(color));
                for next in self.size.adjacent(point) {
                    if self.status(next) == Some(color.opponent()) {
                        self.remove_if_dead(next, &mut removed);
                    }
                }
                self.remove_if_dead(point, &mut removed);
                true
            }
            _ => false,
        };
        self.history.push(MoveRecord { change: Change::Move { loc, placed }, removed });
        self.moves += 1;
        Ok(self.moves)
    }

    fn setup(&mut self, point: Point, stone: Option<Color>) -> Result<(), BoardError> {
        self.check(point)?;
        let previous = self.status(point);
        if self.apply {
            match (previous, stone) {
                (Some(_), Some(_)) => return Err(BoardError::Occupied(point)),
                (None, None) => return Err(BoardError::AlreadyEmpty(point)),
                _ => self.set(point, stone),
            }
        }
        let change = Change::Setup { point, previous, placed: self.apply };
        self.history.push(MoveRecord { change, removed: Vec::new() });
        Ok(())
    }

    fn undo(&mut self) -> bool {
        let Some(MoveRecord { change, removed }) = self.history.pop() else {
            return false;
        };
        for (point, color) in removed {
            self.set(point, Some(color));
        }
        match change {
            Change::Move { loc, placed } => {
                if let (true, Loc::Point(point)) = (placed, loc) {
                    self.set(point, None);
                }
                self.moves -= 1;
            }
            Change::Setup { point, previous, placed } => {
                if placed {
                    self.set(point, previous);
                }
            }
        }
        true
    }

    fn status(&self, point: Point) -> Option<Color> {
        if !self.size.contains(point) {
            return None;
        }
        self.cells[self.size.index(point)]
    }

    fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::decode_point;

    fn at(text: &str) -> Point {
        decode_point(text).unwrap()
    }

    #[test]
    fn capture_and_undo() {
        let mut board = Goban::new(BoardSize::square(9), true);
        board.play(at("ba").into(), Color::White).unwrap();
        board.play(at("aa").into(), Color::Black).unwrap();
        assert_eq!(board.play(at("ab").into(), Color::White), Ok(3));

        assert_eq!(board.status(at("aa")), None);
        assert_eq!(board.occupied(), 2);

        assert!(board.undo());
        assert_eq!(board.status(at("aa")), Some(Color::Black));
        assert_eq!(board.status(at("ab")), None);
        assert_eq!(board.move_number(), 2);
    }

    #[test]
    fn suicide_removes_own_chain() {
        let mut board = Goban::new(BoardSize::square(9), true);
        board.setup(at("ba"), Some(Color::White)).unwrap();
        board.setup(at("ab"), Some(Color::White)).unwrap();
        board.play(at("aa").into(), Color::Black).unwrap();
        assert_eq!(board.status(at("aa")), None);

        board.undo();
        assert_eq!(board.occupied(), 2);
        assert_eq!(board.depth(), 2);
    }

    #[test]
    fn conflicts_leave_the_board_unchanged() {
        let mut board = Goban::new(BoardSize::square(19), true);
        board.play(at("pd").into(), Color::Black).unwrap();
        assert_eq!(board.play(at("pd").into(), Color::White), Err(BoardError::Occupied(at("pd"))));
        assert_eq!(board.setup(at("dd"), None), Err(BoardError::AlreadyEmpty(at("dd"))));
        assert!(matches!(
            board.play(Loc::Point(Point::new(19, 3)), Color::White),
            Err(BoardError::OffBoard(..))
        ));
        assert_eq!(board.depth(), 1);
        assert_eq!(board.move_number(), 1);
    }

    #[test]
    fn tracking_only_counts() {
        let mut board = Goban::new(BoardSize::square(19), false);
        board.play(at("pd").into(), Color::Black).unwrap();
        board.play(at("pd").into(), Color::White).unwrap();
        board.setup(at("dd"), Some(Color::Black)).unwrap();
        assert_eq!(board.occupied(), 0);
        assert_eq!(board.depth(), 3);
        board.rewind();
        assert_eq!(board.move_number(), 0);
    }

    #[test]
    fn pass_is_a_move() {
        let mut board = Goban::default();
        assert_eq!(board.play(Loc::Pass, Color::Black), Ok(1));
        assert_eq!(board.occupied(), 0);
        assert!(board.undo());
        assert!(!board.undo());
    }
}
