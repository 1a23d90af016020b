use crate::{BoardSize, Loc, Point};

/// One of the eight symmetries of a square board.
///
/// Each symmetry is an optional transpose followed by optional flips of the
/// column and row axes; composition and inverse are computed in that form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symmetry {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipColumns,
    FlipRows,
    Transpose,
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Self; 8] = [
        Self::Identity,
        Self::Rotate90,
        Self::Rotate180,
        Self::Rotate270,
        Self::FlipColumns,
        Self::FlipRows,
        Self::Transpose,
        Self::AntiTranspose,
    ];

    /// `(transpose, flip_columns, flip_rows)`
    fn parts(self) -> (bool, bool, bool) {
        match self {
            Self::Identity => (false, false, false),
            Self::FlipColumns => (false, true, false),
            Self::FlipRows => (false, false, true),
            Self::Rotate180 => (false, true, true),
            Self::Transpose => (true, false, false),
            Self::Rotate90 => (true, true, false),
            Self::Rotate270 => (true, false, true),
            Self::AntiTranspose => (true, true, true),
        }
    }

    fn from_parts(parts: (bool, bool, bool)) -> Self {
        match parts {
            (false, false, false) => Self::Identity,
            (false, true, false) => Self::FlipColumns,
            (false, false, true) => Self::FlipRows,
            (false, true, true) => Self::Rotate180,
            (true, false, false) => Self::Transpose,
            (true, true, false) => Self::Rotate90,
            (true, false, true) => Self::Rotate270,
            (true, true, true) => Self::AntiTranspose,
        }
    }

    /// Whether the symmetry maps a board of `size` onto itself.
    pub fn preserves(self, size: BoardSize) -> bool {
        !self.parts().0 || size.is_square()
    }

    /// The image of `point`, or `None` when the point is off the board.
    pub fn apply(self, point: Point, size: BoardSize) -> Option<Point> {
        if !size.contains(point) {
            return None;
        }
        let (transpose, flip_cols, flip_rows) = self.parts();
        let (mut col, mut row) = (point.col, point.row);
        let (mut cols, mut rows) = (size.cols, size.rows);
        if transpose {
            std::mem::swap(&mut col, &mut row);
            std::mem::swap(&mut cols, &mut rows);
        }
        if flip_cols {
            col = cols - 1 - col;
        }
        if flip_rows {
            row = rows - 1 - row;
        }
        Some(Point::new(col, row))
    }

    pub fn apply_loc(self, loc: Loc, size: BoardSize) -> Option<Loc> {
        match loc {
            Loc::Pass => Some(Loc::Pass),
            Loc::Point(point) => self.apply(point, size).map(Loc::Point),
        }
    }

    pub fn inverse(self) -> Self {
        match self.parts() {
            (true, flip_cols, flip_rows) => Self::from_parts((true, flip_rows, flip_cols)),
            _ => self,
        }
    }

    /// The symmetry equal to applying `self` first and `next` second.
    pub fn then(self, next: Self) -> Self {
        let (t1, c1, r1) = self.parts();
        let (t2, c2, r2) = next.parts();
        let (c1, r1) = if t2 { (r1, c1) } else { (c1, r1) };
        Self::from_parts((t1 ^ t2, c2 ^ c1, r2 ^ r1))
    }
}

/// Orders candidate images: nearest the right edge first, then nearest the
/// top, so the canonical corner is the upper right.
fn rank(point: Point, size: BoardSize) -> (u8, u8) {
    (size.cols - 1 - point.col, point.row)
}

pub(crate) fn canonical(loc: Loc, group: &[Symmetry], size: BoardSize) -> (Loc, Symmetry) {
    let Loc::Point(point) = loc else {
        return (Loc::Pass, Symmetry::Identity);
    };
    group
        .iter()
        .copied()
        .filter(|s| s.preserves(size))
        .filter_map(|s| s.apply(point, size).map(|image| (rank(image, size), s, image)))
        .min()
        .map_or((loc, Symmetry::Identity), |(_, s, image)| (Loc::Point(image), s))
}
