use crate::{Point, Symmetry};

const TWO_STONES: [Symmetry; 4] =
    [Symmetry::Identity, Symmetry::Rotate180, Symmetry::Transpose, Symmetry::AntiTranspose];
const THREE_STONES: [Symmetry; 2] = [Symmetry::Identity, Symmetry::Transpose];
const SIDE_STONES: [Symmetry; 4] =
    [Symmetry::Identity, Symmetry::Rotate180, Symmetry::FlipColumns, Symmetry::FlipRows];

/// Symmetries that leave the stone layout of [`handicap_points`] unchanged.
pub fn handicap_symmetries(handicap: u8) -> &'static [Symmetry] {
    match handicap {
        2 => &TWO_STONES,
        3 => &THREE_STONES,
        6 | 7 => &SIDE_STONES,
        _ => &Symmetry::ALL,
    }
}

/// Fixed handicap stones for a square board of side `size`, in placement
/// order. Corners come first, starting upper right.
pub fn handicap_points(handicap: u8, size: u8) -> Vec<Point> {
    if size < 7 {
        return Vec::new();
    }
    let line = if size < 13 { 2 } else { 3 };
    let far = size - line - 1;
    let mid = (size - 1) / 2;

    let upper_right = Point::new(far, line);
    let lower_left = Point::new(line, far);
    let lower_right = Point::new(far, far);
    let upper_left = Point::new(line, line);
    let left = Point::new(line, mid);
    let right = Point::new(far, mid);
    let top = Point::new(mid, line);
    let bottom = Point::new(mid, far);
    let center = Point::new(mid, mid);

    let corners = [upper_right, lower_left, lower_right, upper_left];
    let (corner_count, extra) = match handicap {
        2 => (2, vec![]),
        3 => (3, vec![]),
        4 => (4, vec![]),
        5 => (4, vec![center]),
        6 => (4, vec![left, right]),
        7 => (4, vec![left, right, center]),
        8 => (4, vec![left, right, top, bottom]),
        9 => (4, vec![left, right, top, bottom, center]),
        _ => return Vec::new(),
    };
    corners[..corner_count].iter().copied().chain(extra).collect()
}
