//! SGF point encoding: one letter per axis from `a..=z` then `A..=Z`.

use std::fmt;

use crate::{BoardSize, Loc, Point};

pub const LETTERS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("bad coordinate {0:?}")]
    BadCoordinate(String),
}

fn value(letter: u8) -> Option<u8> {
    match letter {
        b'a'..=b'z' => Some(letter - b'a'),
        b'A'..=b'Z' => Some(letter - b'A' + 26),
        _ => None,
    }
}

pub fn decode_point(text: &str) -> Result<Point, CoordError> {
    match text.as_bytes() {
        &[c, r] => match (value(c), value(r)) {
            (Some(col), Some(row)) => Ok(Point::new(col, row)),
            _ => Err(CoordError::BadCoordinate(text.to_owned())),
        },
        _ => Err(CoordError::BadCoordinate(text.to_owned())),
    }
}

/// Decodes a move value. The empty value is a pass, and so is `tt` on boards
/// no larger than 19, where it cannot name a point.
pub fn decode_loc(text: &str, size: BoardSize) -> Result<Loc, CoordError> {
    if text.is_empty() || (text == "tt" && size.cols <= 19 && size.rows <= 19) {
        return Ok(Loc::Pass);
    }
    decode_point(text).map(Loc::Point)
}

/// Decodes a point list value: concatenated two-letter points.
pub fn decode_points(text: &str) -> Result<Vec<Point>, CoordError> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return Err(CoordError::BadCoordinate(text.to_owned()));
    }
    (0..text.len()).step_by(2).map(|i| decode_point(&text[i..i + 2])).collect()
}

/// Expands an FF[4] compressed rectangle `aa:cc` into its points, row by row.
pub fn decode_rectangle(text: &str) -> Result<Vec<Point>, CoordError> {
    let Some((first, second)) = text.split_once(':') else {
        return decode_point(text).map(|p| vec![p]);
    };
    let (a, b) = (decode_point(first)?, decode_point(second)?);
    let (cols, rows) = (a.col.min(b.col)..=a.col.max(b.col), a.row.min(b.row)..=a.row.max(b.row));
    Ok(rows.flat_map(|row| cols.clone().map(move |col| Point::new(col, row))).collect())
}

pub fn encode_point(point: Point) -> String {
    point.to_string()
}

/// Encodes a move. A pass is the empty value under FF[4] and `tt` before.
pub fn encode_loc(loc: Loc, ff4: bool) -> String {
    match loc {
        Loc::Point(point) => encode_point(point),
        Loc::Pass if ff4 => String::new(),
        Loc::Pass => "tt".to_owned(),
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |v: u8| LETTERS.get(usize::from(v)).map_or('?', |&b| char::from(b));
        write!(f, "{}{}", letter(self.col), letter(self.row))
    }
}
