//! Checking raw bracket values against the grammar of their property.

use kifu_board::coord::{decode_loc, decode_point, decode_rectangle};
use kifu_board::{BoardSize, Point};
use kifu_tree::properties::ValueKind;

/// What the parser keeps of a property's values.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Interpreted {
    pub(crate) kind: ValueKind,
    pub(crate) text: String,
    pub(crate) points: Vec<Point>,
    pub(crate) problems: Vec<String>,
}

impl Interpreted {
    fn new(kind: ValueKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), points: Vec::new(), problems: Vec::new() }
    }

    fn problem(mut self, problem: String) -> Self {
        self.problems.push(problem);
        self
    }

    fn require(self, ok: bool, problem: impl FnOnce() -> String) -> Self {
        if ok { self } else { self.problem(problem()) }
    }
}

pub(crate) fn interpret(kind: ValueKind, values: &[&str], size: BoardSize) -> Interpreted {
    let first = values.first().copied().unwrap_or_default();
    let mut out = match kind {
        ValueKind::Unknown => return Interpreted::new(kind, values.join("][")),
        ValueKind::SimpleText | ValueKind::Text | ValueKind::ComposedTextText | ValueKind::Real
            if first.is_empty() =>
        {
            Interpreted::new(ValueKind::None, "")
        }
        ValueKind::SimpleText | ValueKind::Text | ValueKind::ComposedTextText | ValueKind::Real => {
            Interpreted::new(kind, first)
        }
        ValueKind::None => {
            Interpreted::new(kind, "")
                .require(first.is_empty(), || format!("expected none, found {first}"))
        }
        ValueKind::NoneOrComposedNumberText if first.is_empty() => {
            Interpreted::new(ValueKind::None, "")
        }
        ValueKind::NoneOrComposedNumberText | ValueKind::ComposedNumberText => {
            let out = Interpreted::new(ValueKind::ComposedNumberText, first);
            match first.split_once(':') {
                Some((number, _)) if number.parse::<u32>().is_ok() => out,
                _ => out.problem(format!("expected number \":\" text, found {first}")),
            }
        }
        ValueKind::ListOfComposedPointText | ValueKind::ListOfComposedPointPoint => {
            let mut out = Interpreted::new(kind, values.join("]["));
            for value in values {
                let (point, rest) = value.split_once(':').unwrap_or((value, ""));
                if decode_point(point).is_err()
                    || (kind == ValueKind::ListOfComposedPointPoint && decode_point(rest).is_err())
                {
                    out.problems.push(format!("bad composed point {value}"));
                }
            }
            return out;
        }
        ValueKind::CompressedListOfPoint => {
            let text = values.concat();
            let mut out = Interpreted::new(kind, text.as_str());
            let mut rest = text.as_str();
            while let Some((pair, tail)) = rest.split_at_checked(2) {
                match decode_point(pair) {
                    Ok(point) => out.points.push(point),
                    Err(error) => out.problems.push(error.to_string()),
                }
                rest = tail;
            }
            if !rest.is_empty() {
                out.problems.push(format!("odd number of characters in point list {text}"));
            }
            return out;
        }
        ValueKind::EListOfPoint if values.len() == 1 && first.is_empty() => {
            Interpreted::new(ValueKind::None, "")
        }
        ValueKind::EListOfPoint | ValueKind::ListOfPoint | ValueKind::ListOfStone => {
            return point_list(kind, values);
        }
        ValueKind::Point | ValueKind::Stone => match decode_point(first) {
            Ok(point) => Interpreted { points: vec![point], ..Interpreted::new(kind, first) },
            Err(error) => Interpreted::new(kind, first).problem(error.to_string()),
        },
        ValueKind::Move => match decode_loc(first, size) {
            Ok(loc) => Interpreted {
                points: loc.point().into_iter().collect(),
                ..Interpreted::new(kind, first)
            },
            Err(error) => Interpreted::new(kind, first).problem(error.to_string()),
        },
        ValueKind::NumberOrComposedNumber => {
            let ok = match first.split_once(':') {
                Some((cols, rows)) => cols.parse::<u32>().is_ok() && rows.parse::<u32>().is_ok(),
                None => first.parse::<u32>().is_ok(),
            };
            Interpreted::new(kind, first)
                .require(ok, || format!("expected number or composed number, found {first}"))
        }
        ValueKind::Number0To3
        | ValueKind::Number1To4
        | ValueKind::Number1To5Or7To16
        | ValueKind::Number => {
            let out = Interpreted::new(kind, first);
            match first.trim().parse::<i64>() {
                Ok(n) if in_range(kind, n) => out,
                Ok(_) => out.problem(format!("{first} is not in {}", kind.phrase())),
                Err(_) => out.problem(format!("expected number, found {first}")),
            }
        }
        ValueKind::Double => {
            Interpreted::new(kind, first)
                .require(matches!(first, "1" | "2"), || format!("expected 1 or 2, found {first}"))
        }
        ValueKind::Color => {
            Interpreted::new(kind, first)
                .require(matches!(first, "B" | "W"), || format!("expected B or W, found {first}"))
        }
    };
    if values.len() > 1 {
        out.problems.push(format!("{} extra values ignored", values.len() - 1));
    }
    out
}

fn in_range(kind: ValueKind, n: i64) -> bool {
    match kind {
        ValueKind::Number0To3 => (0..=3).contains(&n),
        ValueKind::Number1To4 => (1..=4).contains(&n),
        ValueKind::Number1To5Or7To16 => (1..=16).contains(&n) && n != 6,
        _ => true,
    }
}

/// Points are stored expanded and concatenated; `aa:cc` rectangles become
/// their individual points.
fn point_list(kind: ValueKind, values: &[&str]) -> Interpreted {
    let mut out = Interpreted::new(kind, "");
    for value in values {
        match decode_rectangle(value) {
            Ok(points) => out.points.extend(points),
            Err(error) => out.problems.push(error.to_string()),
        }
    }
    out.text = out.points.iter().map(ToString::to_string).collect();
    out
}

/// Removes SGF escapes: `\` keeps the next character and a backslash before
/// a line break drops both.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\n' | '\r') | None => {}
                Some(next) => out.push(next),
            },
            _ => out.push(c),
        }
    }
    out
}
