//! What each property does to the tree, the board and the game info.

use kifu_board::coord::decode_loc;
use kifu_board::{BoardEngine, BoardError, BoardSize, Color, Loc};
use kifu_tree::properties::{PropClass, PropId, PropertyDef, PropertyTable, ValueKind};
use kifu_tree::{NodeIdx, PropertyValue};
use text_size::TextRange;

use crate::parser::Parser;
use crate::result::game_result;
use crate::stats::Statistics;
use crate::time::parse_time;
use crate::values::{Interpreted, interpret, unescape};

pub(crate) struct Property<'t> {
    pub(crate) ident: &'t str,
    /// Range of the identifier.
    pub(crate) range: TextRange,
    pub(crate) values: Vec<(TextRange, &'t str)>,
}

impl Property<'_> {
    fn texts(&self) -> Vec<&str> {
        self.values.iter().map(|&(_, text)| text).collect()
    }

    fn value_range(&self) -> TextRange {
        self.values.first().map_or(self.range, |&(range, _)| range)
    }
}

/// Applies `prop` to `node` and returns the node later properties go to.
pub(crate) fn apply<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    in_root: bool,
    prop: &Property<'_>,
) -> NodeIdx {
    if let Some(stats) = p.stats.as_deref_mut() {
        Statistics::count(&mut stats.properties, prop.ident);
    }

    let Some(id) = PropertyTable::standard().lookup(prop.ident) else {
        let text = prop.texts().join("][");
        p.warning(format!("Unknown SGF property: {}:{text}", prop.ident), prop.range);
        if let Some(stats) = p.stats.as_deref_mut() {
            stats.unknown_properties += 1;
        }
        add(p, node, PropertyValue::unknown(prop.ident, text), prop.range);
        return node;
    };

    let def = id.def();
    check_class(p, def, in_root, prop.range);
    let value = interpret(def.value, &prop.texts(), p.tree.board().size());
    for problem in &value.problems {
        let message = format!("{id}[{}]: {problem}", prop.texts().join("]["));
        if def.value == ValueKind::Move {
            p.error(message, prop.value_range());
        } else {
            p.warning(message, prop.value_range());
        }
    }

    match id {
        PropId::B | PropId::W => play(p, node, id, &value, prop),
        PropId::S => return sequence(p, node, &value, prop),
        PropId::AB | PropId::AW | PropId::AE => setup(p, node, id, value, prop),
        PropId::SZ => {
            size(p, &value, prop);
            store(p, node, id, value, prop);
        }
        PropId::C if !p.options.comments => {}
        _ => {
            game_info(p, id, &value, prop);
            store(p, node, id, value, prop);
        }
    }
    node
}

fn check_class<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    def: &PropertyDef,
    in_root: bool,
    range: TextRange,
) {
    let problem = match (in_root, def.class) {
        (true, PropClass::Move) => "move property in root node".to_owned(),
        (false, class @ (PropClass::Root | PropClass::Setup | PropClass::GameInfo)) => {
            format!("{} property not in root node", class.keyword())
        }
        _ => return,
    };
    p.warning(format!("{}: {problem}", def.id), range);
}

fn store<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    id: PropId,
    value: Interpreted,
    prop: &Property<'_>,
) {
    add(p, node, PropertyValue::new(id, value.kind, value.text), prop.range);
}

fn add<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    value: PropertyValue,
    range: TextRange,
) {
    if let Err(error) = p.tree.add_property(node, value) {
        p.tree_error(error, range);
    }
}

fn play<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    id: PropId,
    value: &Interpreted,
    prop: &Property<'_>,
) {
    let color = if id == PropId::B { Color::Black } else { Color::White };
    let Ok(loc) = decode_loc(&value.text, p.tree.board().size()) else { return };
    if p.tree.get_move(node).is_ok() {
        p.warning(format!("{id}[{}]: second move in the same node", value.text), prop.range);
    }
    if let Err(error) = p.tree.record_move(node, color, loc) {
        return p.tree_error(error, prop.range);
    }
    match p.tree.board_mut().play(loc, color) {
        Ok(number) => {
            if p.options.move_limit.is_some_and(|limit| number >= limit) {
                tracing::debug!(number, "move limit reached");
                p.limit_reached = true;
            }
        }
        Err(error) => p.warning(format!("{id}[{}]: {error}", value.text), prop.value_range()),
    }
}

fn sequence<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    value: &Interpreted,
    prop: &Property<'_>,
) -> NodeIdx {
    let Some((&first, rest)) = value.points.split_first() else { return node };
    if !p.tree.record_sequence(node, Loc::Point(first)) {
        p.error("S must start its own node", prop.range);
        return node;
    }
    let depth = p.tree.board().depth();
    let mut current = node;
    for &point in rest {
        match p.tree.add_sequence_child(current, Loc::Point(point), depth) {
            Ok(next) => current = next,
            Err(error) => {
                p.fatal(error.to_string(), prop.range);
                break;
            }
        }
    }
    current
}

fn setup<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    id: PropId,
    value: Interpreted,
    prop: &Property<'_>,
) {
    let stone = match id {
        PropId::AB => Some(Color::Black),
        PropId::AW => Some(Color::White),
        _ => None,
    };
    for &point in &value.points {
        if let Err(error) = p.tree.board_mut().setup(point, stone) {
            p.warning(format!("{id}: {error}"), prop.value_range());
        }
        match stone {
            Some(Color::Black) => p.tree.info.black_setup.push(point),
            Some(Color::White) => p.tree.info.white_setup.push(point),
            None => {}
        }
    }
    store(p, node, id, value, prop);
}

fn size<B: BoardEngine>(p: &mut Parser<'_, '_, B>, value: &Interpreted, prop: &Property<'_>) {
    match value.text.parse::<BoardSize>() {
        Ok(size) => {
            p.tree.board_mut().reset(size, p.options.play);
            p.tree.info.size = size;
        }
        Err(BoardError::SizeSyntax(_)) => {}
        Err(error) => p.warning(format!("SZ[{}]: {error}", value.text), prop.value_range()),
    }
}

/// Updates the game info and the statistics from a property that is stored
/// as it is.
fn game_info<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    id: PropId,
    value: &Interpreted,
    prop: &Property<'_>,
) {
    let text = value.text.as_str();
    match id {
        PropId::FF => p.tree.info.file_format = text.parse().unwrap_or_default(),
        PropId::ST => p.tree.info.style = text.parse().unwrap_or_default(),
        PropId::GM => {
            p.tree.info.game = text.parse().unwrap_or_default();
            if text != "1" {
                p.error(format!("GM[{text}]: not a Go record"), prop.value_range());
            }
        }
        PropId::HA => {
            p.tree.info.handicap = text.parse().unwrap_or_default();
            if let Some(stats) = p.stats.as_deref_mut() {
                Statistics::count(&mut stats.handicaps, text);
            }
        }
        PropId::KM => komi(p, text, prop),
        PropId::TM => match parse_time(text) {
            Ok(limit) => p.tree.info.time = Some(limit),
            Err(problem) => p.warning(format!("TM: {problem}"), prop.value_range()),
        },
        PropId::RE => {
            let result = game_result(&unescape(text));
            if let Some(stats) = p.stats.as_deref_mut() {
                Statistics::count(&mut stats.results, &result.value);
                if !result.comment.is_empty() {
                    Statistics::count(&mut stats.result_comments, &result.comment);
                }
            }
            p.tree.info.result = result;
        }
        _ => {}
    }

    if let Some(stats) = p.stats.as_deref_mut() {
        match id {
            PropId::RU => Statistics::count(&mut stats.rules, text),
            PropId::OH => Statistics::count(&mut stats.old_handicaps, text),
            PropId::BR | PropId::WR => Statistics::count(&mut stats.ranks, text),
            _ => {}
        }
    }
    if let Some(field) = p.tree.info.text_field_mut(id) {
        *field = unescape(text);
    }
}

fn komi<B: BoardEngine>(p: &mut Parser<'_, '_, B>, text: &str, prop: &Property<'_>) {
    let komi = &mut p.tree.info.komi;
    komi.set = true;
    if text == "?" {
        komi.known = false;
        return;
    }
    match text.trim().parse::<f32>() {
        Ok(value) => {
            komi.value = value;
            komi.known = true;
        }
        Err(_) => p.warning(format!("KM[{text}]: bad komi"), prop.value_range()),
    }
}
