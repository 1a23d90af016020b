use kifu_board::{BoardEngine, BoardSize};
use kifu_scanner::TokenKind::*;
use kifu_tree::{NodeIdx, NodeKind, ROOT};

use crate::actions::{self, Property};
use crate::parser::{MAX_NESTING, Parser, Variation};

pub(crate) fn collection<B: BoardEngine>(p: &mut Parser<'_, '_, B>) {
    tracing::trace!("collection");
    let collection = match p.tree.add_child(ROOT, NodeKind::Collection, 0) {
        Ok(idx) => idx,
        Err(error) => return p.fatal(error.to_string(), p.peek().range),
    };

    while !p.at(EOF) && !p.stopped() {
        if p.at(LEFT_PAREN) {
            p.advance();
            game(p, collection);
        } else {
            p.error_expected(LEFT_PAREN.describe());
            while !p.at(LEFT_PAREN) && !p.at(EOF) {
                p.advance();
            }
        }
    }

    if p.tree.first_child(collection).is_none() {
        p.error("file contains no games", p.peek().range);
    }
}

fn game<B: BoardEngine>(p: &mut Parser<'_, '_, B>, collection: NodeIdx) {
    tracing::trace!("game");
    let start = p.peek().range;
    if !p.at(SEMICOLON) {
        p.error_expected(SEMICOLON.describe());
        if p.at(RIGHT_PAREN) {
            p.advance();
        }
        return;
    }
    p.advance();

    p.tree.board_mut().reset(BoardSize::default(), p.options.play);
    p.tree.info.reset();
    let info = match p.tree.add_child(collection, NodeKind::GameInfo, 0) {
        Ok(idx) => idx,
        Err(error) => return p.fatal(error.to_string(), start),
    };
    let current = properties(p, info, true);
    count_players(p);
    nodes(p, current);

    if p.at(RIGHT_PAREN) {
        p.advance();
    } else if !p.stopped() {
        p.error_expected(RIGHT_PAREN.describe());
    }
    for problem in p.tree.info.check() {
        p.warning(problem, start);
    }
}

fn count_players<B: BoardEngine>(p: &mut Parser<'_, '_, B>) {
    let Some(stats) = p.stats.as_deref_mut() else { return };
    let info = &p.tree.info;
    for (name, rank) in [(&info.black_player, &info.black_rank), (&info.white_player, &info.white_rank)]
    {
        if !name.is_empty() {
            stats.player(name, rank, &p.options.file_name);
        }
    }
}

/// Nodes and variations up to the closing `)` of the current sequence.
/// Returns the last node of the main line.
fn nodes<B: BoardEngine>(p: &mut Parser<'_, '_, B>, mut current: NodeIdx) -> NodeIdx {
    while !p.at(RIGHT_PAREN) && !p.at(EOF) && !p.stopped() {
        match p.peek_kind() {
            SEMICOLON => {
                p.advance();
                current = node(p, current);
            }
            LEFT_PAREN => variation(p, current),
            _ => {
                p.error_expected("')' or ';'");
                p.advance();
            }
        }
    }
    current
}

fn node<B: BoardEngine>(p: &mut Parser<'_, '_, B>, parent: NodeIdx) -> NodeIdx {
    tracing::trace!(%parent, "node");
    let depth = p.tree.board().depth();
    match p.tree.add_child(parent, NodeKind::Interior, depth) {
        Ok(idx) => properties(p, idx, false),
        Err(error) => {
            p.fatal(error.to_string(), p.peek().range);
            parent
        }
    }
}

fn variation<B: BoardEngine>(p: &mut Parser<'_, '_, B>, branch: NodeIdx) {
    let open = p.advance();
    if p.nesting >= MAX_NESTING {
        return p.fatal(format!("variations nested deeper than {MAX_NESTING}"), open.range);
    }
    tracing::trace!(%branch, nesting = p.nesting, "variation");
    p.nesting += 1;
    let variation = Variation::open(branch);

    p.expect(SEMICOLON);
    let first = node(p, branch);
    let leaf = nodes(p, first);
    p.nesting -= 1;

    if p.stopped() {
        variation.abandon();
        return;
    }
    variation.complete(p, leaf);
    p.expect(RIGHT_PAREN);
}

/// Every property of one node. A `S` property moves on to the last node of
/// the chain it creates, which is returned.
fn properties<B: BoardEngine>(
    p: &mut Parser<'_, '_, B>,
    node: NodeIdx,
    in_root: bool,
) -> NodeIdx {
    let mut current = node;
    while p.at(IDENT) && !p.aborted {
        let ident = p.advance();
        let mut values = Vec::new();
        while p.at(LEFT_BRACKET) {
            p.advance();
            let value = p.advance();
            values.push((value.range, p.text_of(&value)));
            p.expect(RIGHT_BRACKET);
        }
        if values.is_empty() {
            p.error_expected(LEFT_BRACKET.describe());
            continue;
        }
        let property = Property { ident: p.text_of(&ident), range: ident.range, values };
        current = actions::apply(p, current, in_root, &property);
    }
    current
}
