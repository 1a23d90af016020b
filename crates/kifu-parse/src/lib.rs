//! SGF reader: drives the scanner, builds a [`GameTree`] and replays the
//! moves on a board while doing so.

mod actions;
mod grammar;
mod parser;
mod result;
pub mod stats;
#[cfg(test)]
mod tests;
mod time;
mod values;

use kifu_board::{BoardEngine, BoardSize, Goban};
use kifu_errors::Diagnostics;
use kifu_tree::GameTree;

pub use stats::Statistics;

#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Keep `C` properties.
    pub comments: bool,
    /// Place stones on the board; otherwise moves are only counted.
    pub play: bool,
    /// Stop reading once a line reaches this many moves.
    pub move_limit: Option<u32>,
    /// Used in statistics only.
    pub file_name: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { comments: true, play: true, move_limit: None, file_name: String::new() }
    }
}

#[derive(Debug)]
pub struct Parse<B = Goban> {
    pub tree: GameTree<B>,
    pub diagnostics: Diagnostics,
    /// The move limit stopped the parse early.
    pub limit_reached: bool,
    /// A fatal error stopped the parse; `tree` holds what was read until then.
    pub aborted: bool,
}

pub fn parse(text: &str, options: &ParseOptions) -> Parse {
    parse_with(text, options, Goban::default(), None)
}

pub fn parse_with<B: BoardEngine>(
    text: &str,
    options: &ParseOptions,
    mut board: B,
    mut stats: Option<&mut Statistics>,
) -> Parse<B> {
    board.reset(BoardSize::default(), options.play);
    if let Some(stats) = stats.as_deref_mut() {
        stats.files += 1;
    }

    let mut parser = parser::Parser::new(text, options, GameTree::new(board), stats);
    grammar::collection(&mut parser);
    let (tree, diagnostics, limit_reached, aborted) = parser.finish();

    tracing::debug!(
        file = %options.file_name,
        nodes = tree.len(),
        diagnostics = diagnostics.len(),
        limit_reached,
        aborted,
        "parsed"
    );
    Parse { tree, diagnostics, limit_reached, aborted }
}
