use drop_bomb::DropBomb;
use kifu_board::BoardEngine;
use kifu_errors::Diagnostics;
use kifu_scanner::{Scanner, Token, TokenKind};
use kifu_tree::{GameTree, NodeIdx, TreeError};
use text_size::TextRange;

use crate::ParseOptions;
use crate::stats::Statistics;

/// Deepest `(` nesting accepted before the parse is abandoned.
pub(crate) const MAX_NESTING: usize = 1000;

pub(crate) struct Parser<'t, 'o, B> {
    text: &'t str,
    scanner: Scanner<'t>,
    pub(crate) tree: GameTree<B>,
    pub(crate) options: &'o ParseOptions,
    pub(crate) stats: Option<&'o mut Statistics>,
    diagnostics: Diagnostics,
    pub(crate) nesting: usize,
    pub(crate) limit_reached: bool,
    pub(crate) aborted: bool,
}

impl<'t, 'o, B: BoardEngine> Parser<'t, 'o, B> {
    pub(crate) fn new(
        text: &'t str,
        options: &'o ParseOptions,
        tree: GameTree<B>,
        stats: Option<&'o mut Statistics>,
    ) -> Self {
        Self {
            text,
            scanner: Scanner::new(text),
            tree,
            options,
            stats,
            diagnostics: Diagnostics::new(),
            nesting: 0,
            limit_reached: false,
            aborted: false,
        }
    }

    pub(crate) fn peek(&self) -> Token {
        *self.scanner.peek()
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.scanner.peek().kind
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// `true` once the move limit or a fatal error ended the parse.
    pub(crate) fn stopped(&self) -> bool {
        self.limit_reached || self.aborted
    }

    pub(crate) fn text_of(&self, token: &Token) -> &'t str {
        &self.text[token.range]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.scanner.next_token();
        for error in self.scanner.take_errors() {
            self.diagnostics.error(error.message, error.range);
        }
        token
    }

    /// Consumes the current token whatever it is, reporting it unless it is
    /// `kind`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Token {
        if !self.at(kind) {
            self.error_expected(kind.describe());
        }
        self.advance()
    }

    pub(crate) fn error_expected(&mut self, what: &str) {
        let token = self.peek();
        let mut message = format!("expected {what}, found {}", token.kind.describe());
        if matches!(token.kind, TokenKind::IDENT | TokenKind::VALUE) {
            message.push(' ');
            message.push_str(self.text_of(&token));
        }
        self.error(message, token.range);
    }

    /// Structural errors are not reported once the move limit was reached.
    pub(crate) fn error(&mut self, message: impl Into<String>, range: TextRange) {
        if !self.limit_reached {
            self.diagnostics.error(message, range);
        }
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>, range: TextRange) {
        self.diagnostics.warning(message, range);
    }

    pub(crate) fn fatal(&mut self, message: impl Into<String>, range: TextRange) {
        self.aborted = true;
        self.diagnostics.fatal(message, range);
    }

    /// Reports a failed tree update with the severity it deserves.
    pub(crate) fn tree_error(&mut self, error: TreeError, range: TextRange) {
        match error {
            TreeError::Capacity(error) => self.fatal(error.to_string(), range),
            TreeError::NoProperties(_) => {
                self.error("a property cannot follow S in the same node", range);
            }
        }
    }

    pub(crate) fn finish(mut self) -> (GameTree<B>, Diagnostics, bool, bool) {
        self.diagnostics.normalize();
        (self.tree, self.diagnostics, self.limit_reached, self.aborted)
    }
}

/// A parenthesised variation being read. Completing it walks from the leaf it
/// ended on back to the branch point, undoing the board as it goes.
pub(crate) struct Variation {
    branch: NodeIdx,
    bomb: DropBomb,
}

impl Variation {
    pub(crate) fn open(branch: NodeIdx) -> Self {
        Self { branch, bomb: DropBomb::new("Variation must be either completed or abandoned") }
    }

    pub(crate) fn complete<B: BoardEngine>(mut self, p: &mut Parser<'_, '_, B>, leaf: NodeIdx) {
        self.bomb.defuse();
        let mut current = leaf;
        while current != self.branch {
            let depth = p.tree.node(current).move_depth();
            while p.tree.board().depth() > depth {
                p.tree.board_mut().undo();
            }
            match p.tree.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    /// Leaves the board as it is; used when parsing stops inside the
    /// variation.
    pub(crate) fn abandon(mut self) {
        self.bomb.defuse();
    }
}
