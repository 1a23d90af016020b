//! Lexer for SGF game records.
//!
//! Outside brackets the scanner produces identifiers and delimiters. After a
//! `[` it switches to value mode and returns everything up to the matching
//! unescaped `]` as a single [`TokenKind::VALUE`] token, so escaped brackets and
//! free text pass through untouched.

mod cursor;

use cursor::Cursor;
use text_size::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    SEMICOLON,
    IDENT,
    VALUE,
    ILLEGAL,
    EOF,
}

impl TokenKind {
    /// Spelling used in "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::LEFT_PAREN => "'('",
            Self::RIGHT_PAREN => "')'",
            Self::LEFT_BRACKET => "'['",
            Self::RIGHT_BRACKET => "']'",
            Self::SEMICOLON => "';'",
            Self::IDENT => "property identifier",
            Self::VALUE => "property value",
            Self::ILLEGAL => "illegal character",
            Self::EOF => "end of file",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    const EOF: Self = Self { kind: TokenKind::EOF, range: TextRange::empty(TextSize::new(0)) };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub range: TextRange,
    pub message: String,
}

pub struct Scanner<'t> {
    text: &'t str,
    cursor: Cursor<'t>,
    current: Token,
    in_value: bool,
    errors: Vec<ScanError>,
    error_count: usize,
}

impl<'t> Scanner<'t> {
    pub fn new(text: &'t str) -> Self {
        let mut scanner = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            in_value: false,
            errors: Vec::new(),
            error_count: 0,
        };
        scanner.next_token();
        scanner
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Source text covered by `token`.
    pub fn text_of(&self, token: &Token) -> &'t str {
        &self.text[token.range]
    }

    pub fn next_token(&mut self) -> Token {
        let (kind, range) = self.scan();
        std::mem::replace(&mut self.current, Token { kind, range })
    }

    /// Hands over the errors reported since the last call.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    /// Total number of errors reported so far, drained or not.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    fn report(&mut self, range: TextRange, message: String) {
        self.error_count += 1;
        self.errors.push(ScanError { range, message });
    }

    fn scan(&mut self) -> (TokenKind, TextRange) {
        if self.in_value {
            self.in_value = false;
            return self.value();
        }

        self.cursor.advance_while(|c| c.is_ascii_whitespace());
        self.cursor.reset_pos_within_token();

        if self.cursor.is_eof() {
            return (TokenKind::EOF, self.range());
        }

        let kind = match self.cursor.advance() {
            '(' => TokenKind::LEFT_PAREN,
            ')' => TokenKind::RIGHT_PAREN,
            ';' => TokenKind::SEMICOLON,
            ']' => TokenKind::RIGHT_BRACKET,
            '[' => {
                self.in_value = true;
                TokenKind::LEFT_BRACKET
            }
            'A'..='Z' => {
                self.cursor.advance_while(|c| c.is_ascii_uppercase());
                TokenKind::IDENT
            }
            other => {
                let range = self.range();
                self.report(range, format!("illegal character {other:?}"));
                TokenKind::ILLEGAL
            }
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();
        (kind, range)
    }

    fn value(&mut self) -> (TokenKind, TextRange) {
        loop {
            if self.cursor.is_eof() {
                let range = self.range();
                self.report(range, "property value not terminated".to_owned());
                break;
            }
            match self.cursor.peek() {
                ']' => break,
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.is_eof() {
                        let range = self.range();
                        self.report(range, "escape sequence not terminated".to_owned());
                        break;
                    }
                    self.cursor.advance();
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }

        let range = self.range();
        self.cursor.reset_pos_within_token();
        (TokenKind::VALUE, range)
    }
}

/// Scans `text` to the end, reporting every error through `on_error` and every
/// token through `on_token`. Stops early when `on_token` returns `false`.
/// Returns the number of errors.
pub fn tokenize(
    text: &str,
    mut on_error: impl FnMut(&ScanError),
    mut on_token: impl FnMut(Token, &str) -> bool,
) -> usize {
    let mut scanner = Scanner::new(text);
    loop {
        for error in scanner.take_errors() {
            on_error(&error);
        }
        let token = scanner.next_token();
        if token.kind == TokenKind::EOF || !on_token(token, scanner.text_of(&token)) {
            break;
        }
    }
    for error in scanner.take_errors() {
        on_error(&error);
    }
    scanner.error_count()
}

#[cfg(test)]
mod tests {
    use super::TokenKind::*;
    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.range]
    }

    #[test]
    fn node_with_properties() {
        let text = "(;GM[1]SZ[19])";
        let mut scanner = Scanner::new(text);

        for (kind, lit) in [
            (LEFT_PAREN, "("),
            (SEMICOLON, ";"),
            (IDENT, "GM"),
            (LEFT_BRACKET, "["),
            (VALUE, "1"),
            (RIGHT_BRACKET, "]"),
            (IDENT, "SZ"),
            (LEFT_BRACKET, "["),
            (VALUE, "19"),
            (RIGHT_BRACKET, "]"),
            (RIGHT_PAREN, ")"),
            (EOF, ""),
        ] {
            let token = scanner.next_token();
            assert_eq!(token.kind, kind);
            assert_eq!(token_text(&token, text), lit);
        }
        assert_eq!(scanner.error_count(), 0);
    }

    #[test]
    fn whitespace_between_tokens() {
        let text = " (\n ;\tB [pd]\r\n)";
        let kinds = {
            let mut kinds = Vec::new();
            tokenize(text, |_| {}, |token, _| {
                kinds.push(token.kind);
                true
            });
            kinds
        };
        assert_eq!(
            kinds,
            [LEFT_PAREN, SEMICOLON, IDENT, LEFT_BRACKET, VALUE, RIGHT_BRACKET, RIGHT_PAREN]
        );
    }

    #[test]
    fn empty_value() {
        let text = "W[]";
        let mut scanner = Scanner::new(text);

        let token = scanner.next_token();
        assert_eq!(token.kind, IDENT);
        let token = scanner.next_token();
        assert_eq!(token.kind, LEFT_BRACKET);

        let token = scanner.next_token();
        assert_eq!(token.kind, VALUE);
        assert!(token.range.is_empty());
        assert_eq!(u32::from(token.range.start()), 2);

        let token = scanner.next_token();
        assert_eq!(token.kind, RIGHT_BRACKET);
        assert_eq!(scanner.next_token().kind, EOF);
    }

    #[test]
    fn value_text_passes_through_verbatim() {
        let text = r"C[a (b) ;c [d\] e\\]";
        let mut scanner = Scanner::new(text);

        scanner.next_token();
        scanner.next_token();
        let token = scanner.next_token();
        assert_eq!(token.kind, VALUE);
        assert_eq!(token_text(&token, text), r"a (b) ;c [d\] e\\");
        assert_eq!(scanner.next_token().kind, RIGHT_BRACKET);
        assert_eq!(scanner.next_token().kind, EOF);
    }

    #[test]
    fn multibyte_value() {
        let text = "PB[本因坊秀策]";
        let mut scanner = Scanner::new(text);

        scanner.next_token();
        scanner.next_token();
        let token = scanner.next_token();
        assert_eq!(token_text(&token, text), "本因坊秀策");
        assert_eq!(scanner.next_token().kind, RIGHT_BRACKET);
    }

    #[test]
    fn illegal_characters_are_reported_and_skipped() {
        let text = "(;b%B[aa])";
        let mut scanner = Scanner::new(text);

        assert_eq!(scanner.next_token().kind, LEFT_PAREN);
        assert_eq!(scanner.next_token().kind, SEMICOLON);

        let token = scanner.next_token();
        assert_eq!(token.kind, ILLEGAL);
        assert_eq!(token_text(&token, text), "b");
        let token = scanner.next_token();
        assert_eq!(token.kind, ILLEGAL);
        assert_eq!(token_text(&token, text), "%");

        let token = scanner.next_token();
        assert_eq!(token.kind, IDENT);
        assert_eq!(token_text(&token, text), "B");

        let errors = scanner.take_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "illegal character 'b'");
        assert_eq!(scanner.error_count(), 2);
        assert!(scanner.take_errors().is_empty());
    }

    #[test]
    fn unterminated_value() {
        let text = "C[never closed";
        let mut messages = Vec::new();
        let count = tokenize(text, |error| messages.push(error.message.clone()), |_, _| true);

        assert_eq!(count, 1);
        assert_eq!(messages, ["property value not terminated"]);
    }

    #[test]
    fn trailing_escape() {
        let text = "C[abc\\";
        let count = tokenize(text, |_| {}, |_, _| true);
        assert_eq!(count, 1);
    }
}
