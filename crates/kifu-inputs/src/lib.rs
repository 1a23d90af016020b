use std::io;

use camino::{Utf8Path, Utf8PathBuf};
pub use line_index::{LineCol, LineIndex, TextSize};

/// A game-record source: where it came from and its text.
#[derive(Debug)]
pub struct File {
    path: Utf8PathBuf,
    text: String,
    line_index: LineIndex,
}

impl File {
    pub fn new(path: impl Into<Utf8PathBuf>, text: String) -> Self {
        let line_index = LineIndex::new(&text);
        Self { path: path.into(), text, line_index }
    }

    /// Reads a file from disk. Records in legacy charsets are decoded lossily.
    pub fn read(path: impl Into<Utf8PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// One-based line and column of `offset`.
    pub fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let LineCol { line, col } = self.line_index.line_col(offset);
        (line + 1, col + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_is_one_based() {
        let file = File::new("game.sgf", "(;GM[1]\n;B[pd])\n".to_owned());
        assert_eq!(file.line_col(TextSize::new(0)), (1, 1));
        assert_eq!(file.line_col(TextSize::new(9)), (2, 2));
    }
}
