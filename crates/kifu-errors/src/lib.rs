use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::{TextRange, TextSize};

/// How bad a diagnostic is.
///
/// `Fatal` stops the current parse, `Error` is a structural problem that the
/// parser recovered from, `Warning` never affects the resulting tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Self::Warning => Level::Warning,
            Self::Error | Self::Fatal => Level::Error,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn new(severity: Severity, message: impl Into<String>, range: TextRange) -> Self {
        Self { severity, message: message.into(), range }
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Severity::Error, message, range)
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Severity::Warning, message, range)
    }

    pub fn fatal(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Severity::Fatal, message, range)
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

/// An ordered, de-duplicated collection of diagnostics for one source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.push(Diagnostic::error(message, range));
    }

    pub fn warning(&mut self, message: impl Into<String>, range: TextRange) {
        self.push(Diagnostic::warning(message, range));
    }

    pub fn fatal(&mut self, message: impl Into<String>, range: TextRange) {
        self.push(Diagnostic::fatal(message, range));
    }

    /// Sorts by position and drops repeats of the same message at the same
    /// offset.
    pub fn normalize(&mut self) {
        self.items.sort_by(|a, b| {
            a.range
                .start()
                .cmp(&b.range.start())
                .then_with(|| b.severity.cmp(&a.severity))
                .then_with(|| a.message.cmp(&b.message))
        });
        self.items.dedup_by(|b, a| {
            a.range.start() == b.range.start()
                && a.severity == b.severity
                && a.message == b.message
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity >= Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_fatal(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Fatal)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset: u32) -> TextRange {
        TextRange::empty(TextSize::new(offset))
    }

    #[test]
    fn normalize_sorts_by_offset_and_drops_repeats() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("unknown property", at(12));
        diagnostics.error("expected ';'", at(3));
        diagnostics.warning("unknown property", at(12));
        diagnostics.warning("unknown property", at(20));

        diagnostics.normalize();

        let offsets =
            diagnostics.iter().map(|d| u32::from(d.range().start())).collect::<Vec<_>>();
        assert_eq!(offsets, [3, 12, 20]);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.warnings().count(), 2);
    }

    #[test]
    fn fatal_counts_as_error() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.fatal("node capacity exceeded", at(0));
        assert!(diagnostics.is_fatal());
        assert_eq!(diagnostics.errors().count(), 1);
    }
}
