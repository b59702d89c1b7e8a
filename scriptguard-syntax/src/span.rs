//! Source locations

use serde::Serialize;

// ============================================================================
// SPAN
// ============================================================================

/// Source location span.
///
/// `start`/`end` are byte offsets into the source (end exclusive). Lines are
/// 1-based, columns are 0-based character offsets within their line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 0,
            end_line: 1,
            end_column: 0,
        }
    }
}

impl Span {
    /// Span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
            end_line: other.end_line,
            end_column: other.end_column,
        }
    }

    /// The first `len` characters of this span, assumed to sit on one line.
    ///
    /// Used to point at a leading keyword (`async`, `var`, ...) inside a
    /// larger node.
    pub fn leading(self, len: usize) -> Span {
        Span {
            start: self.start,
            end: self.start + len,
            line: self.line,
            column: self.column,
            end_line: self.line,
            end_column: self.column + len,
        }
    }

    /// Zero-width span at the end of this one.
    pub fn end_point(self) -> Span {
        Span {
            start: self.end,
            end: self.end,
            line: self.end_line,
            column: self.end_column,
            end_line: self.end_line,
            end_column: self.end_column,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ============================================================================
// LINE INDEX
// ============================================================================

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_word_char(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphanumeric()
}

/// Byte offset to line/column lookup over one source text.
///
/// `\r\n` counts as a single line break.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    source: &'s str,
    /// Byte offset where each line starts.
    starts: Vec<usize>,
    /// Lines without multi-byte characters, where columns are byte distances.
    ascii: Vec<bool>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut starts = vec![0];
        let mut ascii = vec![true];
        let mut chars = source.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
                continue;
            }
            if is_line_terminator(c) {
                starts.push(offset + c.len_utf8());
                ascii.push(true);
            } else if !c.is_ascii() {
                if let Some(line) = ascii.last_mut() {
                    *line = false;
                }
            }
        }
        Self { source, starts, ascii }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Source text under `span`, empty when it is out of range.
    pub fn text(&self, span: Span) -> &'s str {
        self.source.get(span.start..span.end).unwrap_or_default()
    }

    /// 1-based line and 0-based character column of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self.starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let start = self.starts[line];
        let column = if self.ascii[line] {
            offset - start
        } else {
            self.source
                .get(start..offset)
                .map_or(offset - start, |text| text.chars().count())
        };
        (line + 1, column)
    }

    /// Span over the byte range `start..end`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (line, column) = self.position(start);
        let (end_line, end_column) = self.position(end);
        Span {
            start,
            end,
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// First offset at or after `offset` that is not whitespace or a comment.
    pub fn skip_trivia(&self, mut offset: usize) -> usize {
        loop {
            let Some(rest) = self.source.get(offset..) else {
                return self.source.len();
            };
            let Some(c) = rest.chars().next() else {
                return offset;
            };
            if c.is_whitespace() || c == '\u{feff}' {
                offset += c.len_utf8();
            } else if rest.starts_with("//") {
                offset += rest.find(is_line_terminator).unwrap_or(rest.len());
            } else if let Some(comment) = rest.strip_prefix("/*") {
                match comment.find("*/") {
                    Some(close) => offset += close + 4,
                    None => return self.source.len(),
                }
            } else {
                return offset;
            }
        }
    }

    /// The token-like run at the first non-trivia offset from `offset`: a
    /// word or number, or else a single character. Empty at end of input.
    pub fn token_span(&self, offset: usize) -> Span {
        let start = self.skip_trivia(offset);
        let rest = self.source.get(start..).unwrap_or_default();
        let len = match rest.chars().next() {
            None => 0,
            Some(c) if is_word_char(c) => rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len()),
            Some(c) => c.len_utf8(),
        };
        self.span(start, start + len)
    }

    /// Span of `word` when it is the next token after `offset`.
    pub fn word_after(&self, offset: usize, word: &str) -> Option<Span> {
        let token = self.token_span(offset);
        (self.text(token) == word).then_some(token)
    }
}
