//! Nesting pre-check
//!
//! The parser descends recursively, so a long enough chain of brackets,
//! prefix operators or right-associative operators would exhaust the stack
//! before any tree exists to measure. This scan runs over the raw text first
//! and rejects sources whose nesting could exceed [`MAX_NESTING_DEPTH`].
//!
//! The scan is lexical and over-counts on purpose: it does not skip strings,
//! comments or regular expressions, so nothing can be hidden from it.
//! Every open bracket counts one level. Within a bracket level, each
//! operator run and each keyword that can start a nested construct adds a
//! link; `;` and `,` end the chain. A line break ends it too, but only
//! where the source cannot be continuing a nested construct: between a
//! complete operand and a plain word, or between an operand other than `)`
//! and a statement keyword.

use super::parser::MAX_NESTING_DEPTH;

/// Words after which the parser recurses into a nested statement or
/// expression.
const NESTING_WORDS: &[&str] = &[
    "await", "delete", "do", "else", "extends", "for", "if", "new", "typeof", "void", "while", "with",
    "yield",
];

/// Nesting words that can only begin a statement.
const STATEMENT_WORDS: &[&str] = &["do", "for", "if", "while", "with"];

/// The kind of the last token seen by [`check_nesting_depth`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum Last {
    Operand,
    /// `)` may close the head of `if (...)` or a loop, whose body nests.
    CloseParen,
    Other,
}

fn is_word_char(c: char) -> bool {
    c == '$' || c == '_' || c == '\\' || c.is_alphanumeric()
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '!' | '~' | '+' | '-' | '=' | '?' | '*' | '<' | '>' | '&' | '|' | '%' | '^' | ':')
}

/// Per-level chain bookkeeping for [`check_nesting_depth`].
struct Chains {
    /// Links in each open bracket level, outermost first.
    levels: Vec<usize>,
    /// Open brackets plus every link in every open level.
    total: usize,
}

impl Chains {
    fn open(&mut self) {
        self.levels.push(0);
        self.total += 1;
    }

    fn close(&mut self) {
        if self.levels.len() > 1 {
            if let Some(links) = self.levels.pop() {
                self.total = self.total.saturating_sub(links + 1);
            }
        }
    }

    fn link(&mut self, links: usize) {
        if let Some(level) = self.levels.last_mut() {
            *level += links;
            self.total += links;
        }
    }

    fn reset(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            self.total = self.total.saturating_sub(*level);
            *level = 0;
        }
    }
}

/// Byte offset of the first character at which the nesting bound is
/// exceeded, if any.
pub(crate) fn check_nesting_depth(source: &str) -> Result<(), usize> {
    let mut chains = Chains {
        levels: vec![0],
        total: 0,
    };
    let mut last = Last::Other;
    // Whether a line break followed an operand.
    let mut line_break = false;

    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            line_break |= last != Last::Other;
            continue;
        }
        if c.is_whitespace() {
            continue;
        }

        match c {
            '(' | '[' | '{' => {
                chains.open();
                last = Last::Other;
            }
            ')' => {
                chains.close();
                last = Last::CloseParen;
            }
            ']' | '}' => {
                chains.close();
                last = Last::Operand;
            }
            ';' | ',' => {
                chains.reset();
                last = Last::Other;
            }
            c if is_operator_char(c) => {
                // Prefix-only runs (`!!!`, `- -`) nest once per character.
                let mut prefix_only = matches!(c, '!' | '~' | '+' | '-');
                let mut length = 1;
                while let Some(&(_, next)) = chars.peek() {
                    if !is_operator_char(next) {
                        break;
                    }
                    prefix_only &= matches!(next, '!' | '~' | '+' | '-');
                    length += 1;
                    chars.next();
                }
                chains.link(if prefix_only { length } else { 1 });
                last = Last::Other;
            }
            c if is_word_char(c) => {
                let mut end = offset + c.len_utf8();
                while let Some(&(next_offset, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = next_offset + next.len_utf8();
                    chars.next();
                }
                let word = source.get(offset..end).unwrap_or_default();
                let nests = NESTING_WORDS.contains(&word);
                let new_statement = line_break
                    && match last {
                        Last::Operand => !nests || STATEMENT_WORDS.contains(&word),
                        Last::CloseParen => !nests,
                        Last::Other => false,
                    };
                if new_statement {
                    chains.reset();
                }
                if nests {
                    chains.link(1);
                }
                last = if nests { Last::Other } else { Last::Operand };
            }
            '\'' | '"' | '`' => last = Last::Operand,
            _ => last = Last::Other,
        }
        line_break = false;

        if chains.total > MAX_NESTING_DEPTH {
            return Err(offset);
        }
    }
    Ok(())
}
