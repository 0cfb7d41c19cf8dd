//! Syntax support for the line-oriented grammar format.
//!
//! ```text
//! S -> aSb | ab
//! [SS1] -> [SS1] S | ε
//! ```
//!
//! Each line holds one rule `<nonterminal> -> <alt> (| <alt>)*`. A nonterminal
//! is `[` + `A-Z0-9`+ `]` or an uppercase letter followed by `0-9A-Z`, a
//! terminal is a single `a`-`z` character. An alternative that is empty or
//! consists of `ε` alone is the empty production. Blank lines and lines
//! starting with `#` are skipped.

pub mod lexer;

use self::lexer::Token;
use std::fmt;

/// A rule as written on one line of the grammar text.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDesc<'source> {
    pub line: usize,
    pub left: &'source str,
    /// The alternatives in order. The empty production is an empty list.
    pub alternatives: Vec<Vec<&'source str>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineErrorKind {
    #[error("missing `->'")]
    MissingArrow,

    #[error("too many `->'")]
    MultipleArrows,

    #[error("the left-hand side `{}' is not a single nonterminal", _0)]
    InvalidLeft(String),

    #[error("unexpected character `{}' at column {}", ch, column)]
    UnexpectedChar { ch: char, column: usize },

    #[error("`ε' must be the only symbol of its alternative")]
    MisplacedEpsilon,
}

/// The list of malformed lines found in a grammar text.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub errors: Vec<LineError>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Parse the grammar text into rule descriptions.
///
/// Every malformed line is reported and no rule is returned if any is found.
pub fn parse(source: &str) -> Result<Vec<RuleDesc<'_>>, SyntaxError> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();

    let mut rules = vec![];
    let mut errors = vec![];
    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok((left, alternatives)) => {
                tracing::trace!("rule: {} -> {:?}", left, alternatives);
                rules.push(RuleDesc {
                    line: i + 1,
                    left,
                    alternatives,
                });
            }
            Err(kind) => {
                tracing::debug!("line {}: {}", i + 1, kind);
                errors.push(LineError { line: i + 1, kind });
            }
        }
    }

    if !errors.is_empty() {
        return Err(SyntaxError { errors });
    }
    Ok(rules)
}

#[allow(clippy::type_complexity)]
fn parse_line(line: &str) -> Result<(&str, Vec<Vec<&str>>), LineErrorKind> {
    let mut parts = line.split("->");
    let (left, right) = match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => (left, right),
        (_, None, _) => return Err(LineErrorKind::MissingArrow),
        _ => return Err(LineErrorKind::MultipleArrows),
    };

    let invalid_left = || LineErrorKind::InvalidLeft(left.trim().to_owned());
    let mut left_tokens = lexer::tokens(left);
    let left = match (left_tokens.next(), left_tokens.next()) {
        (Some(Ok(Token::Nonterminal(name))), None) => name,
        _ => return Err(invalid_left()),
    };

    // byte offset of the right-hand side within the line.
    let offset = line.len() - right.len();

    let mut alternatives = vec![];
    let mut current = vec![];
    let mut epsilon = false;
    for token in lexer::tokens(right) {
        match token {
            Ok(Token::Nonterminal(symbol) | Token::Terminal(symbol)) => current.push(symbol),
            Ok(Token::Epsilon) => epsilon = true,
            Ok(Token::VertBar) => {
                alternatives.push(end_alternative(&mut current, &mut epsilon)?);
            }
            Ok(Token::Arrow) => return Err(LineErrorKind::MultipleArrows),
            Err(start) => {
                let ch = right[start..].chars().next().unwrap_or_default();
                return Err(LineErrorKind::UnexpectedChar {
                    ch,
                    column: offset + start + 1,
                });
            }
        }
    }
    alternatives.push(end_alternative(&mut current, &mut epsilon)?);

    Ok((left, alternatives))
}

fn end_alternative<'source>(
    current: &mut Vec<&'source str>,
    epsilon: &mut bool,
) -> Result<Vec<&'source str>, LineErrorKind> {
    if std::mem::take(epsilon) && !current.is_empty() {
        return Err(LineErrorKind::MisplacedEpsilon);
    }
    Ok(std::mem::take(current))
}
