//! Lexer implementation.

use logos::Logos;

#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'source> {
    #[token("->")]
    Arrow,

    #[token("|")]
    VertBar,

    #[token("ε")]
    Epsilon,

    #[regex(r"\[[A-Z0-9]+\]|[A-Z][0-9A-Z]*")]
    Nonterminal(&'source str),

    #[regex(r"[a-z]")]
    Terminal(&'source str),
}

/// Tokenize `input`, reporting the byte offset of an unexpected character.
pub fn tokens(input: &str) -> impl Iterator<Item = Result<Token<'_>, usize>> {
    Token::lexer(input)
        .spanned()
        .map(|(res, span)| res.map_err(|()| span.start))
}
