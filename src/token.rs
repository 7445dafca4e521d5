use std::fmt;

use serde::Serialize;

use crate::diag::Position;

/// Token categories produced by the scanner.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum TokenKind {
    Eof,

    // Punctuation
    LeftParen,
    RightParen,
    LeftCurly,
    RightCurly,
    LeftBracket,
    RightBracket,
    Equal,
    Semicolon,
    Colon,
    Comma,
    Dot,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Keywords
    Let,
    Const,
    Fn,

    Identifier,
    Number,
}

/// "Words" produced by the scanner, with the text they were scanned from.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: Position) -> Token {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: Position) -> Token {
        Token::new(TokenKind::Eof, "", line)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "{}", self.text),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "EOF",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftCurly => "{",
            TokenKind::RightCurly => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Equal => "=",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Fn => "fn",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
        };
        write!(f, "{}", s)
    }
}

const KEYWORDS: [(&str, TokenKind); 3] = [
    ("let", TokenKind::Let),
    ("const", TokenKind::Const),
    ("fn", TokenKind::Fn),
];

/// Return the keyword token kind spelled by `word`, if any.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, kind)| *kind)
}
