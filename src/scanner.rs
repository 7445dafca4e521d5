//! Lexical analyzer

use std::iter::Peekable;
use std::str::Chars;

use crate::diag::{FullParseError, ParseError, Position};
use crate::token::{self, Token, TokenKind};

/// Turn source text into a sequence of tokens terminated by `TokenKind::Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, FullParseError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];
    loop {
        let token = scanner.get_token()?;
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            break;
        }
    }
    Ok(tokens)
}

/// Turn a string into tokens, one at a time.
#[derive(Debug)]
pub struct Scanner<'a> {
    input: Peekable<Chars<'a>>,
    line: Position,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            input: input.chars().peekable(),
            line: 1,
            buf: String::new(),
        }
    }

    /// Scan next token and return it.  Keeps returning `Eof` once the input is exhausted.
    pub fn get_token(&mut self) -> Result<Token, FullParseError> {
        loop {
            let ch = match self.input.next() {
                None => return Ok(Token::eof(self.line)),
                Some(ch) => ch,
            };
            let kind = match ch {
                '\n' => {
                    self.line += 1;
                    continue;
                }
                ' ' | '\t' | '\r' => continue,
                '/' if self.input.peek() == Some(&'/') => {
                    self.skip_comment();
                    continue;
                }
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftCurly,
                '}' => TokenKind::RightCurly,
                '[' => TokenKind::LeftBracket,
                ']' => TokenKind::RightBracket,
                '=' => TokenKind::Equal,
                ';' => TokenKind::Semicolon,
                ':' => TokenKind::Colon,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '0'..='9' => return Ok(self.scan_number(ch)),
                ch if ch.is_alphabetic() => return Ok(self.scan_identifier(ch)),
                _ => {
                    return Err(FullParseError::new(
                        self.line,
                        ParseError::UnexpectedChar(ch),
                    ))
                }
            };
            return Ok(Token::new(kind, ch.to_string(), self.line));
        }
    }

    // Only integer literals: the numeric value is computed by the parser.
    fn scan_number(&mut self, first_digit: char) -> Token {
        self.buf.clear();
        self.buf.push(first_digit);
        while let Some(ch) = self.input.next_if(|ch| ch.is_ascii_digit()) {
            self.buf.push(ch);
        }
        Token::new(TokenKind::Number, self.buf.as_str(), self.line)
    }

    fn skip_comment(&mut self) {
        while self.input.next_if(|ch| *ch != '\n').is_some() {}
    }

    fn scan_identifier(&mut self, first_char: char) -> Token {
        self.buf.clear();
        self.buf.push(first_char);
        while let Some(ch) = self
            .input
            .next_if(|ch| ch.is_alphanumeric() || *ch == '_')
        {
            self.buf.push(ch);
        }

        let kind = token::keyword(&self.buf).unwrap_or(TokenKind::Identifier);
        Token::new(kind, self.buf.as_str(), self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Result<Vec<TokenKind>, FullParseError> {
        Ok(tokenize(input)?.into_iter().map(|t| t.kind).collect())
    }

    #[test]
    fn empty_input_is_just_eof() -> Result<(), FullParseError> {
        assert_eq!(tokenize("")?, vec![Token::eof(1)]);
        Ok(())
    }

    #[test]
    fn punctuation_and_operators() -> Result<(), FullParseError> {
        assert_eq!(
            kinds("( ) { } [ ] = ; : , . + - * / %")?,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftCurly,
                TokenKind::RightCurly,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Equal,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
        Ok(())
    }

    #[test]
    fn blanks_are_ignored() -> Result<(), FullParseError> {
        assert_eq!(kinds(" \t\r\n+")?, vec![TokenKind::Plus, TokenKind::Eof]);
        Ok(())
    }

    #[test]
    fn multi_digit_number() -> Result<(), FullParseError> {
        assert_eq!(
            tokenize("42")?,
            vec![Token::new(TokenKind::Number, "42", 1), Token::eof(1)]
        );
        Ok(())
    }

    #[test]
    fn number_stops_at_dot() -> Result<(), FullParseError> {
        assert_eq!(
            kinds("4.2")?,
            vec![
                TokenKind::Number,
                TokenKind::Dot,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        Ok(())
    }

    #[test]
    fn several_tokens_without_blanks() -> Result<(), FullParseError> {
        let texts = tokenize("a1+24*b_c")?
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["a1", "+", "24", "*", "b_c", ""]);
        Ok(())
    }

    #[test]
    fn keywords() -> Result<(), FullParseError> {
        assert_eq!(
            kinds("let const fn lets fnord")?,
            vec![
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::Fn,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        Ok(())
    }

    #[test]
    fn comments_are_ignored() -> Result<(), FullParseError> {
        assert_eq!(
            kinds("1 // 2 3\n4 / 5")?,
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Slash,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        Ok(())
    }

    #[test]
    fn scanner_keeps_track_of_lines() -> Result<(), FullParseError> {
        let lines = tokenize("1\n2 3\n// nothing\n4")?
            .into_iter()
            .map(|t| t.line)
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![1, 2, 2, 4, 4]);
        Ok(())
    }

    #[test]
    fn bad_char_is_reported_with_line() {
        match tokenize("let a = 1;\nlet b = \"x\";") {
            Err(FullParseError {
                pos: 2,
                error: ParseError::UnexpectedChar('"'),
            }) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn identifiers_may_use_any_letter() -> Result<(), FullParseError> {
        let texts = tokenize("café ñ2 δx_1")?
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["café", "ñ2", "δx_1", ""]);
        Ok(())
    }

    #[test]
    fn leading_underscore_is_rejected() {
        match tokenize("_foo") {
            Err(FullParseError {
                error: ParseError::UnexpectedChar('_'),
                ..
            }) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn joined_token_texts_reproduce_source() -> Result<(), FullParseError> {
        let source = "const add = fn;obj.key[0](1,2)%3";
        let joined = tokenize(source)?
            .into_iter()
            .map(|t| t.text)
            .collect::<String>();
        assert_eq!(joined, source.replace(' ', ""));
        Ok(())
    }
}
