use std::rc::Rc;

use tracing::debug;

use crate::ast::{BinaryOp, Expr, Program, Property, Stmt};
use crate::diag::{FullParseError, ParseError};
use crate::scanner;
use crate::token::{Token, TokenKind};

/// Scan and parse `source` into a program.
pub fn parse_program(source: &str) -> Result<Program, FullParseError> {
    let tokens = scanner::tokenize(source)?;
    debug!(tokens = tokens.len(), "scanned source");
    Parser::new(tokens).parse_program()
}

/// Recursive descent parser.  Bails out on the first error.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a parser over `tokens`, which must end with an `Eof` token.
    pub fn new(mut tokens: Vec<Token>) -> Parser {
        if !tokens.last().map_or(false, |t| t.is(TokenKind::Eof)) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        Parser { tokens, current: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Program, FullParseError> {
        let mut body = vec![];
        while !self.check(TokenKind::Eof) {
            body.push(self.statement()?);
        }
        debug!(statements = body.len(), "parsed program");
        Ok(Program { body })
    }

    #[allow(dead_code)]
    fn parse_expression(&mut self) -> Result<Expr, FullParseError> {
        let expr = self.expression()?;
        self.consume(TokenKind::Eof)?;
        Ok(expr)
    }

    fn statement(&mut self) -> Result<Stmt, FullParseError> {
        match self.peek().kind {
            TokenKind::Let | TokenKind::Const => self.var_decl(),
            TokenKind::Fn => self.fun_decl(),
            _ => {
                let expr = self.expression()?;
                if self.check(TokenKind::Semicolon) {
                    self.advance();
                }
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Parse variable declaration.
    /// Current token is `let` or `const`.
    fn var_decl(&mut self) -> Result<Stmt, FullParseError> {
        let is_const = self.advance().is(TokenKind::Const);
        let name = self.identifier()?;
        if self.check(TokenKind::Semicolon) {
            let pos = self.advance().line;
            if is_const {
                return Err(FullParseError::new(
                    pos,
                    ParseError::MissingConstInitializer(name),
                ));
            }
            return Ok(Stmt::VarDecl {
                name,
                init: None,
                is_const,
            });
        }
        self.consume(TokenKind::Equal)?;
        let init = self.expression()?;
        self.consume(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl {
            name,
            init: Some(init),
            is_const,
        })
    }

    /// Parse function declaration.
    /// Current token is `fn`.
    fn fun_decl(&mut self) -> Result<Stmt, FullParseError> {
        self.advance();
        let name = self.identifier()?;
        let pos = self.peek().line;
        let params = self
            .arguments()?
            .into_iter()
            .map(|arg| match arg {
                Expr::Identifier(param) => Ok(param),
                _ => Err(FullParseError::new(pos, ParseError::ExpectedParameterName)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.consume(TokenKind::LeftCurly)?;
        let mut body = vec![];
        while !self.check(TokenKind::RightCurly) && !self.check(TokenKind::Eof) {
            body.push(self.statement()?);
        }
        self.consume(TokenKind::RightCurly)?;

        Ok(Stmt::FunDecl {
            name,
            params,
            body: Rc::from(body),
        })
    }

    fn identifier(&mut self) -> Result<String, FullParseError> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance().text)
        } else {
            let token = self.peek();
            Err(FullParseError::new(
                token.line,
                ParseError::ExpectedIdentifier(token.to_string()),
            ))
        }
    }

    fn expression(&mut self) -> Result<Expr, FullParseError> {
        self.assignment()
    }

    // Right associative: `a = b = 1` assigns 1 to b then to a.  Whether the target
    // can be assigned to is checked by the evaluator.
    fn assignment(&mut self) -> Result<Expr, FullParseError> {
        let target = self.object()?;
        if self.check(TokenKind::Equal) {
            self.advance();
            let value = self.assignment()?;
            Ok(Expr::Assign {
                target: Box::new(target),
                value: Box::new(value),
            })
        } else {
            Ok(target)
        }
    }

    fn object(&mut self) -> Result<Expr, FullParseError> {
        if !self.check(TokenKind::LeftCurly) {
            return self.additive();
        }
        self.advance();

        let mut properties = vec![];
        if !self.check(TokenKind::RightCurly) {
            loop {
                let key = self.property_name()?;
                let value = if self.check(TokenKind::Colon) {
                    self.advance();
                    Some(self.expression()?)
                } else {
                    None
                };
                properties.push(Property { key, value });

                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenKind::RightCurly)?;
        self.call_member_tail(Expr::Object(properties))
    }

    fn property_name(&mut self) -> Result<String, FullParseError> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance().text)
        } else {
            let token = self.peek();
            Err(FullParseError::new(
                token.line,
                ParseError::ExpectedPropertyName(token.to_string()),
            ))
        }
    }

    fn additive(&mut self) -> Result<Expr, FullParseError> {
        let mut expr = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            expr = Expr::Binary {
                lhs: Box::new(expr),
                op,
                rhs: Box::new(self.multiplicative()?),
            };
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr, FullParseError> {
        let mut expr = self.call_member()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            expr = Expr::Binary {
                lhs: Box::new(expr),
                op,
                rhs: Box::new(self.call_member()?),
            };
        }
        Ok(expr)
    }

    fn call_member(&mut self) -> Result<Expr, FullParseError> {
        let expr = self.primary()?;
        self.call_member_tail(expr)
    }

    /// Apply any `.name`, `[key]` and `(args)` suffixes following `expr`.
    fn call_member_tail(&mut self, mut expr: Expr) -> Result<Expr, FullParseError> {
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let (pos, found) = (self.peek().line, self.peek().to_string());
                    let property = self.primary()?;
                    if !matches!(property, Expr::Identifier(_)) {
                        return Err(FullParseError::new(
                            pos,
                            ParseError::ExpectedIdentifier(found),
                        ));
                    }
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                    };
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let property = self.expression()?;
                    self.consume(TokenKind::RightBracket)?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                    };
                }
                TokenKind::LeftParen => {
                    let args = self.arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parse a parenthesized, comma separated argument list.
    /// Current token is `(`.
    fn arguments(&mut self) -> Result<Vec<Expr>, FullParseError> {
        self.consume(TokenKind::LeftParen)?;
        let mut args = vec![];
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.assignment()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenKind::RightParen)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, FullParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Identifier(token.text))
            }
            TokenKind::Number => {
                self.advance();
                let n = token.text.parse::<f64>().map_err(|_| {
                    FullParseError::new(token.line, ParseError::BadNumberLiteral(token.text.clone()))
                })?;
                Ok(Expr::Number(n))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => Err(FullParseError::new(
                token.line,
                ParseError::ExpectedPrimary(token.to_string()),
            )),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    /// Return current token and move to the next one.  Never moves past `Eof`.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, expected: TokenKind) -> Result<Token, FullParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(FullParseError::new(
                token.line,
                ParseError::UnexpectedToken {
                    found: token.to_string(),
                    expected: expected.to_string(),
                },
            ))
        }
    }
}
