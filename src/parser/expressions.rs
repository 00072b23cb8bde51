//! Expression parsing using Pratt precedence climbing.

use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, Parameter, UnaryOp};
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::span::Span;

use super::core::{ParseResult, Parser};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    /// Top-level entry point: a full expression, including assignment.
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_ternary()?;

        if self.match_token(&TokenKind::Equal) {
            let value = self.parse_assignment()?;
            let span = expr.span;
            let target = Self::assignment_target(expr)?;
            return Ok(Expr::new(
                ExprKind::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(expr)
    }

    /// Only variables, member accesses, and index expressions are valid
    /// assignment targets (spec.md §6).
    fn assignment_target(expr: Expr) -> ParseResult<Expr> {
        match &expr.kind {
            ExprKind::Variable(_) | ExprKind::Member { .. } | ExprKind::Index { .. } => Ok(expr),
            _ => Err(ParseError::InvalidAssignmentTarget(expr.span)),
        }
    }

    fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.parse_precedence(Precedence::Or)?;

        if self.match_token(&TokenKind::Question) {
            let span = condition.span;
            let then_branch = self.parse_assignment()?;
            self.expect(&TokenKind::Colon)?;
            let else_branch = self.parse_assignment()?;
            return Ok(Expr::new(
                ExprKind::Ternary {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                span,
            ));
        }

        Ok(condition)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = get_precedence(&self.peek().kind);
            if precedence < min_precedence || precedence == Precedence::None {
                break;
            }
            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span;

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::new(ExprKind::NumberLiteral(n), span)),
            TokenKind::StringLiteral(s) => Ok(Expr::new(ExprKind::StringLiteral(s), span)),
            TokenKind::BoolLiteral(b) => Ok(Expr::new(ExprKind::BoolLiteral(b), span)),
            TokenKind::Null => Ok(Expr::new(ExprKind::Null, span)),

            TokenKind::Identifier(name) => Ok(Expr::new(ExprKind::Variable(name), span)),
            TokenKind::Ni => Ok(Expr::new(ExprKind::This, span)),

            TokenKind::LeftParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }

            TokenKind::LeftBracket => self.parse_array(span),
            TokenKind::LeftBrace => self.parse_object(span),

            TokenKind::Minus => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator: UnaryOp::Negate,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::Bang => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator: UnaryOp::Not,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::Tilde => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator: UnaryOp::BitNot,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }

            TokenKind::DotDotDot => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(ExprKind::Spread(Box::new(operand)), span))
            }
            TokenKind::Ror => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(ExprKind::Await(Box::new(operand)), span))
            }

            TokenKind::Mai => {
                let callee = self.parse_precedence(Precedence::Call)?;
                let (callee, arguments) = match callee.kind {
                    ExprKind::Call { callee, arguments } => (*callee, arguments),
                    other => (Expr::new(other, callee.span), Vec::new()),
                };
                Ok(Expr::new(
                    ExprKind::New {
                        callee: Box::new(callee),
                        arguments,
                    },
                    span,
                ))
            }

            TokenKind::Kian => self.parse_anonymous_function(span),

            other => Err(ParseError::unexpected_token(
                "expression",
                format!("{other}"),
                span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let span = left.span;
        let token = self.advance();

        if let Some(operator) = binary_op(&token.kind) {
            // `**` is right-associative; everything else is left-associative.
            let next_min = if token.kind == TokenKind::StarStar {
                precedence
            } else {
                precedence.next()
            };
            let right = self.parse_precedence(next_min)?;
            return Ok(Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
                span,
            ));
        }

        match token.kind {
            TokenKind::AndAnd => {
                let right = self.parse_precedence(precedence.next())?;
                Ok(Expr::new(
                    ExprKind::Logical {
                        operator: LogicalOp::And,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                ))
            }
            TokenKind::OrOr => {
                let right = self.parse_precedence(precedence.next())?;
                Ok(Expr::new(
                    ExprKind::Logical {
                        operator: LogicalOp::Or,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                ))
            }
            TokenKind::Dot => {
                let name = self.expect_identifier()?;
                Ok(Expr::new(
                    ExprKind::Member {
                        object: Box::new(left),
                        name,
                    },
                    span,
                ))
            }
            TokenKind::LeftBracket => {
                let index = self.expression()?;
                self.expect(&TokenKind::RightBracket)?;
                Ok(Expr::new(
                    ExprKind::Index {
                        object: Box::new(left),
                        index: Box::new(index),
                    },
                    span,
                ))
            }
            TokenKind::LeftParen => {
                let arguments = self.parse_arguments()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::new(
                    ExprKind::Call {
                        callee: Box::new(left),
                        arguments,
                    },
                    span,
                ))
            }
            other => Err(ParseError::unexpected_token(
                "infix operator",
                format!("{other}"),
                span,
            )),
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                arguments.push(self.expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(arguments)
    }

    fn parse_array(&mut self, span: Span) -> ParseResult<Expr> {
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RightBracket) {
            loop {
                elements.push(self.expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                if self.check(&TokenKind::RightBracket) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), span))
    }

    fn parse_object(&mut self, span: Span) -> ParseResult<Expr> {
        let mut pairs = Vec::new();
        if !self.check(&TokenKind::RightBrace) {
            loop {
                let key = self.expression()?;
                self.expect(&TokenKind::Colon)?;
                let value = self.expression()?;
                pairs.push((key, value));
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                if self.check(&TokenKind::RightBrace) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(Expr::new(ExprKind::Object(pairs), span))
    }

    fn parse_anonymous_function(&mut self, span: Span) -> ParseResult<Expr> {
        self.expect(&TokenKind::LeftParen)?;
        let params = self.parse_parameters()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.block_until(&[TokenKind::Job])?;
        self.expect(&TokenKind::Job)?;
        Ok(Expr::new(ExprKind::AnonymousFunction { params, body }, span))
    }

    pub(crate) fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                let span = self.current_span();
                let name = self.expect_identifier()?;
                params.push(Parameter { name, span });
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(params)
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::StarStar => BinaryOp::Power,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::LessLess => BinaryOp::LShift,
        TokenKind::GreaterGreater => BinaryOp::RShift,
        _ => return None,
    })
}
