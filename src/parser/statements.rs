//! Statement parsing: declarations, control flow, blocks.
//!
//! This language has no braces for block bodies; every block is opened by
//! its introducing keyword and closed by a trailing `job`.

use crate::ast::{ClassDecl, FunctionDecl, Stmt, StmtKind};
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        match &self.peek().kind {
            TokenKind::Ao => self.var_decl_statement(),
            TokenKind::Da => self.print_statement(),
            TokenKind::Klum => self.class_declaration(),
            TokenKind::Rueang => self.async_function_declaration(),
            TokenKind::Kian if matches!(self.peek_nth(1).kind, TokenKind::Identifier(_)) => {
                Ok(Stmt::new(
                    StmtKind::Function(self.function_declaration()?),
                    self.current_span(),
                ))
            }
            TokenKind::Wonn => self.while_statement(),
            TokenKind::Tha => self.if_statement(),
            TokenKind::Samrab => self.counter_for_statement(),
            TokenKind::Cheek => self.switch_statement(),
            TokenKind::Kuun => self.return_statement(),
            TokenKind::Yud => {
                let span = self.advance().span;
                Ok(Stmt::new(StmtKind::Break, span))
            }
            TokenKind::TorPai => {
                let span = self.advance().span;
                Ok(Stmt::new(StmtKind::Continue, span))
            }
            _ => self.expression_statement(),
        }
    }

    /// Parse statements until the next token matches one of `closers`,
    /// without consuming the closing token.
    pub(crate) fn block_until(&mut self, closers: &[TokenKind]) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.check_any(closers) {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn var_decl_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Ao)?;
        let name = self.expect_identifier()?;
        let initializer = if self.match_token(&TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Stmt::new(StmtKind::VarDecl { name, initializer }, span))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Da)?;
        let mut values = vec![self.expression()?];
        while self.match_token(&TokenKind::Comma) {
            values.push(self.expression()?);
        }
        Ok(Stmt::new(StmtKind::Print(values), span))
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Tha)?;
        let condition = self.expression()?;

        let then_branch = Box::new(Stmt::new(
            StmtKind::Block(self.block_until(&[TokenKind::MaiNan, TokenKind::Job])?),
            span,
        ));

        let else_branch = if self.match_token(&TokenKind::MaiNan) {
            if self.check(&TokenKind::Tha) {
                // else-if: the nested `tha` chain closes its own `job`,
                // which also terminates this whole if-chain.
                Some(Box::new(self.if_statement()?))
            } else {
                let body = self.block_until(&[TokenKind::Job])?;
                self.expect(&TokenKind::Job)?;
                Some(Box::new(Stmt::new(StmtKind::Block(body), span)))
            }
        } else {
            self.expect(&TokenKind::Job)?;
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Wonn)?;
        let condition = self.expression()?;
        let body = Box::new(Stmt::new(
            StmtKind::Block(self.block_until(&[TokenKind::Job])?),
            span,
        ));
        self.expect(&TokenKind::Job)?;
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn counter_for_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Samrab)?;
        let variable = self.expect_identifier()?;
        self.expect(&TokenKind::Equal)?;
        let start = self.expression()?;
        self.expect(&TokenKind::Tung)?;
        let end = self.expression()?;
        let step = if self.match_token(&TokenKind::Kao) {
            Some(self.expression()?)
        } else {
            None
        };
        let body = Box::new(Stmt::new(
            StmtKind::Block(self.block_until(&[TokenKind::Job])?),
            span,
        ));
        self.expect(&TokenKind::Job)?;
        Ok(Stmt::new(
            StmtKind::CounterFor {
                variable,
                start,
                end,
                step,
                body,
            },
            span,
        ))
    }

    fn switch_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Cheek)?;
        let discriminant = self.expression()?;

        let mut cases = Vec::new();
        let mut default = None;

        loop {
            if self.match_token(&TokenKind::Karani) {
                let value = self.expression()?;
                self.expect(&TokenKind::Colon)?;
                let body = self.block_until(&[TokenKind::Karani, TokenKind::BaebChai, TokenKind::Job])?;
                cases.push((value, body));
            } else if self.match_token(&TokenKind::BaebChai) {
                self.expect(&TokenKind::Colon)?;
                default = Some(self.block_until(&[TokenKind::Job])?);
            } else {
                break;
            }
        }
        self.expect(&TokenKind::Job)?;

        Ok(Stmt::new(
            StmtKind::Switch {
                discriminant,
                cases,
                default,
            },
            span,
        ))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Kuun)?;
        let value = if self.check_any(&[
            TokenKind::Job,
            TokenKind::Karani,
            TokenKind::BaebChai,
            TokenKind::Eof,
        ]) {
            None
        } else {
            Some(self.expression()?)
        };
        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    fn async_function_declaration(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Rueang)?;
        let mut decl = self.function_declaration()?;
        decl.is_async = true;
        Ok(Stmt::new(StmtKind::Function(decl), span))
    }

    pub(crate) fn function_declaration(&mut self) -> ParseResult<FunctionDecl> {
        let span = self.current_span();
        self.expect(&TokenKind::Kian)?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LeftParen)?;
        let params = self.parse_parameters()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.block_until(&[TokenKind::Job])?;
        self.expect(&TokenKind::Job)?;
        Ok(FunctionDecl {
            name,
            params,
            body,
            is_async: false,
            span,
        })
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.expect(&TokenKind::Klum)?;
        let name = self.expect_identifier()?;

        let mut methods = Vec::new();
        while !self.is_at_end() && !self.check(&TokenKind::Job) {
            if self.match_token(&TokenKind::Rueang) {
                let mut method = self.function_declaration()?;
                method.is_async = true;
                methods.push(method);
            } else {
                methods.push(self.function_declaration()?);
            }
        }
        self.expect(&TokenKind::Job)?;

        Ok(Stmt::new(
            StmtKind::Class(ClassDecl { name, methods, span }),
            span,
        ))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        let expr = self.expression()?;
        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }
}
