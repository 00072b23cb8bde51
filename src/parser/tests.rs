//! Parser tests.

#[cfg(test)]
mod parser_tests {
    use crate::ast::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;

    fn parse(source: &str) -> Program {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_expr(source: &str) -> Expr {
        match parse(source).statements.into_iter().next().unwrap().kind {
            StmtKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_binary_expr() {
        let expr = parse_expr("1 + 2");
        match expr.kind {
            ExprKind::Binary { operator, .. } => assert_eq!(operator, BinaryOp::Add),
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn respects_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Add,
                right,
                ..
            } => match right.kind {
                ExprKind::Binary {
                    operator: BinaryOp::Multiply,
                    ..
                } => {}
                other => panic!("expected multiply on right, got {other:?}"),
            },
            other => panic!("expected add at top, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ** 3 ** 2 should parse as 2 ** (3 ** 2)
        let expr = parse_expr("2 ** 3 ** 2");
        match expr.kind {
            ExprKind::Binary {
                operator: BinaryOp::Power,
                right,
                ..
            } => match right.kind {
                ExprKind::Binary {
                    operator: BinaryOp::Power,
                    ..
                } => {}
                other => panic!("expected nested power on right, got {other:?}"),
            },
            other => panic!("expected power at top, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_with_arguments() {
        let expr = parse_expr("foo(1, 2)");
        match expr.kind {
            ExprKind::Call { arguments, .. } => assert_eq!(arguments.len(), 2),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parses_member_and_index() {
        let expr = parse_expr("a.b[0]");
        match expr.kind {
            ExprKind::Index { object, .. } => match object.kind {
                ExprKind::Member { name, .. } => assert_eq!(name, "b"),
                other => panic!("expected member, got {other:?}"),
            },
            other => panic!("expected index, got {other:?}"),
        }
    }

    #[test]
    fn assignment_to_variable() {
        let expr = parse_expr("x = 5");
        match expr.kind {
            ExprKind::Assign { target, .. } => {
                assert!(matches!(target.kind, ExprKind::Variable(name) if name == "x"));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn assignment_to_bad_target_is_error() {
        let tokens = crate::lexer::Scanner::new("1 + 2 = 3")
            .scan_tokens()
            .unwrap();
        assert!(Parser::new(tokens).parse().is_err());
    }

    #[test]
    fn parses_var_decl() {
        let program = parse("ao x = 10");
        match &program.statements[0].kind {
            StmtKind::VarDecl { name, initializer } => {
                assert_eq!(name, "x");
                assert!(initializer.is_some());
            }
            other => panic!("expected var decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_print_with_multiple_args() {
        let program = parse("da 1, 2, 3");
        match &program.statements[0].kind {
            StmtKind::Print(values) => assert_eq!(values.len(), 3),
            other => panic!("expected print, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_else() {
        let program = parse(
            r#"
            tha x
              da 1
            mai_nan
              da 2
            job
        "#,
        );
        match &program.statements[0].kind {
            StmtKind::If { else_branch, .. } => assert!(else_branch.is_some()),
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn parses_else_if_chain() {
        let program = parse(
            r#"
            tha x
              da 1
            mai_nan tha y
              da 2
            mai_nan
              da 3
            job
        "#,
        );
        match &program.statements[0].kind {
            StmtKind::If { else_branch, .. } => {
                let nested = else_branch.as_ref().unwrap();
                assert!(matches!(nested.kind, StmtKind::If { .. }));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn parses_while_loop() {
        let program = parse("wonn i < 3\n  da i\n  i = i + 1\njob");
        assert!(matches!(program.statements[0].kind, StmtKind::While { .. }));
    }

    #[test]
    fn parses_counter_for_with_step() {
        let program = parse("samrab i = 0 tung 10 kao 2\n  da i\njob");
        match &program.statements[0].kind {
            StmtKind::CounterFor { step, .. } => assert!(step.is_some()),
            other => panic!("expected counter-for, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_declaration() {
        let program = parse("kian add(a, b)\n  kuun a + b\njob");
        match &program.statements[0].kind {
            StmtKind::Function(decl) => {
                assert_eq!(decl.name, "add");
                assert_eq!(decl.params.len(), 2);
            }
            other => panic!("expected function decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_anonymous_function_expression() {
        let expr = parse_expr("kian(x)\n  kuun x\njob");
        assert!(matches!(expr.kind, ExprKind::AnonymousFunction { .. }));
    }

    #[test]
    fn parses_class_with_methods() {
        let program = parse(
            r#"
            klum Box
              kian sang(v)
                ni.v = v
              job
              kian get()
                kuun ni.v
              job
            job
        "#,
        );
        match &program.statements[0].kind {
            StmtKind::Class(decl) => {
                assert_eq!(decl.name, "Box");
                assert_eq!(decl.methods.len(), 2);
                assert_eq!(decl.methods[0].name, "sang");
            }
            other => panic!("expected class decl, got {other:?}"),
        }
    }

    #[test]
    fn parses_new_expression() {
        let expr = parse_expr("mai Box(7)");
        match expr.kind {
            ExprKind::New { arguments, .. } => assert_eq!(arguments.len(), 1),
            other => panic!("expected new expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_switch_without_fallthrough_ast() {
        let program = parse(
            r#"
            cheek x
              karani 1: da "one"
              karani 2: da "two"
              baeb_chai: da "other"
            job
        "#,
        );
        match &program.statements[0].kind {
            StmtKind::Switch { cases, default, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(default.is_some());
            }
            other => panic!("expected switch, got {other:?}"),
        }
    }

    #[test]
    fn parses_break_and_continue() {
        let program = parse("wonn jing\n  yud\n  tor_pai\njob");
        match &program.statements[0].kind {
            StmtKind::While { body, .. } => match &body.kind {
                StmtKind::Block(stmts) => {
                    assert!(matches!(stmts[0].kind, StmtKind::Break));
                    assert!(matches!(stmts[1].kind, StmtKind::Continue));
                }
                other => panic!("expected block, got {other:?}"),
            },
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn parses_array_and_object_literals() {
        let expr = parse_expr(r#"[1, 2, 3]"#);
        match expr.kind {
            ExprKind::Array(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected array, got {other:?}"),
        }

        let expr = parse_expr(r#"{"a": 1, "b": 2}"#);
        match expr.kind {
            ExprKind::Object(pairs) => assert_eq!(pairs.len(), 2),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn parses_ternary_expression() {
        let expr = parse_expr("x > 0 ? 1 : 2");
        assert!(matches!(expr.kind, ExprKind::Ternary { .. }));
    }

    #[test]
    fn parses_bitwise_and_shift_operators() {
        let expr = parse_expr("(a & b) | (c ^ d)");
        assert!(matches!(
            expr.kind,
            ExprKind::Binary {
                operator: BinaryOp::BitOr,
                ..
            }
        ));
        let expr = parse_expr("a << 2 >> 1");
        assert!(matches!(
            expr.kind,
            ExprKind::Binary {
                operator: BinaryOp::RShift,
                ..
            }
        ));
    }
}
