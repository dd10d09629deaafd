//! Unit tests for AST rendering.

use crate::{
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    ast::{Expression, Node, Program, Statement},
    expressions::{CallExpression, Identifier, InfixExpression, IntegerLiteral, PrefixExpression},
    statements::{BlockStatement, ExpressionStatement, LetStatement, ReturnStatement},
};

fn token(kind: TokenKind, value: &str) -> Token {
    Token {
        kind,
        value: value.to_string(),
        span: Span {
            start: Position::null(),
            end: Position::null(),
        },
    }
}

fn ident(name: &str) -> Identifier {
    Identifier {
        token: token(TokenKind::Identifier, name),
        value: name.to_string(),
    }
}

fn int(value: i64) -> Expression {
    Expression::Integer(IntegerLiteral {
        token: token(TokenKind::Int, &value.to_string()),
        value,
    })
}

#[test]
fn test_let_statement_string() {
    let program = Program {
        statements: vec![Statement::Let(LetStatement {
            token: token(TokenKind::Let, "let"),
            name: ident("myVar"),
            value: Expression::Identifier(ident("anotherVar")),
        })],
    };

    assert_eq!(program.to_string(), "let myVar = anotherVar;");
    assert_eq!(program.token_literal(), "let");
}

#[test]
fn test_operator_rendering_is_fully_parenthesized() {
    // -a * b
    let expr = Expression::Infix(InfixExpression {
        token: token(TokenKind::Star, "*"),
        left: Box::new(Expression::Prefix(PrefixExpression {
            token: token(TokenKind::Dash, "-"),
            operator: "-".to_string(),
            right: Box::new(Expression::Identifier(ident("a"))),
        })),
        operator: "*".to_string(),
        right: Box::new(Expression::Identifier(ident("b"))),
    });

    assert_eq!(expr.to_string(), "((-a) * b)");
    assert_eq!(expr.token_literal(), "*");
}

#[test]
fn test_program_concatenates_statements() {
    let program = Program {
        statements: vec![
            Statement::Return(ReturnStatement {
                token: token(TokenKind::Return, "return"),
                value: int(5),
            }),
            Statement::Expression(ExpressionStatement {
                token: token(TokenKind::Identifier, "x"),
                expression: Expression::Identifier(ident("x")),
            }),
        ],
    };

    assert_eq!(program.to_string(), "return 5;x");
    assert_eq!(program.len(), 2);
}

#[test]
fn test_block_terminates_expression_statements() {
    let block = BlockStatement {
        token: token(TokenKind::OpenCurly, "{"),
        statements: vec![
            Statement::Expression(ExpressionStatement {
                token: token(TokenKind::Identifier, "x"),
                expression: Expression::Identifier(ident("x")),
            }),
            Statement::Let(LetStatement {
                token: token(TokenKind::Let, "let"),
                name: ident("y"),
                value: int(1),
            }),
        ],
    };

    assert_eq!(block.to_string(), "{ x; let y = 1; }");

    let empty = BlockStatement {
        token: token(TokenKind::OpenCurly, "{"),
        statements: vec![],
    };
    assert_eq!(empty.to_string(), "{ }");
}

#[test]
fn test_call_rendering() {
    let call = Expression::Call(CallExpression {
        token: token(TokenKind::OpenParen, "("),
        function: Box::new(Expression::Identifier(ident("add"))),
        arguments: vec![int(1), Expression::Identifier(ident("b"))],
    });

    assert_eq!(call.to_string(), "add(1, b)");
    assert_eq!(call.token_literal(), "(");
}

#[test]
fn test_empty_program() {
    let program = Program::default();

    assert!(program.is_empty());
    assert_eq!(program.to_string(), "");
    assert_eq!(program.token_literal(), "");
}
