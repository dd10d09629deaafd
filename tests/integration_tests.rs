//! Integration tests for the parsing front end.
//!
//! These tests drive the public `parse` entry point from source text to a
//! rendered Program, covering statements, operator precedence, rendering
//! stability and error accumulation.

use nibbl::{
    ast::ast::{Expression, Statement},
    errors::errors::ErrorImpl,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parse, render_error,
};

fn parse_ok(source: &str) -> nibbl::ast::ast::Program {
    let (program, errors) = parse(source, Some("test.nb".to_string()));
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
    program
}

fn rendered(source: &str) -> String {
    parse_ok(source).to_string()
}

#[test]
fn test_let_statements_end_to_end() {
    let cases = [
        ("let x = 5;", "x", "5"),
        ("let y = true;", "y", "true"),
        ("let foobar = y;", "foobar", "y"),
        ("let total = a + b * c;", "total", "(a + (b * c))"),
        ("let neg = -a * b;", "neg", "((-a) * b)"),
    ];

    for (source, name, value) in cases {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1, "source: {}", source);

        match &program.statements[0] {
            Statement::Let(stmt) => {
                assert_eq!(stmt.name.value, name);
                assert_eq!(stmt.value.to_string(), value);
            }
            other => panic!("expected let statement, got {:?}", other),
        }
    }
}

#[test]
fn test_return_statements_end_to_end() {
    let cases = [
        ("return 5;", "5"),
        ("return x;", "x"),
        ("return add(1, 2 * 3);", "add(1, (2 * 3))"),
    ];

    for (source, value) in cases {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1, "source: {}", source);

        match &program.statements[0] {
            Statement::Return(stmt) => assert_eq!(stmt.value.to_string(), value),
            other => panic!("expected return statement, got {:?}", other),
        }
    }
}

#[test]
fn test_operator_precedence_end_to_end() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
    ];

    for (source, expected) in cases {
        assert_eq!(rendered(source), expected, "source: {}", source);
    }
}

#[test]
fn test_rendering_is_stable_under_reparse() {
    let sources = [
        "let x = 1 + 2 * 3;",
        "return -a * (b + c);",
        "5 > 4 == 3 < 4",
        "if (x < y) { x } else { y }",
        "let add = fn(a, b) { a + b; };",
        "fn(x) { let y = x * 2; return y; }(3)",
        "let apply = fn(f, x) { f(x) };",
    ];

    for source in sources {
        let once = rendered(source);
        let twice = rendered(&once);
        assert_eq!(once, twice, "source: {}", source);
    }
}

#[test]
fn test_full_program() {
    let source = "\
let add = fn(x, y) {
    x + y;
};
let result = add(5, 10);
if (result > 10) { return true; } else { return false; }
";
    let program = parse_ok(source);

    assert_eq!(program.statements.len(), 3);
    assert_eq!(
        program.to_string(),
        "let add = fn(x, y) { (x + y); };\
         let result = add(5, 10);\
         if ((result > 10)) { return true; } else { return false; }"
    );

    match &program.statements[2] {
        Statement::Expression(stmt) => match &stmt.expression {
            Expression::If(if_expr) => {
                assert_eq!(if_expr.consequence.statements.len(), 1);
                assert!(if_expr.alternative.is_some());
            }
            other => panic!("expected if expression, got {:?}", other),
        },
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_missing_assignment_reports_error_and_returns_program() {
    let source = "let x 5;";
    let (program, errors) = parse(source, Some("main.nb".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "expected next token to be =, got INT instead"
    );
    assert_eq!(
        errors[0].get_kind(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::Assignment,
            found: TokenKind::Int,
        }
    );
    assert!(program
        .statements
        .iter()
        .all(|stmt| !matches!(stmt, Statement::Let(_))));

    let report = render_error(&errors[0], source, "main.nb");
    assert!(report.starts_with("Error: expected next token to be =, got INT instead"));
    assert!(report.contains("-> main.nb"));
    assert!(report.contains("1 | let x 5;"));
}

#[test]
fn test_errors_accumulate_across_statements() {
    let (program, errors) = parse("let x 5;\nlet y = 1;\nlet 838383;", None);

    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|error| matches!(error.get_kind(), ErrorImpl::UnexpectedToken { .. })));
    assert!(errors[0].get_position().0 < errors[1].get_position().0);

    let lets: Vec<_> = program
        .statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::Let(stmt) => Some(stmt.name.value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(lets, vec!["y"]);
}

#[test]
fn test_end_of_input_only() {
    let (program, errors) = parse("", None);

    assert!(program.is_empty());
    assert!(errors.is_empty());
    assert_eq!(program.to_string(), "");

    let (program, errors) = parse("  \n\t ", None);
    assert!(program.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_tokenize_public_api() {
    let kinds: Vec<TokenKind> = tokenize("let five = 5;".to_string(), None)
        .into_iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}
