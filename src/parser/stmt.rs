use crate::{
    ast::{
        ast::Statement,
        expressions::Identifier,
        statements::{BlockStatement, ExpressionStatement, LetStatement, ReturnStatement},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    if let Some(handler) = handler {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token().clone();

    let name_token = parser.expect_peek(TokenKind::Identifier)?;
    let name = Identifier {
        value: name_token.value.clone(),
        token: name_token,
    };

    parser.expect_peek(TokenKind::Assignment)?;
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.skip_optional_semicolon();

    Ok(Statement::Let(LetStatement { token, name, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token().clone();
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.skip_optional_semicolon();

    Ok(Statement::Return(ReturnStatement { token, value }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token().clone();

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.skip_optional_semicolon();

    Ok(Statement::Expression(ExpressionStatement { token, expression }))
}

/// Parses `{ ... }` starting at the opening brace and stopping on the
/// closing one. Statement errors inside the block are recorded and the
/// block keeps going; running out of input first is an error.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStatement, Error> {
    parser.enter_nesting()?;
    let result = parse_block_body(parser);
    parser.leave_nesting();

    result
}

fn parse_block_body(parser: &mut Parser) -> Result<BlockStatement, Error> {
    let token = parser.current_token().clone();
    parser.advance();

    let mut statements = Vec::new();
    while !parser
        .current_token()
        .is_one_of_many(&[TokenKind::CloseCurly, TokenKind::EOF])
    {
        match parse_stmt(parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                parser.record_error(error);
                parser.synchronize();
            }
        }
        parser.advance();
    }

    if parser.current_token_kind() == TokenKind::EOF {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::CloseCurly,
                found: TokenKind::EOF,
            },
            parser.get_position(),
        ));
    }

    Ok(BlockStatement { token, statements })
}
