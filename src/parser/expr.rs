use crate::{
    ast::{
        ast::Expression,
        expressions::{
            BooleanLiteral, CallExpression, FunctionLiteral, Identifier, IfExpression,
            InfixExpression, IntegerLiteral, PrefixExpression,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_stmt};

/// Pratt loop. Parses the expression starting at the current token, folding
/// in infix operators for as long as they bind tighter than `bp`.
///
/// On return the current token is the last token of the expression.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Error> {
    parser.enter_nesting()?;
    let result = parse_expr_inner(parser, bp);
    parser.leave_nesting();

    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(no_prefix_error(parser)),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the floor, fold it into lhs
    while parser.peek_token_kind() != TokenKind::Semicolon && parser.peek_binding_power() > bp {
        let led = match parser.get_led_lookup().get(&parser.peek_token_kind()) {
            Some(led) => *led,
            None => return Ok(left),
        };

        parser.advance();
        let operator_bp = parser.current_binding_power();
        left = led(parser, left, operator_bp)?;
    }

    Ok(left)
}

fn no_prefix_error(parser: &Parser) -> Error {
    let token = parser.current_token();
    let error = match token.kind {
        TokenKind::Illegal => ErrorImpl::IllegalCharacter {
            token: token.value.clone(),
        },
        kind => ErrorImpl::NoPrefixParseFn { kind },
    };

    Error::new(error, parser.get_position())
}

pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();

    Ok(Expression::Identifier(Identifier {
        value: token.value.clone(),
        token,
    }))
}

pub fn parse_integer_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();
    let value = token.value.parse::<i64>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            parser.get_position(),
        )
    })?;

    Ok(Expression::Integer(IntegerLiteral { token, value }))
}

pub fn parse_boolean_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();

    Ok(Expression::Boolean(BooleanLiteral {
        value: token.kind == TokenKind::True,
        token,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let operator_token = parser.current_token().clone();
    parser.advance();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expression::Prefix(PrefixExpression {
        operator: operator_token.value.clone(),
        token: operator_token,
        right: Box::new(rhs),
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
) -> Result<Expression, Error> {
    let operator_token = parser.current_token().clone();
    parser.advance();
    let right = parse_expr(parser, bp)?;

    Ok(Expression::Infix(InfixExpression {
        operator: operator_token.value.clone(),
        token: operator_token,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect_peek(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expression, Error> {
    // if (x < y) { x } else { y }
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;
    parser.advance();
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_peek(TokenKind::CloseParen)?;

    parser.expect_peek(TokenKind::OpenCurly)?;
    let consequence = parse_block_stmt(parser)?;

    let alternative = if parser.peek_token_kind() == TokenKind::Else {
        parser.advance();
        parser.expect_peek(TokenKind::OpenCurly)?;
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Ok(Expression::If(IfExpression {
        token,
        condition: Box::new(condition),
        consequence,
        alternative,
    }))
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;
    let parameters = parse_function_params(parser)?;

    parser.expect_peek(TokenKind::OpenCurly)?;
    let body = parse_block_stmt(parser)?;

    Ok(Expression::Function(FunctionLiteral {
        token,
        parameters,
        body,
    }))
}

fn parse_function_params(parser: &mut Parser) -> Result<Vec<Identifier>, Error> {
    let mut params = vec![];

    if parser.peek_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(params);
    }

    loop {
        let token = parser.expect_peek(TokenKind::Identifier)?;
        params.push(Identifier {
            value: token.value.clone(),
            token,
        });

        if parser.peek_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect_peek(TokenKind::CloseParen)?;

    Ok(params)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expression,
    _bp: BindingPower,
) -> Result<Expression, Error> {
    let token = parser.current_token().clone();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expression::Call(CallExpression {
        token,
        function: Box::new(left),
        arguments,
    }))
}

/// Comma-separated expressions up to `end`. Expects the current token to
/// be the opening delimiter and leaves `end` as the current token.
fn parse_expr_list(parser: &mut Parser, end: TokenKind) -> Result<Vec<Expression>, Error> {
    let mut args = vec![];

    if parser.peek_token_kind() == end {
        parser.advance();
        return Ok(args);
    }

    parser.advance();
    args.push(parse_expr(parser, BindingPower::Default)?);

    while parser.peek_token_kind() == TokenKind::Comma {
        parser.advance();
        parser.advance();
        args.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect_peek(end)?;

    Ok(args)
}
