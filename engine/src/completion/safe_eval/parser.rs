// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Parser for the restricted expression subset that may be evaluated while the user is
//! still typing: literals, name lookup, attribute access, subscripts, and numeric
//! add / subtract folding. Call syntax is deliberately absent from the grammar, which is
//! what makes the evaluator safe by construction: an expression that cannot be parsed
//! cannot be run.

use nom::{IResult, Parser,
          branch::alt,
          bytes::complete::{take_till, take_while, take_while1},
          character::complete::{char, digit1, multispace0},
          combinator::{map, map_res, opt, recognize},
          error::ParseError,
          multi::separated_list0,
          sequence::{delimited, pair, preceded}};

use crate::EvalError;

/// Closed AST for the safe expression subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    NoneLit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Name(String),
    Attribute {
        target: Box<Expr>,
        attr: String,
    },
    Subscript {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

/// Parse `text` as a single safe expression. Trailing input (including call syntax,
/// which the grammar does not know) is a parse error.
///
/// # Errors
///
/// Returns [`EvalError::Parse`] when `text` is not entirely one expression from the
/// restricted grammar.
pub fn parse_expr(text: &str) -> Result<Expr, EvalError> {
    match p_expr(text) {
        Ok((rest, expr)) if rest.trim().is_empty() => Ok(expr),
        _ => Err(EvalError::Parse(text.to_string())),
    }
}

/// Skip leading whitespace before running `parser`.
fn lex<'a, O, E, P>(parser: P) -> impl Parser<&'a str, Output = O, Error = E>
where
    E: ParseError<&'a str>,
    P: Parser<&'a str, Output = O, Error = E>,
{
    preceded(multispace0, parser)
}

fn p_expr(input: &str) -> IResult<&str, Expr> {
    let (mut rest, mut acc) = p_postfix(input)?;
    loop {
        match lex(alt((char::<_, nom::error::Error<&str>>('+'), char('-')))).parse(rest)
        {
            Ok((after_op, op)) => {
                let (after_rhs, rhs) = p_postfix(after_op)?;
                acc = match op {
                    '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
                    _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
                };
                rest = after_rhs;
            }
            Err(_) => break,
        }
    }
    Ok((rest, acc))
}

fn p_postfix(input: &str) -> IResult<&str, Expr> {
    let (mut rest, mut expr) = lex(p_atom).parse(input)?;
    loop {
        if let Ok((after_dot, _)) = lex(char::<_, nom::error::Error<&str>>('.')).parse(rest)
        {
            let (after_name, attr) = lex(ident).parse(after_dot)?;
            expr = Expr::Attribute {
                target: Box::new(expr),
                attr: attr.to_string(),
            };
            rest = after_name;
        } else if let Ok((after_bracket, _)) =
            lex(char::<_, nom::error::Error<&str>>('[')).parse(rest)
        {
            let (after_index, index) = p_expr(after_bracket)?;
            let (after_close, _) = lex(char(']')).parse(after_index)?;
            expr = Expr::Subscript {
                target: Box::new(expr),
                index: Box::new(index),
            };
            rest = after_close;
        } else {
            break;
        }
    }
    Ok((rest, expr))
}

fn p_atom(input: &str) -> IResult<&str, Expr> {
    alt((
        p_float, p_int, p_str, p_neg, p_paren, p_list, p_dict, p_name_or_const,
    ))
    .parse(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|ch: char| ch.is_alphabetic() || ch == '_'),
        take_while(|ch: char| ch.is_alphanumeric() || ch == '_'),
    ))
    .parse(input)
}

fn p_name_or_const(input: &str) -> IResult<&str, Expr> {
    map(ident, |name| match name {
        "None" => Expr::NoneLit,
        "True" => Expr::Bool(true),
        "False" => Expr::Bool(false),
        _ => Expr::Name(name.to_string()),
    })
    .parse(input)
}

fn p_int(input: &str) -> IResult<&str, Expr> {
    map(map_res(digit1, str::parse::<i64>), Expr::Int).parse(input)
}

fn p_float(input: &str) -> IResult<&str, Expr> {
    map(
        map_res(
            recognize((
                digit1,
                char('.'),
                take_while(|ch: char| ch.is_ascii_digit()),
            )),
            str::parse::<f64>,
        ),
        Expr::Float,
    )
    .parse(input)
}

fn p_neg(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('-'), lex(p_atom)), |inner| {
        Expr::Neg(Box::new(inner))
    })
    .parse(input)
}

fn p_str(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(char('\''), take_till(|ch| ch == '\''), char('\'')),
            delimited(char('"'), take_till(|ch| ch == '"'), char('"')),
        )),
        |contents: &str| Expr::Str(contents.to_string()),
    )
    .parse(input)
}

fn p_list(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            char('['),
            separated_list0(lex(char(',')), p_expr),
            lex(char(']')),
        ),
        Expr::List,
    )
    .parse(input)
}

fn p_dict(input: &str) -> IResult<&str, Expr> {
    let entry = |input| {
        pair(p_expr, preceded(lex(char(':')), p_expr)).parse(input)
    };
    map(
        delimited(
            char('{'),
            separated_list0(lex(char(',')), entry),
            lex(char('}')),
        ),
        Expr::Dict,
    )
    .parse(input)
}

/// `(expr)` is grouping; `(expr,)` and `(a, b)` are tuples.
fn p_paren(input: &str) -> IResult<&str, Expr> {
    let (rest, _) = char('(').parse(input)?;
    let (rest, items) = separated_list0(lex(char(',')), p_expr).parse(rest)?;
    let (rest, trailing_comma) = opt(lex(char(','))).parse(rest)?;
    let (rest, _) = lex(char(')')).parse(rest)?;
    let expr = if items.len() == 1 && trailing_comma.is_none() {
        items.into_iter().next().unwrap()
    } else {
        Expr::Tuple(items)
    };
    Ok((rest, expr))
}
