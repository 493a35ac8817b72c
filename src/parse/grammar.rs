use std::str::FromStr;

use rust_decimal::Decimal;
use winnow::combinator::{alt, cut_err, delimited, opt, peek, repeat};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::TagValue;

// Syntax-level tree, before tag names are resolved against a dictionary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawCondition {
    pub(crate) tag: String,
    pub(crate) operator: String,
    pub(crate) value: TagValue,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawNode {
    pub(crate) kind: RawKind,
    pub(crate) conditions: Vec<RawCondition>,
    pub(crate) children: Vec<RawNode>,
}

enum RawPart {
    Node(RawNode),
    Condition(RawCondition),
}

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['\'', '"']).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    c if c == quote => s.push(c),
                    '\\' => s.push('\\'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<TagValue> {
    let text = (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)?;
    let suffix = opt(one_of(['i', 'I', 'l', 'L', 'f', 'F', 'g', 'G'])).parse_next(input)?;
    match suffix {
        Some('i' | 'I') => text
            .parse::<i32>()
            .map(TagValue::Int)
            .map_err(|_| ErrMode::from_input(input).cut()),
        Some('l' | 'L') => text
            .parse::<i64>()
            .map(TagValue::Long)
            .map_err(|_| ErrMode::from_input(input).cut()),
        Some('f' | 'F') => text
            .parse::<f32>()
            .map(TagValue::Float)
            .map_err(|_| ErrMode::from_input(input).cut()),
        Some('g' | 'G') => Decimal::from_str(text)
            .map(TagValue::Decimal)
            .map_err(|_| ErrMode::from_input(input).cut()),
        // Unsuffixed literals default to int, or decimal once a point
        // appears, matching how authored condition strings are written.
        _ => {
            if text.contains('.') {
                Decimal::from_str(text)
                    .map(TagValue::Decimal)
                    .map_err(|_| ErrMode::from_input(input).cut())
            } else {
                text.parse::<i32>()
                    .map(TagValue::Int)
                    .map_err(|_| ErrMode::from_input(input).cut())
            }
        }
    }
}

fn bare_literal(input: &mut &str) -> ModalResult<TagValue> {
    alt((
        "true".value(TagValue::Bool(true)),
        "false".value(TagValue::Bool(false)),
        number,
    ))
    .parse_next(input)
}

/// Non-string literals may be parenthesized; negative numbers always are
/// in serializer output, but the grammar accepts both forms everywhere.
fn literal(input: &mut &str) -> ModalResult<TagValue> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(TagValue::String),
        delimited(('(', ws), bare_literal, (ws, cut_err(')'))),
        bare_literal,
    ))
    .context(StrContext::Expected(StrContextValue::Description("literal")))
    .parse_next(input)
}

// -- Conditions and operator nodes ------------------------------------------

fn condition(input: &mut &str) -> ModalResult<RawCondition> {
    '{'.parse_next(input)?;
    ws.parse_next(input)?;
    let tag = ident.parse_next(input)?;
    '.'.parse_next(input)?;
    let operator = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "operator name",
        )))
        .parse_next(input)?;
    let value = cut_err(literal).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}').parse_next(input)?;
    Ok(RawCondition {
        tag: tag.to_owned(),
        operator: operator.to_owned(),
        value,
    })
}

pub(crate) fn node(input: &mut &str) -> ModalResult<RawNode> {
    '{'.parse_next(input)?;
    ws.parse_next(input)?;
    let keyword = ident.parse_next(input)?;
    let kind = match keyword {
        "AND" => RawKind::And,
        "OR" => RawKind::Or,
        _ => return Err(ErrMode::from_input(input)),
    };
    // A tag may itself be named AND or OR; `{AND.equalTo ...}` is a
    // condition, not a nested node.
    if peek(opt('.')).parse_next(input)?.is_some() {
        return Err(ErrMode::from_input(input));
    }
    let parts: Vec<RawPart> = repeat(0.., part).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;

    let mut conditions = Vec::new();
    let mut children = Vec::new();
    for p in parts {
        match p {
            RawPart::Node(n) => children.push(n),
            RawPart::Condition(c) => conditions.push(c),
        }
    }
    Ok(RawNode {
        kind,
        conditions,
        children,
    })
}

fn part(input: &mut &str) -> ModalResult<RawPart> {
    ws.parse_next(input)?;
    alt((node.map(RawPart::Node), condition.map(RawPart::Condition)))
        .context(StrContext::Expected(StrContextValue::Description(
            "nested operator or condition",
        )))
        .parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

pub(crate) fn tree(input: &mut &str) -> ModalResult<RawNode> {
    ws.parse_next(input)?;
    let root = node.parse_next(input)?;
    ws.parse_next(input)?;
    Ok(root)
}
