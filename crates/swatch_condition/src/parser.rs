//! Condition expression parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or         := and (("||" | "or") and)*
//! and        := unary (("&&" | "and") unary)*
//! unary      := ("!" | "not") unary | comparison
//! comparison := operand (op operand)?
//! op         := "==" | "!=" | "<=" | ">=" | "<" | ">"
//!             | "in" | "not in" | "contains" | "startsWith" | "endsWith"
//! operand    := "(" or ")" | "[" operand,* "]" | string | number
//!             | "true" | "false" | "null" | path
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{all_consuming, cut, map, map_res, not, opt, recognize, value},
    error::{context, ErrorKind, ParseError as NomParseError, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated, tuple},
    Finish, IResult,
};
use serde_json::{Number, Value};

use crate::ast::{CompareOp, Expr};
use crate::error::ConditionError;

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Nesting ceiling for [`parse`], whatever limit the evaluator is configured
/// with. The grammar is recursive, so this bounds parser stack use.
pub const MAX_NESTING: usize = 64;

/// Parse a condition expression into an [`Expr`]
pub fn parse(expression: &str) -> Result<Expr, ConditionError> {
    if expression.trim().is_empty() {
        return Err(ConditionError::Empty);
    }
    let nesting = nesting_depth(expression);
    if nesting > MAX_NESTING {
        return Err(ConditionError::TooComplex(format!(
            "nesting depth {nesting} exceeds {MAX_NESTING}"
        )));
    }
    all_consuming(delimited(ws, or_expr, ws))(expression)
        .finish()
        .map(|(_, expr)| expr)
        .map_err(|err| ConditionError::Parse {
            expression: expression.to_owned(),
            message: describe(expression, &err),
        })
}

/// Format a VerboseError as "offset N: context > context (near ...)"
fn describe(input: &str, err: &VerboseError<&str>) -> String {
    let offset = err
        .errors
        .first()
        .map(|(fragment, _)| input.len() - fragment.len())
        .unwrap_or(0);

    let mut parts: Vec<String> = Vec::new();
    for (fragment, kind) in &err.errors {
        match kind {
            VerboseErrorKind::Context(ctx) => parts.push(format!("in {ctx}")),
            VerboseErrorKind::Char(c) => {
                let near: String = fragment.chars().take(20).collect();
                parts.push(format!("expected '{c}' near \"{near}\""));
            }
            VerboseErrorKind::Nom(ErrorKind::Eof) => parts.push("unexpected trailing input".into()),
            VerboseErrorKind::Nom(kind) => parts.push(format!("{kind:?}")),
        }
    }
    if parts.is_empty() {
        parts.push("unknown parse error".into());
    }
    format!("offset {offset}: {}", parts.join(", "))
}

/// Upper bound on the parser recursion `expression` needs, found without
/// parsing it: open `(`/`[` groups plus the `!`/`not` prefixes still waiting
/// for their operand at each level. String literals are skipped.
pub fn nesting_depth(expression: &str) -> usize {
    // pending negations per open group; the outermost level is index 0
    let mut levels: Vec<usize> = vec![0];
    let mut max = 0usize;
    let mut chars = expression.char_indices().peekable();

    let depth = |levels: &[usize]| levels.len() - 1 + levels.iter().sum::<usize>();

    while let Some((start, c)) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut escaped = false;
                for (_, s) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if s == '\\' {
                        escaped = true;
                    } else if s == c {
                        break;
                    }
                }
                reset(&mut levels);
            }
            '(' | '[' => {
                levels.push(0);
                max = max.max(depth(&levels));
            }
            ')' | ']' => {
                if levels.len() > 1 {
                    levels.pop();
                }
                reset(&mut levels);
            }
            '!' if chars.peek().map(|(_, n)| *n) != Some('=') => {
                if let Some(pending) = levels.last_mut() {
                    *pending += 1;
                }
                max = max.max(depth(&levels));
            }
            c if is_ident_char(c) || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, n)) = chars.peek().copied() {
                    if !(is_ident_char(n) || n == '.') {
                        break;
                    }
                    end = i + n.len_utf8();
                    chars.next();
                }
                match &expression[start..end] {
                    "not" if !followed_by_in(&expression[end..]) => {
                        if let Some(pending) = levels.last_mut() {
                            *pending += 1;
                        }
                        max = max.max(depth(&levels));
                    }
                    "not" | "and" | "or" | "in" | "contains" | "startsWith" | "endsWith" => {}
                    _ => reset(&mut levels),
                }
            }
            _ => {}
        }
    }
    max.max(depth(&levels))
}

/// An operand closes every negation waiting at the current level
fn reset(levels: &mut [usize]) {
    if let Some(pending) = levels.last_mut() {
        *pending = 0;
    }
}

fn followed_by_in(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.strip_prefix("in")
        .is_some_and(|after| !after.starts_with(is_ident_char))
}

fn ws(input: &str) -> ParseResult<()> {
    value((), multispace0)(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// A word that is not immediately followed by more identifier characters
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> ParseResult<'a, &'a str> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

fn build(first: Expr, rest: Vec<Expr>, node: fn(Vec<Expr>) -> Expr) -> Expr {
    if rest.is_empty() {
        return first;
    }
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest);
    node(items)
}

fn or_expr(input: &str) -> ParseResult<Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(
        delimited(ws, alt((tag("||"), keyword("or"))), ws),
        context("right side of or", cut(and_expr)),
    ))(input)?;
    Ok((input, build(first, rest, Expr::Or)))
}

fn and_expr(input: &str) -> ParseResult<Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(
        delimited(ws, alt((tag("&&"), keyword("and"))), ws),
        context("right side of and", cut(unary)),
    ))(input)?;
    Ok((input, build(first, rest, Expr::And)))
}

fn unary(input: &str) -> ParseResult<Expr> {
    alt((
        map(
            preceded(
                pair(alt((tag("!"), keyword("not"))), ws),
                context("negated expression", cut(unary)),
            ),
            |inner| Expr::Not(Box::new(inner)),
        ),
        comparison,
    ))(input)
}

fn comparison(input: &str) -> ParseResult<Expr> {
    let (input, left) = operand(input)?;
    let (input, tail) = opt(pair(
        delimited(ws, compare_op, ws),
        context("right operand", cut(operand)),
    ))(input)?;

    let expr = match tail {
        Some((op, right)) => Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        None => left,
    };
    Ok((input, expr))
}

fn compare_op(input: &str) -> ParseResult<CompareOp> {
    alt((
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
        value(
            CompareOp::NotIn,
            tuple((keyword("not"), multispace1, keyword("in"))),
        ),
        value(CompareOp::In, keyword("in")),
        value(CompareOp::Contains, keyword("contains")),
        value(CompareOp::StartsWith, keyword("startsWith")),
        value(CompareOp::EndsWith, keyword("endsWith")),
    ))(input)
}

fn operand(input: &str) -> ParseResult<Expr> {
    context(
        "operand",
        alt((
            parenthesized,
            list,
            map(string_literal, |s| Expr::Literal(Value::String(s))),
            number,
            value(Expr::Literal(Value::Bool(true)), keyword("true")),
            value(Expr::Literal(Value::Bool(false)), keyword("false")),
            value(Expr::Literal(Value::Null), keyword("null")),
            path,
        )),
    )(input)
}

fn parenthesized(input: &str) -> ParseResult<Expr> {
    delimited(
        pair(char('('), ws),
        or_expr,
        pair(ws, context("closing parenthesis", cut(char(')')))),
    )(input)
}

fn list(input: &str) -> ParseResult<Expr> {
    map(
        delimited(
            pair(char('['), ws),
            separated_list0(delimited(ws, char(','), ws), operand),
            pair(ws, context("closing bracket", cut(char(']')))),
        ),
        Expr::List,
    )(input)
}

fn number(input: &str) -> ParseResult<Expr> {
    map_res(recognize_float, |text: &str| {
        text.parse::<f64>().map(|n| {
            Expr::Literal(Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null))
        })
    })(input)
}

/// `'...'` or `"..."` with backslash escapes
fn string_literal(input: &str) -> ParseResult<String> {
    let Some(quote) = input.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Char,
        )));
    };

    let body = &input[1..];
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            c if c == quote => return Ok((&body[i + c.len_utf8()..], out)),
            c => out.push(c),
        }
    }

    Err(nom::Err::Failure(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context("unterminated string"))],
    }))
}

fn path(input: &str) -> ParseResult<Expr> {
    let mut head = recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ));
    let (input, first) = head(input)?;
    let (input, rest) = many0(preceded(
        char('.'),
        context("path segment", cut(take_while1(is_ident_char))),
    ))(input)?;

    let mut segments = Vec::with_capacity(rest.len() + 1);
    segments.push(first.to_owned());
    segments.extend(rest.into_iter().map(str::to_owned));
    Ok((input, Expr::Path(segments)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(p: &str) -> Expr {
        Expr::Path(p.split('.').map(str::to_owned).collect())
    }

    fn string(s: &str) -> Expr {
        Expr::Literal(Value::String(s.to_owned()))
    }

    fn compare(op: CompareOp, left: Expr, right: Expr) -> Expr {
        Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn simple_equality() {
        assert_eq!(
            parse("user.role == 'admin'").unwrap(),
            compare(CompareOp::Eq, path("user.role"), string("admin"))
        );
        assert_eq!(
            parse(r#"  tenant.plan!="free" "#).unwrap(),
            compare(CompareOp::Ne, path("tenant.plan"), string("free"))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("a && b || c").unwrap(),
            Expr::Or(vec![Expr::And(vec![path("a"), path("b")]), path("c")])
        );
        assert_eq!(
            parse("a or b and c").unwrap(),
            Expr::Or(vec![path("a"), Expr::And(vec![path("b"), path("c")])])
        );
    }

    #[test]
    fn negation_and_grouping() {
        assert_eq!(
            parse("!(a || b)").unwrap(),
            Expr::Not(Box::new(Expr::Or(vec![path("a"), path("b")])))
        );
        assert_eq!(
            parse("not user.banned").unwrap(),
            Expr::Not(Box::new(path("user.banned")))
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            parse("time.hour >= 18").unwrap(),
            compare(
                CompareOp::Ge,
                path("time.hour"),
                Expr::Literal(serde_json::json!(18.0))
            )
        );
        assert_eq!(
            parse("flag == true").unwrap(),
            compare(CompareOp::Eq, path("flag"), Expr::Literal(Value::Bool(true)))
        );
        assert_eq!(
            parse("x == null").unwrap(),
            compare(CompareOp::Eq, path("x"), Expr::Literal(Value::Null))
        );
        assert_eq!(
            parse(r"name == 'it\'s'").unwrap(),
            compare(CompareOp::Eq, path("name"), string("it's"))
        );
    }

    #[test]
    fn membership_operators() {
        assert_eq!(
            parse("user.country in ['US', \"CA\"]").unwrap(),
            compare(
                CompareOp::In,
                path("user.country"),
                Expr::List(vec![string("US"), string("CA")])
            )
        );
        assert_eq!(
            parse("user.role not in []").unwrap(),
            compare(CompareOp::NotIn, path("user.role"), Expr::List(vec![]))
        );
        assert_eq!(
            parse("user.email endsWith '@example.com'").unwrap(),
            compare(CompareOp::EndsWith, path("user.email"), string("@example.com"))
        );
    }

    #[test]
    fn keywords_need_a_word_boundary() {
        assert_eq!(
            parse("order.total and notes").unwrap(),
            Expr::And(vec![path("order.total"), path("notes")])
        );
        assert_eq!(parse("index").unwrap(), path("index"));
    }

    #[test]
    fn hyphenated_and_numeric_segments() {
        assert_eq!(parse("prefs.high-contrast").unwrap(), path("prefs.high-contrast"));
        assert_eq!(parse("items.0").unwrap(), path("items.0"));
    }

    #[test]
    fn nesting_depth_counts_groups_and_negations() {
        assert_eq!(nesting_depth("a == '((('"), 0);
        assert_eq!(nesting_depth("((a) || [b])"), 2);
        assert_eq!(nesting_depth(r#"x == "\")""#), 0);
        assert_eq!(nesting_depth("!!!a"), 3);
        assert_eq!(nesting_depth("not not a"), 2);
        assert_eq!(nesting_depth("!a && !b && !c"), 1);
        assert_eq!(nesting_depth("!(!(a))"), 4);
        assert_eq!(nesting_depth("a != b"), 0);
        assert_eq!(nesting_depth("role not in ['x']"), 1);
        assert_eq!(nesting_depth("notes and nothing"), 0);
    }

    #[test]
    fn long_negation_chains_are_rejected_without_recursing() {
        let expression = format!("{}a", "!".repeat(100_000));
        assert_eq!(parse(&expression).unwrap_err().code(), "too_complex");

        let expression = format!("{}a", "not ".repeat(MAX_NESTING + 1));
        assert_eq!(parse(&expression).unwrap_err().code(), "too_complex");

        let expression = format!("{}a", "!".repeat(MAX_NESTING));
        assert!(parse(&expression).is_ok());
    }

    #[test]
    fn errors() {
        assert_eq!(parse("   "), Err(ConditionError::Empty));
        for bad in ["user.role ==", "(a", "'abc", "a &&", "user.", "a == 1 )", "[1, 2"] {
            let err = parse(bad).unwrap_err();
            assert_eq!(err.code(), "parse_error", "{bad}");
        }
    }
}
