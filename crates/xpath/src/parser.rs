//! A `nom`-based parser for the XPath 1.0 expression language.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, recognize, success, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

type PResult<'a, T> = IResult<&'a str, T>;

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    let failure = |message: String| XPathError::Parse {
        expression: input.to_string(),
        message,
    };
    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(failure(format!("unexpected input at '{}'", rem))),
        Err(e) => Err(failure(e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn sp(input: &str) -> PResult<'_, &str> {
    multispace0(input)
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(sp, inner, sp)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Matches an operator word such as `and` or `div` that is not the prefix of a longer name.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(satisfy(is_name_char)))
}

fn binary_expr<'a>(
    operand: fn(&'a str) -> PResult<'a, Expression>,
    operator: fn(&'a str) -> PResult<'a, BinaryOperator>,
    input: &'a str,
) -> PResult<'a, Expression> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    let expr = rest.into_iter().fold(first, |left, (op, right)| Expression::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    });
    Ok((input, expr))
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> PResult<'_, Expression> {
    ws(or_expr).parse(input)
}

fn or_op(input: &str) -> PResult<'_, BinaryOperator> {
    value(BinaryOperator::Or, keyword("or")).parse(input)
}

fn and_op(input: &str) -> PResult<'_, BinaryOperator> {
    value(BinaryOperator::And, keyword("and")).parse(input)
}

fn equality_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Equals, tag("=")),
        value(BinaryOperator::NotEquals, tag("!=")),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::LessThanOrEqual, tag("<=")),
        value(BinaryOperator::GreaterThanOrEqual, tag(">=")),
        value(BinaryOperator::LessThan, tag("<")),
        value(BinaryOperator::GreaterThan, tag(">")),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Plus, char('+')),
        value(BinaryOperator::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Multiply, char('*')),
        value(BinaryOperator::Divide, keyword("div")),
        value(BinaryOperator::Modulo, keyword("mod")),
    ))
    .parse(input)
}

fn union_op(input: &str) -> PResult<'_, BinaryOperator> {
    value(BinaryOperator::Union, char('|')).parse(input)
}

fn or_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(and_expr, or_op, input)
}

fn and_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(equality_expr, and_op, input)
}

fn equality_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(relational_expr, equality_op, input)
}

fn relational_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(additive_expr, relational_op, input)
}

fn additive_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(multiplicative_expr, additive_op, input)
}

fn multiplicative_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(unary_expr, multiplicative_op, input)
}

fn unary_expr(input: &str) -> PResult<'_, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |expr| Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        }),
        union_expr,
    ))
    .parse(input)
}

fn union_expr(input: &str) -> PResult<'_, Expression> {
    binary_expr(path_expr, union_op, input)
}

/// Handles the ambiguity between location paths and primary expressions that may be
/// followed by further steps, like `$var/foo` or `(//a)[1]/b`.
fn path_expr(input: &str) -> PResult<'_, Expression> {
    // Primary expressions go first: `position()` would otherwise parse as a step named `position`.
    if let Ok((rest, primary)) = filter_expr(input) {
        let (rest, steps) = relative_tail(rest)?;
        if steps.is_empty() {
            return Ok((rest, primary));
        }
        let path = LocationPath {
            start_point: Some(Box::new(primary)),
            is_absolute: false,
            steps,
        };
        return Ok((rest, Expression::LocationPath(path)));
    }
    map(location_path, Expression::LocationPath).parse(input)
}

fn filter_expr(input: &str) -> PResult<'_, Expression> {
    let (rest, primary) = primary_expr(input)?;
    let (rest, predicates) = many0(predicate).parse(rest)?;
    if predicates.is_empty() {
        return Ok((rest, primary));
    }
    Ok((
        rest,
        Expression::Filter {
            primary: Box::new(primary),
            predicates,
        },
    ))
}

fn primary_expr(input: &str) -> PResult<'_, Expression> {
    ws(alt((
        variable_reference,
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(char('('), expression, char(')')),
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn number(input: &str) -> PResult<'_, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

fn string_literal(input: &str) -> PResult<'_, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn variable_reference(input: &str) -> PResult<'_, Expression> {
    map(preceded(char('$'), q_name), |name| {
        Expression::Variable(name.to_string())
    })
    .parse(input)
}

// --- Name and NodeTest Parsers ---

fn nc_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)
}

fn is_node_type_name(name: &str) -> bool {
    matches!(name, "text" | "node" | "comment" | "processing-instruction")
}

fn node_type_test(input: &str) -> PResult<'_, NodeTest> {
    map(
        terminated(
            alt((
                tag("text"),
                tag("node"),
                tag("comment"),
                tag("processing-instruction"),
            )),
            pair(ws(char('(')), char(')')),
        ),
        |node_type: &str| match node_type {
            "text" => NodeTest::NodeType(NodeTypeTest::Text),
            "comment" => NodeTest::NodeType(NodeTypeTest::Comment),
            "processing-instruction" => NodeTest::NodeType(NodeTypeTest::ProcessingInstruction),
            _ => NodeTest::NodeType(NodeTypeTest::Node),
        },
    )
    .parse(input)
}

fn node_test(input: &str) -> PResult<'_, NodeTest> {
    alt((
        value(NodeTest::Wildcard, char('*')),
        node_type_test,
        map(q_name, |name| NodeTest::Name(name.to_string())),
    ))
    .parse(input)
}

// --- Path Parsers ---

fn axis_name(input: &str) -> PResult<'_, Axis> {
    alt((
        value(Axis::AncestorOrSelf, tag("ancestor-or-self")),
        value(Axis::Ancestor, tag("ancestor")),
        value(Axis::Attribute, tag("attribute")),
        value(Axis::Child, tag("child")),
        value(Axis::DescendantOrSelf, tag("descendant-or-self")),
        value(Axis::Descendant, tag("descendant")),
        value(Axis::FollowingSibling, tag("following-sibling")),
        value(Axis::Following, tag("following")),
        value(Axis::Parent, tag("parent")),
        value(Axis::PrecedingSibling, tag("preceding-sibling")),
        value(Axis::Preceding, tag("preceding")),
        value(Axis::SelfAxis, tag("self")),
    ))
    .parse(input)
}

fn axis(input: &str) -> PResult<'_, Axis> {
    alt((
        value(Axis::Attribute, char('@')),
        terminated(axis_name, ws(tag("::"))),
        success(Axis::Child),
    ))
    .parse(input)
}

fn predicate(input: &str) -> PResult<'_, Expression> {
    delimited(ws(char('[')), expression, char(']')).parse(input)
}

fn abbreviated_step(input: &str) -> PResult<'_, Step> {
    let node = NodeTest::NodeType(NodeTypeTest::Node);
    alt((
        map(tag(".."), |_| Step {
            axis: Axis::Parent,
            node_test: node.clone(),
            predicates: vec![],
        }),
        map(char('.'), |_| Step {
            axis: Axis::SelfAxis,
            node_test: node.clone(),
            predicates: vec![],
        }),
    ))
    .parse(input)
}

fn step(input: &str) -> PResult<'_, Step> {
    let (input, _) = sp(input)?;
    if let Ok(parsed) = abbreviated_step(input) {
        return Ok(parsed);
    }
    let (input, axis) = axis(input)?;
    let (input, node_test) = node_test(input)?;
    let (input, predicates) = many0(predicate).parse(input)?;
    Ok((
        input,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

fn separator(input: &str) -> PResult<'_, &str> {
    ws(alt((tag("//"), tag("/")))).parse(input)
}

/// Parses `/step` and `//step` continuations, expanding `//` to its long form.
fn relative_tail(input: &str) -> PResult<'_, Vec<Step>> {
    let (input, pairs) = many0(pair(separator, step)).parse(input)?;
    let mut steps = Vec::with_capacity(pairs.len());
    for (sep, next) in pairs {
        if sep == "//" {
            steps.push(Step::descendant_or_self());
        }
        steps.push(next);
    }
    Ok((input, steps))
}

fn location_path(input: &str) -> PResult<'_, LocationPath> {
    let (input, _) = sp(input)?;
    let (input, root) = opt(alt((tag("//"), tag("/")))).parse(input)?;

    let mut steps = Vec::new();
    let input = match root {
        Some("/") => match step(input) {
            Ok((rest, first)) => {
                steps.push(first);
                rest
            }
            // A bare "/" selects the root itself.
            Err(_) => input,
        },
        Some(_) => {
            let (rest, first) = step(input)?;
            steps.push(Step::descendant_or_self());
            steps.push(first);
            rest
        }
        None => {
            let (rest, first) = step(input)?;
            steps.push(first);
            rest
        }
    };

    let (input, tail) = relative_tail(input)?;
    steps.extend(tail);
    Ok((
        input,
        LocationPath {
            start_point: None,
            is_absolute: root.is_some(),
            steps,
        },
    ))
}

// --- Function Call Parser ---

fn function_call(input: &str) -> PResult<'_, Expression> {
    let (rest, name) = q_name(input)?;
    // Node-type tests like text() are not functions; the step parser owns them.
    if is_node_type_name(name) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (rest, args) = delimited(
        ws(char('(')),
        separated_list0(char(','), expression),
        char(')'),
    )
    .parse(rest)?;
    Ok((
        rest,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}
