//! The evaluation engine for executing a parsed XPath AST through a `NodeNavigator`.

use super::ast::{Expression, LocationPath, Step, UnaryOperator};
use super::functions::{self, FunctionRegistry};
use super::{axes, operators, order};
use crate::ast::BinaryOperator;
use crate::error::XPathError;
use crate::navigator::NodeNavigator;
use crate::parser::parse_expression;
use std::collections::HashMap;
use std::fmt;

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<N: NodeNavigator> XPathValue<N> {
    /// Coerces the XPath value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the XPath value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => string_to_number(s),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map_or(f64::NAN, |n| string_to_number(&n.value())),
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, XPathValue::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, XPathValue::Number(_))
    }

    /// The XPath name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            XPathValue::NodeSet(_) => "node-set",
            XPathValue::String(_) => "string",
            XPathValue::Number(_) => "number",
            XPathValue::Boolean(_) => "boolean",
        }
    }
}

impl<N: NodeNavigator> fmt::Display for XPathValue<N> {
    /// Coerces the XPath value to a string as per XPath 1.0 rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(node) => f.write_str(&node.value()),
                None => Ok(()),
            },
            XPathValue::String(s) => f.write_str(s),
            XPathValue::Number(n) => f.write_str(&number_to_string(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Renders a number the XPath way: `NaN`, `Infinity`, integers without a fraction.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Parses a string the XPath way: optional minus, digits and at most one dot. Anything else is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if well_formed {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// A container for all state needed during expression evaluation.
/// `'d` is the lifetime of the borrowed registry and variable bindings.
pub struct EvaluationContext<'d, N: NodeNavigator> {
    pub context_node: N,
    pub functions: &'d FunctionRegistry,
    pub context_position: usize, // 1-based index
    pub context_size: usize,
    pub variables: &'d HashMap<String, XPathValue<N>>,
}

impl<'d, N: NodeNavigator> EvaluationContext<'d, N> {
    pub fn new(
        context_node: N,
        functions: &'d FunctionRegistry,
        variables: &'d HashMap<String, XPathValue<N>>,
    ) -> Self {
        Self {
            context_node,
            functions,
            context_position: 1,
            context_size: 1,
            variables,
        }
    }

    /// A context for a predicate, focused on `node` at `position` of `size`.
    fn focus(&self, node: N, position: usize, size: usize) -> Self {
        Self {
            context_node: node,
            functions: self.functions,
            context_position: position,
            context_size: size,
            variables: self.variables,
        }
    }

    fn root(&self) -> N {
        let mut root = self.context_node.clone();
        root.move_to_root();
        root
    }
}

/// Evaluates a parsed expression and returns a concrete `XPathValue`.
pub fn evaluate<N: NodeNavigator>(
    expr: &Expression,
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<XPathValue<N>, XPathError> {
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::LocationPath(path) => {
            let nodes = evaluate_location_path(path, e_ctx)?;
            Ok(XPathValue::NodeSet(nodes))
        }
        Expression::Variable(name) => e_ctx
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| XPathError::UnknownVariable(name.clone())),
        Expression::FunctionCall { name, args } => {
            let mut evaluated_args = Vec::with_capacity(args.len());
            for arg in args {
                evaluated_args.push(evaluate(arg, e_ctx)?);
            }
            functions::evaluate_function(name, evaluated_args, e_ctx)
        }
        Expression::Filter {
            primary,
            predicates,
        } => {
            let nodes = expect_node_set(evaluate(primary, e_ctx)?, "filter expression")?;
            let nodes = order::sort_document_order(nodes);
            Ok(XPathValue::NodeSet(apply_predicates(
                nodes, predicates, e_ctx,
            )?))
        }
        Expression::BinaryOp { left, op, right } => {
            let left_val = evaluate(left, e_ctx)?;
            match op {
                BinaryOperator::Or if left_val.to_bool() => Ok(XPathValue::Boolean(true)),
                BinaryOperator::And if !left_val.to_bool() => Ok(XPathValue::Boolean(false)),
                _ => {
                    let right_val = evaluate(right, e_ctx)?;
                    operators::evaluate(*op, left_val, right_val)
                }
            }
        }
        Expression::UnaryOp { op, expr } => {
            let val = evaluate(expr, e_ctx)?;
            match op {
                UnaryOperator::Minus => Ok(XPathValue::Number(-val.to_number())),
            }
        }
    }
}

fn expect_node_set<N: NodeNavigator>(
    value: XPathValue<N>,
    what: &str,
) -> Result<Vec<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        other => Err(XPathError::TypeError(format!(
            "{} must be a node-set, got {}",
            what,
            other.type_name()
        ))),
    }
}

fn evaluate_location_path<N: NodeNavigator>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<Vec<N>, XPathError> {
    let mut current_nodes = if let Some(start_expr) = &path.start_point {
        let nodes = expect_node_set(evaluate(start_expr, e_ctx)?, "path start")?;
        order::sort_document_order(nodes)
    } else if path.is_absolute {
        vec![e_ctx.root()]
    } else {
        vec![e_ctx.context_node.clone()]
    };

    for step in &path.steps {
        if current_nodes.is_empty() {
            break;
        }
        current_nodes = evaluate_step(step, &current_nodes, e_ctx)?;
    }
    Ok(current_nodes)
}

/// Evaluates one step: for every context node, collect the axis, apply the node test,
/// then the predicates. The union of the per-node results comes back in document order.
fn evaluate_step<N: NodeNavigator>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<Vec<N>, XPathError> {
    let mut result = Vec::new();
    for node in context_nodes {
        let candidates: Vec<N> = axes::collect(step.axis, node)
            .into_iter()
            .filter(|candidate| axes::matches(candidate, &step.node_test, step.axis))
            .collect();
        result.extend(apply_predicates(candidates, &step.predicates, e_ctx)?);
    }

    // A single context node on a forward axis already yields document order.
    if context_nodes.len() > 1 || step.axis.is_reverse() {
        result = order::sort_document_order(result);
    }
    Ok(result)
}

/// Filters `nodes` through each predicate in turn. Positions follow the order of `nodes`.
fn apply_predicates<N: NodeNavigator>(
    mut nodes: Vec<N>,
    predicates: &[Expression],
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<Vec<N>, XPathError> {
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            let position = i + 1;
            let focus = e_ctx.focus(node.clone(), position, size);
            let keep = match evaluate(predicate, &focus)? {
                XPathValue::Number(n) => n == position as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

/// A parsed and validated expression, reusable against any number of navigators.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    source: String,
    expr: Expression,
}

impl XPath {
    /// Parses `source` and checks every function call against the built-in registry.
    pub fn compile(source: &str) -> Result<Self, XPathError> {
        let expr = parse_expression(source)?;
        let registry = FunctionRegistry::builtin();
        let mut error = None;
        expr.walk(&mut |e| {
            if error.is_some() {
                return;
            }
            if let Expression::FunctionCall { name, args } = e {
                error = registry.check(name, args.len()).err();
            }
        });
        if let Some(err) = error {
            return Err(err);
        }
        log::debug!("compiled expression '{}'", source);
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    /// Evaluates against `context` with no variables bound.
    pub fn evaluate<N: NodeNavigator>(&self, context: &N) -> Result<XPathValue<N>, XPathError> {
        self.evaluate_with(context, &HashMap::new())
    }

    pub fn evaluate_with<N: NodeNavigator>(
        &self,
        context: &N,
        variables: &HashMap<String, XPathValue<N>>,
    ) -> Result<XPathValue<N>, XPathError> {
        let e_ctx = EvaluationContext::new(context.clone(), FunctionRegistry::builtin(), variables);
        evaluate(&self.expr, &e_ctx)
    }

    /// Evaluates an expression that must produce a node-set.
    pub fn select<N: NodeNavigator>(&self, context: &N) -> Result<Vec<N>, XPathError> {
        expect_node_set(self.evaluate(context)?, "selected expression")
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
