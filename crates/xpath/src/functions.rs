//! Defines the registry and built-in implementations for XPath 1.0 functions.

use super::engine::{EvaluationContext, XPathValue, string_to_number};
use crate::axes;
use crate::error::XPathError;
use crate::navigator::NodeNavigator;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) if max == self.min + 1 => write!(f, "{} or {}", self.min, max),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

static BUILTINS: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::default);

/// Maps function names to the argument counts they accept.
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Arity>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The shared registry of XPath 1.0 core functions.
    pub fn builtin() -> &'static FunctionRegistry {
        &BUILTINS
    }

    pub fn register(&mut self, name: &'static str, arity: Arity) {
        self.functions.insert(name, arity);
    }

    pub fn get(&self, name: &str) -> Option<Arity> {
        self.functions.get(name).copied()
    }

    /// Fails unless `name` is registered and accepts `count` arguments.
    pub fn check(&self, name: &str, count: usize) -> Result<(), XPathError> {
        let arity = self
            .get(name)
            .ok_or_else(|| XPathError::UnknownFunction(name.to_string()))?;
        if arity.accepts(count) {
            Ok(())
        } else {
            Err(XPathError::Arity {
                function: name.to_string(),
                expected: arity.to_string(),
                actual: count,
            })
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        // Node-set
        registry.register("last", Arity::exactly(0));
        registry.register("position", Arity::exactly(0));
        registry.register("count", Arity::exactly(1));
        registry.register("local-name", Arity::between(0, 1));
        registry.register("name", Arity::between(0, 1));
        // String
        registry.register("string", Arity::between(0, 1));
        registry.register("concat", Arity::at_least(2));
        registry.register("starts-with", Arity::exactly(2));
        registry.register("ends-with", Arity::exactly(2));
        registry.register("contains", Arity::exactly(2));
        registry.register("substring-before", Arity::exactly(2));
        registry.register("substring-after", Arity::exactly(2));
        registry.register("substring", Arity::between(2, 3));
        registry.register("string-length", Arity::between(0, 1));
        registry.register("normalize-space", Arity::between(0, 1));
        registry.register("translate", Arity::exactly(3));
        registry.register("lower-case", Arity::exactly(1));
        registry.register("upper-case", Arity::exactly(1));
        // Boolean
        registry.register("not", Arity::exactly(1));
        registry.register("true", Arity::exactly(0));
        registry.register("false", Arity::exactly(0));
        registry.register("boolean", Arity::exactly(1));
        // Number
        registry.register("number", Arity::between(0, 1));
        registry.register("sum", Arity::exactly(1));
        registry.register("floor", Arity::exactly(1));
        registry.register("ceiling", Arity::exactly(1));
        registry.register("round", Arity::exactly(1));
        registry
    }
}

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<N: NodeNavigator>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<XPathValue<N>, XPathError> {
    e_ctx.functions.check(name, args.len())?;
    let mut args = args.into_iter();

    // The registry has validated the argument count, so `next()` below only yields
    // `None` for optional arguments.
    let result = match name {
        "last" => XPathValue::Number(e_ctx.context_size as f64),
        "position" => XPathValue::Number(e_ctx.context_position as f64),
        "count" => XPathValue::Number(node_set(name, args.next())?.len() as f64),
        "local-name" => {
            let node = optional_node(name, args.next(), e_ctx)?;
            XPathValue::String(node.map(|n| n.local_name().into_owned()).unwrap_or_default())
        }
        "name" => {
            let node = optional_node(name, args.next(), e_ctx)?;
            XPathValue::String(node.map(|n| axes::qualified_name(&n)).unwrap_or_default())
        }

        "string" => XPathValue::String(string_or_context(args.next(), e_ctx)),
        "concat" => XPathValue::String(args.map(|v| v.to_string()).collect()),
        "starts-with" => {
            let (s, prefix) = two_strings(args);
            XPathValue::Boolean(s.starts_with(&prefix))
        }
        "ends-with" => {
            let (s, suffix) = two_strings(args);
            XPathValue::Boolean(s.ends_with(&suffix))
        }
        "contains" => {
            let (s, needle) = two_strings(args);
            XPathValue::Boolean(s.contains(&needle))
        }
        "substring-before" => {
            let (s, needle) = two_strings(args);
            let before = s.find(&needle).map(|i| &s[..i]).unwrap_or("");
            XPathValue::String(before.to_string())
        }
        "substring-after" => {
            let (s, needle) = two_strings(args);
            let after = s.find(&needle).map(|i| &s[i + needle.len()..]).unwrap_or("");
            XPathValue::String(after.to_string())
        }
        "substring" => {
            let s = string_arg(args.next());
            let start = number_arg(args.next());
            let length = args.next().map(|v| v.to_number());
            XPathValue::String(substring(&s, start, length))
        }
        "string-length" => {
            XPathValue::Number(string_or_context(args.next(), e_ctx).chars().count() as f64)
        }
        "normalize-space" => {
            let s = string_or_context(args.next(), e_ctx);
            XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        "translate" => {
            let s = string_arg(args.next());
            let from: Vec<char> = string_arg(args.next()).chars().collect();
            let to: Vec<char> = string_arg(args.next()).chars().collect();
            let translated = s
                .chars()
                .filter_map(|c| match from.iter().position(|&f| f == c) {
                    Some(pos) => to.get(pos).copied(),
                    None => Some(c),
                })
                .collect();
            XPathValue::String(translated)
        }
        "lower-case" => XPathValue::String(string_arg(args.next()).to_lowercase()),
        "upper-case" => XPathValue::String(string_arg(args.next()).to_uppercase()),

        "not" => XPathValue::Boolean(!args.next().is_some_and(|v| v.to_bool())),
        "true" => XPathValue::Boolean(true),
        "false" => XPathValue::Boolean(false),
        "boolean" => XPathValue::Boolean(args.next().is_some_and(|v| v.to_bool())),

        "number" => XPathValue::Number(match args.next() {
            Some(v) => v.to_number(),
            None => string_to_number(&e_ctx.context_node.value()),
        }),
        "sum" => XPathValue::Number(
            node_set(name, args.next())?
                .iter()
                .map(|n| string_to_number(&n.value()))
                .sum(),
        ),
        "floor" => XPathValue::Number(number_arg(args.next()).floor()),
        "ceiling" => XPathValue::Number(number_arg(args.next()).ceil()),
        "round" => XPathValue::Number(round(number_arg(args.next()))),

        _ => return Err(XPathError::UnknownFunction(name.to_string())),
    };
    Ok(result)
}

fn string_arg<N: NodeNavigator>(value: Option<XPathValue<N>>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn number_arg<N: NodeNavigator>(value: Option<XPathValue<N>>) -> f64 {
    value.map_or(f64::NAN, |v| v.to_number())
}

fn two_strings<N: NodeNavigator>(mut args: impl Iterator<Item = XPathValue<N>>) -> (String, String) {
    let first = string_arg(args.next());
    let second = string_arg(args.next());
    (first, second)
}

fn string_or_context<N: NodeNavigator>(
    value: Option<XPathValue<N>>,
    e_ctx: &EvaluationContext<'_, N>,
) -> String {
    match value {
        Some(v) => v.to_string(),
        None => e_ctx.context_node.value(),
    }
}

fn node_set<N: NodeNavigator>(
    function: &str,
    value: Option<XPathValue<N>>,
) -> Result<Vec<N>, XPathError> {
    match value {
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes),
        Some(other) => Err(XPathError::TypeError(format!(
            "{}() argument must be a node-set, got {}",
            function,
            other.type_name()
        ))),
        None => Ok(vec![]),
    }
}

/// The node named by an optional node-set argument, defaulting to the context node.
fn optional_node<N: NodeNavigator>(
    function: &str,
    value: Option<XPathValue<N>>,
    e_ctx: &EvaluationContext<'_, N>,
) -> Result<Option<N>, XPathError> {
    match value {
        None => Ok(Some(e_ctx.context_node.clone())),
        some => Ok(node_set(function, some)?.into_iter().next()),
    }
}

fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let first = round(start);
    let last = match length {
        Some(l) => first + round(l),
        None => f64::INFINITY,
    };
    s.chars()
        .enumerate()
        .filter(|(i, _)| {
            let pos = (i + 1) as f64;
            pos >= first && pos < last
        })
        .map(|(_, c)| c)
        .collect()
}

/// Rounds halves towards positive infinity, keeping NaN, infinities and zero.
fn round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        return n;
    }
    (n + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::XPath;
    use crate::navigator::tests::{MockNavigator, create_test_tree};

    fn eval_string(expr: &str) -> String {
        let tree = create_test_tree();
        let nav = MockNavigator::new(&tree);
        XPath::compile(expr).unwrap().evaluate(&nav).unwrap().to_string()
    }

    #[test]
    fn test_registry_checks_arity() {
        let registry = FunctionRegistry::builtin();
        assert!(registry.check("concat", 5).is_ok());
        assert_eq!(
            registry.check("concat", 1).unwrap_err(),
            XPathError::Arity {
                function: "concat".into(),
                expected: "at least 2".into(),
                actual: 1
            }
        );
        assert_eq!(
            registry.check("substring", 4).unwrap_err().to_string(),
            "Function 'substring' expects 2 or 3 argument(s), got 4"
        );
        assert_eq!(
            registry.check("frobnicate", 0).unwrap_err(),
            XPathError::UnknownFunction("frobnicate".into())
        );
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(eval_string("concat('a', 'b', 1)"), "ab1");
        assert_eq!(eval_string("substring('12345', 2, 3)"), "234");
        assert_eq!(eval_string("substring('12345', 1.5, 2.6)"), "234");
        assert_eq!(eval_string("substring('12345', 0, 3)"), "12");
        assert_eq!(eval_string("substring-before('1999/04/01', '/')"), "1999");
        assert_eq!(eval_string("substring-after('1999/04/01', '/')"), "04/01");
        assert_eq!(eval_string("normalize-space('  a \n b  ')"), "a b");
        assert_eq!(eval_string("translate('bar', 'abc', 'ABC')"), "BAr");
        assert_eq!(eval_string("translate('--aaa--', 'abc-', 'ABC')"), "AAA");
        assert_eq!(eval_string("upper-case('println')"), "PRINTLN");
        assert_eq!(eval_string("string-length('héllo')"), "5");
        assert_eq!(eval_string("ends-with('main.go', '.go')"), "true");
    }

    #[test]
    fn test_number_functions() {
        assert_eq!(eval_string("round(2.5)"), "3");
        assert_eq!(eval_string("round(-2.5)"), "-2");
        assert_eq!(eval_string("floor(-1.5)"), "-2");
        assert_eq!(eval_string("ceiling(1.2)"), "2");
        assert_eq!(eval_string("number('x')"), "NaN");
        assert_eq!(eval_string("boolean('')"), "false");
        assert_eq!(eval_string("not(0)"), "true");
    }

    #[test]
    fn test_node_set_functions() {
        assert_eq!(eval_string("count(/*)"), "3");
        assert_eq!(eval_string("count(//@*)"), "2");
        assert_eq!(eval_string("local-name(/*[2])"), "div");
        assert_eq!(eval_string("name(//@lang)"), "lang");
        assert_eq!(eval_string("sum(/para)"), "NaN");
        assert_eq!(eval_string("string(/para)"), "Hello");
        assert_eq!(eval_string("local-name(/nothing)"), "");
    }

    #[test]
    fn test_count_rejects_non_node_sets() {
        let tree = create_test_tree();
        let nav = MockNavigator::new(&tree);
        let err = XPath::compile("count('x')")
            .unwrap()
            .evaluate(&nav)
            .unwrap_err();
        assert!(matches!(err, XPathError::TypeError(_)));
    }
}
