//! Binary operator semantics, including the existential node-set comparisons of XPath 1.0.

use crate::ast::BinaryOperator;
use crate::engine::XPathValue;
use crate::error::XPathError;
use crate::navigator::NodeNavigator;
use crate::order;

/// Applies a non-logical binary operator to two evaluated operands.
///
/// `and` / `or` short-circuit and are handled by the evaluator before reaching here.
pub fn evaluate<N: NodeNavigator>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    use BinaryOperator::*;
    match op {
        Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        Equals | NotEquals | LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => {
            Ok(XPathValue::Boolean(compare(op, &left, &right)))
        }
        Plus => Ok(XPathValue::Number(left.to_number() + right.to_number())),
        Minus => Ok(XPathValue::Number(left.to_number() - right.to_number())),
        Multiply => Ok(XPathValue::Number(left.to_number() * right.to_number())),
        Divide => Ok(XPathValue::Number(left.to_number() / right.to_number())),
        Modulo => Ok(XPathValue::Number(left.to_number() % right.to_number())),
        Union => match (left, right) {
            (XPathValue::NodeSet(mut l), XPathValue::NodeSet(r)) => {
                l.extend(r);
                Ok(XPathValue::NodeSet(order::sort_document_order(l)))
            }
            (l, r) => Err(XPathError::TypeError(format!(
                "union operands must be node-sets, got {} and {}",
                l.type_name(),
                r.type_name()
            ))),
        },
    }
}

/// Compares two values. A node-set comparison is true when some member satisfies it.
pub fn compare<N: NodeNavigator>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let right_values: Vec<XPathValue<N>> = r.iter().map(string_of).collect();
            l.iter().any(|node| {
                let value = string_of(node);
                right_values
                    .iter()
                    .any(|other| compare_atomic(op, &value, other))
            })
        }
        (XPathValue::NodeSet(_), XPathValue::Boolean(_))
        | (XPathValue::Boolean(_), XPathValue::NodeSet(_)) => {
            compare_atomic(
                op,
                &XPathValue::<N>::Boolean(left.to_bool()),
                &XPathValue::<N>::Boolean(right.to_bool()),
            )
        }
        (XPathValue::NodeSet(nodes), other) => nodes
            .iter()
            .any(|node| compare_atomic(op, &string_of(node), other)),
        (other, XPathValue::NodeSet(nodes)) => nodes
            .iter()
            .any(|node| compare_atomic(op, other, &string_of(node))),
        _ => compare_atomic(op, left, right),
    }
}

fn string_of<N: NodeNavigator>(node: &N) -> XPathValue<N> {
    XPathValue::String(node.value())
}

fn compare_atomic<N: NodeNavigator>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    use BinaryOperator::*;
    match op {
        Equals | NotEquals => {
            let equal = if left.is_boolean() || right.is_boolean() {
                left.to_bool() == right.to_bool()
            } else if left.is_number() || right.is_number() {
                left.to_number() == right.to_number()
            } else {
                left.to_string() == right.to_string()
            };
            if op == Equals { equal } else { !equal }
        }
        _ => {
            let (l, r) = (left.to_number(), right.to_number());
            match op {
                LessThan => l < r,
                LessThanOrEqual => l <= r,
                GreaterThan => l > r,
                _ => l >= r,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::tests::{MockNavigator, create_test_tree};

    type V<'a> = XPathValue<MockNavigator<'a>>;

    #[test]
    fn test_arithmetic() {
        let r = evaluate::<MockNavigator>(
            BinaryOperator::Modulo,
            XPathValue::Number(7.0),
            XPathValue::Number(3.0),
        )
        .unwrap();
        assert_eq!(r.to_number(), 1.0);
        let r = evaluate::<MockNavigator>(
            BinaryOperator::Divide,
            XPathValue::Number(1.0),
            XPathValue::Number(0.0),
        )
        .unwrap();
        assert_eq!(r.to_number(), f64::INFINITY);
        let r = evaluate::<MockNavigator>(
            BinaryOperator::Plus,
            XPathValue::String(" 2 ".into()),
            XPathValue::Boolean(true),
        )
        .unwrap();
        assert_eq!(r.to_number(), 3.0);
    }

    #[test]
    fn test_atomic_equality_coercion() {
        let eq = |l: V, r: V| compare(BinaryOperator::Equals, &l, &r);
        assert!(eq(XPathValue::Number(1.0), XPathValue::String("1".into())));
        assert!(eq(XPathValue::Boolean(true), XPathValue::String("x".into())));
        assert!(!eq(XPathValue::String("a".into()), XPathValue::String("b".into())));
        assert!(!eq(XPathValue::Number(f64::NAN), XPathValue::Number(f64::NAN)));
        assert!(compare::<MockNavigator>(
            BinaryOperator::NotEquals,
            &XPathValue::Number(f64::NAN),
            &XPathValue::Number(f64::NAN)
        ));
    }

    #[test]
    fn test_node_set_comparisons_are_existential() {
        let tree = create_test_tree();
        let mut first = MockNavigator::new(&tree);
        assert!(first.move_to_child());
        let mut second = first.clone();
        assert!(second.move_to_next());
        assert!(second.move_to_next());
        let paras = XPathValue::NodeSet(vec![first, second]);

        let world = XPathValue::String("World".into());
        assert!(compare(BinaryOperator::Equals, &paras, &world));
        assert!(compare(BinaryOperator::NotEquals, &paras, &world));
        assert!(!compare(
            BinaryOperator::Equals,
            &paras,
            &XPathValue::String("Nope".into())
        ));

        let empty: V = XPathValue::NodeSet(vec![]);
        assert!(!compare(BinaryOperator::Equals, &empty, &world));
        assert!(!compare(BinaryOperator::NotEquals, &empty, &world));
        assert!(compare(
            BinaryOperator::Equals,
            &empty,
            &XPathValue::Boolean(false)
        ));
        assert!(compare(BinaryOperator::Equals, &paras, &paras));
    }

    #[test]
    fn test_union_requires_node_sets() {
        let err = evaluate::<MockNavigator>(
            BinaryOperator::Union,
            XPathValue::Number(1.0),
            XPathValue::NodeSet(vec![]),
        )
        .unwrap_err();
        assert!(matches!(err, XPathError::TypeError(_)));
    }

    #[test]
    fn test_union_is_in_document_order() {
        let tree = create_test_tree();
        let root = MockNavigator::new(&tree);
        let mut a = root.clone();
        assert!(a.move_to_child());
        let mut b = a.clone();
        assert!(b.move_to_next());
        let result = evaluate(
            BinaryOperator::Union,
            XPathValue::NodeSet(vec![b.clone(), a.clone()]),
            XPathValue::NodeSet(vec![a, root]),
        )
        .unwrap();
        let XPathValue::NodeSet(nodes) = result else {
            panic!("expected node-set");
        };
        let ids: Vec<usize> = nodes.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![0, 1, 5]);
    }
}
