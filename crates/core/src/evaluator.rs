//! The query facade: select nodes or evaluate expressions over a [`SourceSet`].

use crate::attributes;
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::inspector::Inspector;
use crate::navigator::Cursor;
use crate::root::{NodeRef, SourceSet};
use crate::syntax::SyntaxNode;
use astpath_xpath::{XPath, XPathValue};
use std::collections::HashMap;
use std::sync::Arc;

/// The result of [`Evaluator::eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<N> {
    Bool(bool),
    Number(f64),
    String(String),
    Nodes(Vec<N>),
    /// Values of matched attributes, when every match was an attribute.
    Attributes(Vec<String>),
}

/// Runs XPath expressions against a set of parsed files.
///
/// Every call starts from a fresh cursor on the synthetic root, so an `Evaluator` can
/// serve any number of queries, from any number of threads when `N` allows it.
pub struct Evaluator<N: SyntaxNode> {
    inspector: Arc<Inspector<N>>,
    files: Arc<SourceSet<N>>,
    config: QueryConfig,
}

impl<N: SyntaxNode> Evaluator<N> {
    /// Indexes `files` with a new [`Inspector`].
    pub fn new(files: SourceSet<N>) -> Self {
        let inspector = Arc::new(Inspector::new(files.roots()));
        Self::with_inspector(files, inspector)
    }

    /// Reuses an inspector built elsewhere over the same trees.
    pub fn with_inspector(files: SourceSet<N>, inspector: Arc<Inspector<N>>) -> Self {
        Self {
            inspector,
            files: Arc::new(files),
            config: QueryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn files(&self) -> &SourceSet<N> {
        &self.files
    }

    pub fn inspector(&self) -> &Arc<Inspector<N>> {
        &self.inspector
    }

    /// A new cursor on the synthetic root.
    pub fn cursor(&self) -> Cursor<N> {
        Cursor::new(
            Arc::clone(&self.inspector),
            Arc::clone(&self.files),
            &self.config,
        )
    }

    pub fn compile(expr: &str) -> Result<XPath, QueryError> {
        Ok(XPath::compile(expr)?)
    }

    /// Every node matching `expr`, in document order.
    pub fn select(&self, expr: &str) -> Result<Vec<N>, QueryError> {
        self.select_compiled(&Self::compile(expr)?)
    }

    /// The first node matching `expr`.
    pub fn select_one(&self, expr: &str) -> Result<Option<N>, QueryError> {
        Ok(self.select(expr)?.into_iter().next())
    }

    pub fn eval(&self, expr: &str) -> Result<Value<N>, QueryError> {
        self.eval_compiled(&Self::compile(expr)?)
    }

    pub fn select_compiled(&self, xpath: &XPath) -> Result<Vec<N>, QueryError> {
        let cursor = self.cursor();
        let variables = self.variables();
        let value = xpath.evaluate_with(&cursor, &variables)?;
        match value {
            XPathValue::NodeSet(matches) => Ok(self.unwrap_nodes(&matches)),
            other => Err(QueryError::Evaluate(astpath_xpath::XPathError::TypeError(
                format!("'{}' yields a {}, not a node-set", xpath, other.type_name()),
            ))),
        }
    }

    pub fn eval_compiled(&self, xpath: &XPath) -> Result<Value<N>, QueryError> {
        let cursor = self.cursor();
        let variables = self.variables();
        let value = xpath.evaluate_with(&cursor, &variables)?;
        Ok(match value {
            XPathValue::Boolean(b) => Value::Bool(b),
            XPathValue::Number(n) => Value::Number(n),
            XPathValue::String(s) => Value::String(s),
            XPathValue::NodeSet(matches) => {
                let values: Vec<String> = matches
                    .iter()
                    .filter_map(|m| m.attribute().map(|attr| attr.value.clone()))
                    .collect();
                if !matches.is_empty() && values.len() == matches.len() {
                    Value::Attributes(values)
                } else {
                    Value::Nodes(self.unwrap_nodes(&matches))
                }
            }
        })
    }

    /// The start of `node` rendered like its `pos` attribute.
    pub fn position(&self, node: &N) -> String {
        let file = self
            .inspector
            .root_of(node)
            .and_then(|i| self.inspector.roots().get(i))
            .and_then(|root| self.files.index_of(root))
            .and_then(|i| self.files.get(i));
        attributes::position(file.map(|file| file.path()), node.span().start)
    }

    fn variables(&self) -> HashMap<String, XPathValue<Cursor<N>>> {
        self.config
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), XPathValue::String(value.clone())))
            .collect()
    }

    /// Resolves matched positions to syntax nodes. The root stands for every file, and
    /// an attribute for the node that owns it.
    fn unwrap_nodes(&self, matches: &[Cursor<N>]) -> Vec<N> {
        let mut nodes = Vec::with_capacity(matches.len());
        for m in matches {
            match m.position() {
                NodeRef::Root => nodes.extend(self.files.roots()),
                _ => nodes.extend(m.node()),
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, MockNode};
    use crate::syntax::SyntaxNode;

    fn kinds(nodes: &[MockNode<'_>]) -> Vec<&'static str> {
        nodes.iter().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_select_body_statements() {
        let ast = fixture::single_return();
        let e = Evaluator::new(ast.source_set());
        let nodes = e.select("/*/Decls[1]/Body/*").unwrap();
        assert_eq!(kinds(&nodes), vec!["ReturnStmt"]);

        let nodes = e.select("/a.go/Decls[1]/Body/*").unwrap();
        assert_eq!(kinds(&nodes), vec!["ReturnStmt"]);
        assert_eq!(nodes[0], ast.find("ReturnStmt").unwrap());
    }

    #[test]
    fn test_select_list_positions() {
        let ast = fixture::assign_then_return();
        let e = Evaluator::new(ast.source_set());
        assert_eq!(
            kinds(&e.select("/*/Decls[1]/Body/List").unwrap()),
            vec!["AssignStmt", "ReturnStmt"]
        );
        assert_eq!(
            kinds(&e.select("/*/Decls[1]/Body/List[2]").unwrap()),
            vec!["ReturnStmt"]
        );
        assert_eq!(
            kinds(&e.select("//*[@type='ReturnStmt']/preceding-sibling::*").unwrap()),
            vec!["AssignStmt"]
        );
    }

    #[test]
    fn test_call_names_in_source_order() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        let value = e
            .eval("//*[@type='CallExpr']/Fun[@type='Ident']/@Name")
            .unwrap();
        assert_eq!(
            value,
            Value::Attributes(vec![
                "print".into(),
                "print".into(),
                "println".into(),
                "print".into()
            ])
        );
    }

    #[test]
    fn test_selected_attributes_resolve_to_owners() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        let nodes = e.select("//Fun/@Name").unwrap();
        assert_eq!(kinds(&nodes), vec!["Ident"; 4]);
    }

    #[test]
    fn test_root_expands_to_all_files() {
        let ast = fixture::two_files();
        let e = Evaluator::new(ast.source_set());
        assert_eq!(e.select("/").unwrap(), ast.roots());
        assert_eq!(e.select_one("/").unwrap(), Some(ast.root(0)));
        assert_eq!(e.select("/b.go").unwrap(), vec![ast.root(1)]);
    }

    #[test]
    fn test_file_scoped_query() {
        let ast = fixture::two_files();
        let e = Evaluator::new(ast.source_set());
        let names = |nodes: Vec<MockNode<'_>>| -> Vec<String> {
            nodes.iter().map(|n| n.text()).collect()
        };
        assert_eq!(names(e.select("/b.go/Decls/Name").unwrap()), vec!["g", "h"]);
        assert_eq!(names(e.select("//Decls/Name").unwrap()), vec!["f", "g", "h"]);
        assert_eq!(names(e.select("/*/Decls/Name").unwrap()), vec!["f", "g", "h"]);
    }

    #[test]
    fn test_scalar_results() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        assert_eq!(e.eval("count(//Fun)").unwrap(), Value::Number(4.0));
        assert_eq!(
            e.eval("boolean(//Fun[@Name='println'])").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            e.eval("string(//Fun[3]/@Name)").unwrap(),
            Value::String("".into())
        );
        assert_eq!(
            e.eval("string((//Fun)[3]/@Name)").unwrap(),
            Value::String("println".into())
        );
        assert_eq!(
            e.eval("string(/*/@pos)").unwrap(),
            Value::String("main.go:1:1".into())
        );
    }

    #[test]
    fn test_eval_empty_and_mixed_results() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        assert_eq!(e.eval("//Nothing").unwrap(), Value::Nodes(vec![]));
        let Value::Nodes(nodes) = e.eval("//Fun | //Fun/@Name").unwrap() else {
            panic!("mixed results are nodes");
        };
        assert_eq!(nodes.len(), 8);
        assert_eq!(e.select_one("//Nothing").unwrap(), None);
    }

    #[test]
    fn test_position_matches_pos_attribute() {
        let ast = fixture::two_files();
        let e = Evaluator::new(ast.source_set());
        let g = e.select_one("/b.go/Decls[1]").unwrap().unwrap();
        assert_eq!(
            e.eval("string(/b.go/Decls[1]/@pos)").unwrap(),
            Value::String(e.position(&g))
        );
        assert!(e.position(&g).starts_with("pkg/b.go:"));
        assert_eq!(e.position(&ast.root(1)), "pkg/b.go:1:1");
    }

    #[test]
    fn test_compile_errors() {
        let ast = fixture::single_return();
        let e = Evaluator::new(ast.source_set());
        let err = e.select("//*[").unwrap_err();
        assert!(matches!(err, QueryError::Compile(_)));
        assert!(err.to_string().starts_with("expression cannot compile: "));
        assert!(matches!(
            e.eval("nope()").unwrap_err(),
            QueryError::Compile(_)
        ));
        assert!(matches!(
            e.eval("count('x')").unwrap_err(),
            QueryError::Evaluate(_)
        ));
        assert!(matches!(
            e.select("1 + 1").unwrap_err(),
            QueryError::Evaluate(_)
        ));
    }

    #[test]
    fn test_variables_from_config() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set())
            .with_config(QueryConfig::default().with_variable("fn", "println"));
        let nodes = e.select("//Fun[@Name = $fn]").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text(), "println");
    }

    #[test]
    fn test_shared_inspector() {
        let ast = fixture::print_calls();
        let files = ast.source_set();
        let inspector = Arc::new(Inspector::new(files.roots()));
        let a = Evaluator::with_inspector(files.clone(), Arc::clone(&inspector));
        let b = Evaluator::with_inspector(files, Arc::clone(&inspector));
        assert!(Arc::ptr_eq(a.inspector(), b.inspector()));

        assert_eq!(a.select("//Fun").unwrap(), b.select("//Fun").unwrap());

        // Each evaluator owns its source set, so positions do not transfer.
        let mut ca = a.cursor();
        let cb = {
            let mut c = b.cursor();
            astpath_xpath::NodeNavigator::move_to_child(&mut c);
            c
        };
        assert!(!astpath_xpath::NodeNavigator::move_to(&mut ca, &cb));
        assert!(astpath_xpath::NodeNavigator::move_to(&mut ca, &a.cursor()));
    }

    #[test]
    fn test_source_attribute() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        assert_eq!(e.eval("//*[@src='print']/@Name").unwrap(), Value::Nodes(vec![]));

        let e = e.with_config(QueryConfig::default().with_source_attribute(true));
        assert_eq!(
            e.eval("//*[@src='print']/@Name").unwrap(),
            Value::Attributes(vec!["print".into(), "print".into(), "print".into()])
        );
        let calls = e.select("//*[@src='println(\"c\")'][@type='CallExpr']").unwrap();
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_compiled_expressions_are_reusable() {
        let ast = fixture::print_calls();
        let e = Evaluator::new(ast.source_set());
        let xpath = Evaluator::<MockNode<'_>>::compile("//Args").unwrap();
        let first = e.select_compiled(&xpath).unwrap();
        let second = Evaluator::new(ast.source_set()).select_compiled(&xpath).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(
            e.eval_compiled(&xpath).unwrap(),
            Value::Nodes(first.clone())
        );
    }

    #[test]
    fn test_queries_are_idempotent_and_shareable() {
        let ast = fixture::many_functions(16);
        let e = Evaluator::new(ast.source_set());
        let expected = e.select("//Decls/Name").unwrap();
        assert_eq!(expected.len(), 16);
        assert_eq!(e.select("//Decls/Name").unwrap(), expected);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| e.select("//Decls/Name").unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
