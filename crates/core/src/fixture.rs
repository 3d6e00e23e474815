//! An in-memory syntax tree for tests and benchmarks.
//!
//! [`MockAst`] is an arena of nodes shaped after Go's `go/ast` package: kinds like
//! `File`, `FuncDecl` and `CallExpr`, fields like `Decls`, `Body` and `Fun`, and token
//! positions exposed as integer scalars.

use crate::root::SourceSet;
use crate::syntax::{Field, Point, Scalar, Slot, Span, SyntaxNode};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

#[derive(Debug, Clone)]
struct MockData {
    kind: &'static str,
    span: Span,
    fields: Vec<Field<usize>>,
    text: String,
}

/// An arena of nodes plus the files whose roots live in it.
#[derive(Debug, Default)]
pub struct MockAst {
    nodes: Vec<MockData>,
    files: Vec<(PathBuf, usize)>,
}

impl MockAst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a node of `kind` beginning at `line`:`column`.
    pub fn node(&mut self, kind: &'static str, line: usize, column: usize) -> NodeBuilder<'_> {
        let start = Point::new(0, line, column);
        NodeBuilder {
            ast: self,
            data: MockData {
                kind,
                span: Span::new(start, start),
                fields: Vec::new(),
                text: kind.to_string(),
            },
        }
    }

    /// Registers `root` as the tree of the file at `path`.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, root: usize) {
        self.files.push((path.into(), root));
    }

    pub fn get(&self, id: usize) -> MockNode<'_> {
        MockNode { ast: self, id }
    }

    /// The root of the `i`-th file.
    pub fn root(&self, i: usize) -> MockNode<'_> {
        self.get(self.files[i].1)
    }

    pub fn roots(&self) -> Vec<MockNode<'_>> {
        self.files.iter().map(|&(_, id)| self.get(id)).collect()
    }

    pub fn source_set(&self) -> SourceSet<MockNode<'_>> {
        self.files
            .iter()
            .map(|(path, id)| (path.clone(), self.get(*id)))
            .collect()
    }

    /// Every node of `kind`, in pre-order across all files.
    pub fn find_all(&self, kind: &str) -> Vec<MockNode<'_>> {
        let mut found = Vec::new();
        let mut stack: Vec<MockNode<'_>> = self.roots().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                found.push(node);
            }
            let mut children = Vec::new();
            for field in node.fields() {
                match field.slot {
                    Slot::Node(child) => children.push(child),
                    Slot::Nodes(list) => children.extend(list),
                    Slot::Scalar(_) => {}
                }
            }
            stack.extend(children.into_iter().rev());
        }
        found
    }

    pub fn find(&self, kind: &str) -> Option<MockNode<'_>> {
        self.find_all(kind).into_iter().next()
    }
}

/// Accumulates the fields of one node. Children must be built before their parent.
pub struct NodeBuilder<'a> {
    ast: &'a mut MockAst,
    data: MockData,
}

impl NodeBuilder<'_> {
    pub fn child(mut self, name: &'static str, id: usize) -> Self {
        self.data.fields.push(Field::node(name, id));
        self
    }

    pub fn children(mut self, name: &'static str, ids: Vec<usize>) -> Self {
        self.data.fields.push(Field::nodes(name, ids));
        self
    }

    pub fn scalar(mut self, name: &'static str, value: impl Into<Scalar>) -> Self {
        self.data.fields.push(Field::scalar(name, value));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.data.text = text.into();
        self
    }

    pub fn end(mut self, line: usize, column: usize) -> Self {
        self.data.span.end = Point::new(0, line, column);
        self
    }

    pub fn build(self) -> usize {
        self.ast.nodes.push(self.data);
        self.ast.nodes.len() - 1
    }
}

/// A handle to one node of a [`MockAst`].
#[derive(Clone, Copy)]
pub struct MockNode<'a> {
    ast: &'a MockAst,
    id: usize,
}

impl MockNode<'_> {
    pub fn id(&self) -> usize {
        self.id
    }

    fn data(&self) -> &MockData {
        &self.ast.nodes[self.id]
    }
}

impl PartialEq for MockNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ast, other.ast) && self.id == other.id
    }
}

impl Eq for MockNode<'_> {}

impl Hash for MockNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.ast, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for MockNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.data().kind, self.id)
    }
}

impl SyntaxNode for MockNode<'_> {
    fn kind(&self) -> &'static str {
        self.data().kind
    }

    fn span(&self) -> Span {
        self.data().span
    }

    fn fields(&self) -> Vec<Field<Self>> {
        self.data()
            .fields
            .iter()
            .map(|field| Field {
                name: field.name,
                slot: match &field.slot {
                    Slot::Node(id) => Slot::Node(self.ast.get(*id)),
                    Slot::Nodes(ids) => Slot::Nodes(ids.iter().map(|id| self.ast.get(*id)).collect()),
                    Slot::Scalar(value) => Slot::Scalar(value.clone()),
                },
            })
            .collect()
    }

    fn text(&self) -> String {
        self.data().text.clone()
    }
}

// --- Go-shaped node helpers ---

fn ident(ast: &mut MockAst, name: &str, line: usize, column: usize, offset: i64) -> usize {
    ast.node("Ident", line, column)
        .scalar("NamePos", offset)
        .scalar("Name", name)
        .text(name)
        .build()
}

fn basic_lit(ast: &mut MockAst, kind: &str, value: &str, line: usize, column: usize) -> usize {
    ast.node("BasicLit", line, column)
        .scalar("ValuePos", column as i64)
        .scalar("Kind", kind)
        .scalar("Value", value)
        .text(value)
        .build()
}

fn func_type(ast: &mut MockAst, line: usize, column: usize) -> usize {
    let params = ast
        .node("FieldList", line, column + 6)
        .scalar("Opening", (column + 6) as i64)
        .children("List", vec![])
        .scalar("Closing", (column + 7) as i64)
        .build();
    ast.node("FuncType", line, column)
        .scalar("Func", column as i64)
        .child("Params", params)
        .text("func()")
        .build()
}

/// `func <name>() { <body> }` starting at `line`.
fn func_decl(ast: &mut MockAst, name: &str, line: usize, body: Vec<usize>, end_line: usize) -> usize {
    let name_id = ident(ast, name, line, 6, 5);
    let ty = func_type(ast, line, 1);
    let block = ast
        .node("BlockStmt", line, 10 + name.len())
        .scalar("Lbrace", (10 + name.len()) as i64)
        .children("List", body)
        .scalar("Rbrace", 1i64)
        .end(end_line, 2)
        .text("{...}")
        .build();
    ast.node("FuncDecl", line, 1)
        .child("Name", name_id)
        .child("Type", ty)
        .child("Body", block)
        .end(end_line, 2)
        .text(format!("func {}()", name))
        .build()
}

fn file(ast: &mut MockAst, package: &str, decls: Vec<usize>, end_line: usize) -> usize {
    let name = ident(ast, package, 1, 9, 8);
    ast.node("File", 1, 1)
        .scalar("Package", 0i64)
        .child("Name", name)
        .children("Decls", decls)
        .scalar("GoVersion", "")
        .end(end_line, 1)
        .text(format!("package {}", package))
        .build()
}

fn return_stmt(ast: &mut MockAst, line: usize) -> usize {
    ast.node("ReturnStmt", line, 2)
        .scalar("Return", 1i64)
        .children("Results", vec![])
        .text("return")
        .build()
}

fn call_stmt(ast: &mut MockAst, fun: &str, arg: &str, line: usize) -> usize {
    let fun_id = ident(ast, fun, line, 2, 1);
    let lit = basic_lit(ast, "STRING", &format!("{:?}", arg), line, 3 + fun.len());
    let call = ast
        .node("CallExpr", line, 2)
        .child("Fun", fun_id)
        .scalar("Lparen", (2 + fun.len()) as i64)
        .children("Args", vec![lit])
        .scalar("Ellipsis", 0i64)
        .scalar("Rparen", (6 + fun.len()) as i64)
        .text(format!("{}({:?})", fun, arg))
        .build();
    ast.node("ExprStmt", line, 2)
        .child("X", call)
        .text(format!("{}({:?})", fun, arg))
        .build()
}

// --- Ready-made sources ---

/// `a.go`:
/// ```go
/// package a
///
/// func f() {
///     return
/// }
/// ```
pub fn single_return() -> MockAst {
    let mut ast = MockAst::new();
    let ret = return_stmt(&mut ast, 4);
    let f = func_decl(&mut ast, "f", 3, vec![ret], 5);
    let root = file(&mut ast, "a", vec![f], 6);
    ast.add_file("a.go", root);
    ast
}

/// `a.go`:
/// ```go
/// package a
///
/// func f() {
///     x := 1
///     return
/// }
/// ```
pub fn assign_then_return() -> MockAst {
    let mut ast = MockAst::new();
    let x = ident(&mut ast, "x", 4, 2, 1);
    let one = basic_lit(&mut ast, "INT", "1", 4, 7);
    let assign = ast
        .node("AssignStmt", 4, 2)
        .children("Lhs", vec![x])
        .scalar("TokPos", 4i64)
        .scalar("Tok", ":=")
        .children("Rhs", vec![one])
        .text("x := 1")
        .build();
    let ret = return_stmt(&mut ast, 5);
    let f = func_decl(&mut ast, "f", 3, vec![assign, ret], 6);
    let root = file(&mut ast, "a", vec![f], 7);
    ast.add_file("a.go", root);
    ast
}

/// `main.go`:
/// ```go
/// package main
///
/// func main() {
///     print("a")
///     print("b")
///     println("c")
///     print("d")
/// }
/// ```
pub fn print_calls() -> MockAst {
    let mut ast = MockAst::new();
    let calls = [("print", "a"), ("print", "b"), ("println", "c"), ("print", "d")];
    let stmts = calls
        .iter()
        .enumerate()
        .map(|(i, (fun, arg))| call_stmt(&mut ast, fun, arg, 4 + i))
        .collect();
    let main = func_decl(&mut ast, "main", 3, stmts, 8);
    let root = file(&mut ast, "main", vec![main], 9);
    ast.add_file("main.go", root);
    ast
}

/// Two files of one package, `a.go` declaring `f` and `b.go` declaring `g` and `h`.
pub fn two_files() -> MockAst {
    let mut ast = MockAst::new();
    let f = func_decl(&mut ast, "f", 3, vec![], 3);
    let a = file(&mut ast, "a", vec![f], 4);
    let g = func_decl(&mut ast, "g", 3, vec![], 3);
    let h = func_decl(&mut ast, "h", 5, vec![], 5);
    let b = file(&mut ast, "a", vec![g, h], 6);
    ast.add_file("pkg/a.go", a);
    ast.add_file("pkg/b.go", b);
    ast
}

/// One file declaring `count` functions, each calling `print` twice and `println` once.
pub fn many_functions(count: usize) -> MockAst {
    let mut ast = MockAst::new();
    let mut decls = Vec::with_capacity(count);
    for i in 0..count {
        let line = 3 + i * 6;
        let stmts = vec![
            call_stmt(&mut ast, "print", "x", line + 1),
            call_stmt(&mut ast, "println", "y", line + 2),
            call_stmt(&mut ast, "print", "z", line + 3),
        ];
        decls.push(func_decl(&mut ast, "f", line, stmts, line + 4));
    }
    let root = file(&mut ast, "bench", decls, 3 + count * 6);
    ast.add_file("bench.go", root);
    ast
}
