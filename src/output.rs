//! Rendering query results for the terminal or as JSON.

use astpath_core::{Evaluator, SyntaxNode, Value};
use astpath_xpath::engine::number_to_string;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// One line per result
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// A matched node, detached from the tree it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: String,
    /// First line of the node's source.
    pub text: String,
}

impl NodeRecord {
    pub fn new<N: SyntaxNode>(evaluator: &Evaluator<N>, node: &N) -> Self {
        Self {
            kind: node.kind().to_string(),
            pos: evaluator.position(node),
            text: node.text().lines().next().unwrap_or_default().to_string(),
        }
    }
}

/// The result of one expression over one package.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Report {
    Nodes(Vec<NodeRecord>),
    Attributes(Vec<String>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Report {
    pub fn new<N: SyntaxNode>(evaluator: &Evaluator<N>, value: Value<N>) -> Self {
        match value {
            Value::Nodes(nodes) => Report::Nodes(
                nodes
                    .iter()
                    .map(|node| NodeRecord::new(evaluator, node))
                    .collect(),
            ),
            Value::Attributes(values) => Report::Attributes(values),
            Value::String(s) => Report::String(s),
            Value::Number(n) => Report::Number(n),
            Value::Bool(b) => Report::Boolean(b),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub dir: PathBuf,
    pub result: Report,
}

pub fn write_text(reports: &[PackageReport], out: &mut impl Write) -> std::io::Result<()> {
    for report in reports {
        match &report.result {
            Report::Nodes(nodes) => {
                for node in nodes {
                    writeln!(out, "{}\t{}\t{}", node.kind, node.pos, node.text)?;
                }
            }
            Report::Attributes(values) => {
                for value in values {
                    writeln!(out, "{}", value)?;
                }
            }
            Report::String(s) => writeln!(out, "{}", s)?,
            Report::Number(n) => writeln!(out, "{}", number_to_string(*n))?,
            Report::Boolean(b) => writeln!(out, "{}", b)?,
        }
    }
    Ok(())
}

pub fn write_json(reports: &[PackageReport], out: &mut impl Write) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out).map_err(serde_json::Error::io)
}
