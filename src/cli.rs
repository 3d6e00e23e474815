//! The `astquery` command line.

use crate::error::AppError;
use crate::output::{self, Format, PackageReport, Report};
use astpath_core::{Evaluator, QueryConfig, QueryError};
use astpath_xpath::XPath;
use astpath_treesitter::load_paths;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "astquery",
    version,
    about = "Query Go and Rust syntax trees with XPath",
    long_about = None
)]
pub struct Args {
    /// Expression evaluated against every package
    #[arg(default_value = "/")]
    pub expr: String,

    /// Files or directories to load, the current directory when omitted
    pub paths: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Bind `$NAME` to the string VALUE
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,

    /// Expose every node's source text as the `src` attribute
    #[arg(long = "src", default_value_t = false)]
    pub source_attribute: bool,

    /// Trace cursor movement at log level trace
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn parse_variable(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

impl Args {
    pub fn config(&self) -> QueryConfig {
        self.vars.iter().fold(
            QueryConfig::default()
                .with_trace(self.verbose)
                .with_source_attribute(self.source_attribute),
            |config, (name, value)| config.with_variable(name, value),
        )
    }
}

/// Loads every package, evaluates the expression against each, then writes all
/// results. Nothing is written when any package fails to load or evaluate.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), AppError> {
    let packages = load_paths(&args.paths)?;
    let xpath = XPath::compile(&args.expr).map_err(QueryError::from)?;
    let config = args.config();

    let mut reports = Vec::with_capacity(packages.len());
    for package in &packages {
        let evaluator = Evaluator::new(package.source_set()).with_config(config.clone());
        let value = evaluator.eval_compiled(&xpath)?;
        log::debug!("{}: '{}' evaluated", package.dir().display(), xpath);
        reports.push(PackageReport {
            dir: package.dir().to_path_buf(),
            result: Report::new(&evaluator, value),
        });
    }

    match args.format {
        Format::Text => output::write_text(&reports, out)?,
        Format::Json => output::write_json(&reports, out)?,
    }
    Ok(())
}
