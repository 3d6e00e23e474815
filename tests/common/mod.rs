#![allow(dead_code)]

use astpath::AppError;
use astpath::cli::{self, Args};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const MAIN_GO: &str = r#"package main

import "fmt"

func main() {
	x := 1
	print("a")
	fmt.Println("b")
	if x > 0 {
		println("c")
	}
}

func helper(n int) int {
	return n * 2
}
"#;

pub const LIB_RS: &str = r#"pub fn area(w: u32, h: u32) -> u32 {
    w * h
}

fn unused() {}
"#;

/// A temporary directory of source files, removed on drop.
pub struct SourceDir {
    dir: TempDir,
}

impl SourceDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temporary directory"),
        }
    }

    pub fn with(self, name: &str, contents: &str) -> Self {
        self.write(name, contents);
        self
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write source file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Runs `astquery` in-process and returns what it printed.
pub fn astquery<I, S>(args: I) -> Result<String, AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    let args = Args::try_parse_from(
        std::iter::once(std::ffi::OsString::from("astquery"))
            .chain(args.into_iter().map(Into::into)),
    )
    .expect("valid arguments");
    let mut out = Vec::new();
    cli::run(&args, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}
