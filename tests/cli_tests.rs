mod common;

use common::{MAIN_GO, SourceDir, TestResult, astquery};
use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_astquery"))
}

#[test]
fn test_attribute_values_one_per_line() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let out = astquery([
        "//*[@type='function_declaration']/name/@text",
        dir.path().to_str().unwrap(),
    ])?;
    assert_eq!(out, "main\nhelper\n");
    Ok(())
}

#[test]
fn test_nodes_print_kind_position_and_first_line() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let file = dir.join("main.go");
    let out = astquery(["//*[@type='function_declaration']", file.to_str().unwrap()])?;
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!("function_declaration\t{}:5:1\tfunc main() {{", file.display())
    );
    assert!(lines[1].ends_with(":14:1\tfunc helper(n int) int {"));
    Ok(())
}

#[test]
fn test_root_lists_files() -> TestResult {
    let dir = SourceDir::new()
        .with("a.go", "package p\n")
        .with("b.go", "package p\n");
    let out = astquery(["/", dir.path().to_str().unwrap()])?;
    let kinds: Vec<_> = out
        .lines()
        .map(|line| line.split('\t').next().unwrap_or_default())
        .collect();
    assert_eq!(kinds, vec!["source_file", "source_file"]);
    Ok(())
}

#[test]
fn test_scalar_results() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let path = dir.path().to_str().unwrap();
    assert_eq!(astquery(["count(//*[@type='call_expression'])", path])?, "3\n");
    assert_eq!(astquery(["boolean(//*[@type='if_statement'])", path])?, "true\n");
    assert_eq!(
        astquery(["--var", "f=helper", "concat('fn ', $f)", path])?,
        "fn helper\n"
    );
    Ok(())
}

#[test]
fn test_source_attribute_flag() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let path = dir.path().to_str().unwrap();
    let expr = "//*[@type='call_expression'][@src='print(\"a\")']/function/@text";
    assert_eq!(astquery([expr, path])?, "");
    assert_eq!(astquery(["--src", expr, path])?, "print\n");
    assert_eq!(
        astquery(["--src", "count(//*[@src='x > 0'])", path])?,
        "1\n"
    );
    Ok(())
}

#[test]
fn test_json_output() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let out = astquery([
        "--format",
        "json",
        "//*[@type='return_statement']",
        dir.path().to_str().unwrap(),
    ])?;
    let value: serde_json::Value = serde_json::from_str(&out)?;
    let nodes = &value[0]["result"];
    assert_eq!(nodes["kind"], "nodes");
    assert_eq!(nodes["value"][0]["type"], "return_statement");
    assert_eq!(nodes["value"][0]["text"], "return n * 2");
    assert!(
        nodes["value"][0]["pos"]
            .as_str()
            .is_some_and(|pos| pos.ends_with("main.go:15:2"))
    );
    Ok(())
}

#[test]
fn test_eval_error_exits_with_status_1() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let output = binary().arg("//*[").arg(dir.path()).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.starts_with("eval: expression cannot compile"), "{stderr}");
    Ok(())
}

#[test]
fn test_load_error_exits_with_status_1() -> TestResult {
    let dir = SourceDir::new();
    let output = binary().arg("/").arg(dir.join("missing.go")).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)?.starts_with("load: "));

    let bad = dir.write("bad.go", "package main\n\nfunc (\n");
    let output = binary().arg("/").arg(&bad).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("syntax error"));
    Ok(())
}

#[test]
fn test_binary_prints_results() -> TestResult {
    let dir = SourceDir::new().with("main.go", MAIN_GO);
    let output = binary()
        .arg("//*[@type='call_expression']/function/@text")
        .arg(dir.path())
        .output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "print\nprintln\n");
    Ok(())
}
