use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{BUTTON, CliTest, component, stdout_json};

const LEGACY_JS: &str = r#"
import Component from '@glimmer/component';

/**
 * A component written in JavaScript
 */
export default class Legacy extends Component {
  Args = {};
}
"#;

#[test]
fn test_config_file_with_multiple_sources() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("ui/button.ts", BUTTON)?;
    test.write_file("legacy/legacy.js", LEGACY_JS)?;
    test.write_file(
        "docgen.json",
        r#"[
  { "root": "ui" },
  {
    "root": "legacy",
    "pattern": "**/*.js",
    "options": { "compilerOptions": { "allowJs": true } }
  }
]"#,
    )?;

    let docs = stdout_json(&test.command().args(["--config", "docgen.json"]).output()?)?;

    let names: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Button", "Legacy"]);
    assert_eq!(component(&docs, "Legacy")["package"], "legacy");
    assert_eq!(
        component(&docs, "Legacy")["description"],
        "A component written in JavaScript"
    );

    Ok(())
}

#[test]
fn test_js_needs_allow_js() -> Result<()> {
    let test = CliTest::with_file("legacy.js", LEGACY_JS)?;

    let without = stdout_json(&test.command().args(["--pattern", "**/*.js"]).output()?)?;
    let with = stdout_json(
        &test
            .command()
            .args(["--pattern", "**/*.js", "--allow-js"])
            .output()?,
    )?;

    assert_eq!(without.as_array().map(Vec::len), Some(0));
    assert_eq!(with.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[test]
fn test_tsconfig_with_extends() -> Result<()> {
    let test = CliTest::with_file("legacy.js", LEGACY_JS)?;
    test.write_file(
        "tsconfig.base.json",
        r#"{
  // shared options
  "compilerOptions": { "allowJs": true, },
}"#,
    )?;
    test.write_file("tsconfig.json", r#"{ "extends": "./tsconfig.base.json" }"#)?;

    let docs = stdout_json(
        &test
            .command()
            .args(["--pattern", "**/*.js", "--tsconfig", "tsconfig.json"])
            .output()?,
    )?;

    assert_eq!(docs[0]["name"], "Legacy");

    Ok(())
}

#[test]
fn test_broken_tsconfig_is_an_error() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;
    test.write_file("tsconfig.json", "{ \"compilerOptions\": ")?;

    let output = test.command().args(["--tsconfig", "tsconfig.json"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot load custom tsconfig.json"));
    assert!(stderr.contains("tsconfig.json"));

    Ok(())
}

#[test]
fn test_circular_tsconfig_is_an_error() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;
    test.write_file("a.json", r#"{ "extends": "./b.json" }"#)?;
    test.write_file("b.json", r#"{ "extends": "./a.json" }"#)?;

    let output = test.command().args(["--tsconfig", "a.json"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Circular extends detected"));

    Ok(())
}
