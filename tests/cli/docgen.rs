use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{BUTTON, CliTest, component, stdout_json};

#[test]
fn test_button_documentation() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;

    let docs = stdout_json(&test.command().output()?)?;
    let button = component(&docs, "Button");

    assert_eq!(button["package"], "fixtures");
    assert_eq!(button["module"], "button");
    assert_eq!(button["fileName"], "button.ts");
    assert_eq!(button["description"], "Buttons trigger actions");
    assert_eq!(
        button["tags"]["since"],
        json!({ "name": "since", "value": "1.0.0\n1.1.0" })
    );

    let args: Vec<&str> = button["Args"]
        .as_array()
        .unwrap()
        .iter()
        .map(|arg| arg["identifier"].as_str().unwrap())
        .collect();
    assert_eq!(args, vec!["isRenderless", "size", "type"]);

    let kind = &button["Args"][2];
    assert_eq!(kind["isRequired"], false);
    assert_eq!(kind["isInternal"], false);
    assert_eq!(kind["defaultValue"], "'button'");
    assert_eq!(
        kind["type"],
        json!({
            "type": "enum",
            "raw": "\"button\" | \"submit\" | \"reset\"",
            "items": ["'button'", "'submit'", "'reset'"]
        })
    );
    assert_eq!(button["Args"][1]["isRequired"], true);
    assert!(button["Args"][1].get("defaultValue").is_none());

    assert_eq!(button["Blocks"][0]["identifier"], "default");
    assert_eq!(button["Blocks"][0]["type"]["type"], "array");
    assert_eq!(
        button["Blocks"][0]["type"]["items"][0]["type"]["items"][0]["identifier"],
        "classNames"
    );

    assert_eq!(
        button["Element"],
        json!({
            "identifier": "Element",
            "type": { "type": "opaque", "raw": "HTMLButtonElement" },
            "description": "",
            "url": "https://developer.mozilla.org/en-US/docs/Web/API/HTMLButtonElement"
        })
    );

    Ok(())
}

#[test]
fn test_template_only_and_cross_file_args() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/shared.ts",
        r#"
export interface Sized {
  /**
   * @defaultValue 'md'
   */
  size?: 'sm' | 'md' | 'lg';
}
"#,
    )?;
    test.write_file(
        "src/components/spinner.d.ts",
        r#"
import type { TOC } from '@ember/component/template-only';
import type { Sized } from '../shared';

interface SpinnerArgs extends Sized {
  class?: string;
}

/**
 * Loading indicator
 */
declare const Spinner: TOC<{
  Element: SVGElement;
  Args: SpinnerArgs;
}>;
export default Spinner;
"#,
    )?;

    let docs = stdout_json(&test.command().output()?)?;
    let spinner = component(&docs, "Spinner");

    assert_eq!(spinner["module"], "components/spinner");
    assert_eq!(spinner["fileName"], "src/components/spinner.d.ts");
    assert_eq!(spinner["description"], "Loading indicator");
    assert_eq!(spinner["Args"][0]["identifier"], "class");
    assert_eq!(spinner["Args"][1]["identifier"], "size");
    assert_eq!(spinner["Args"][1]["defaultValue"], "'md'");
    assert_eq!(spinner["Blocks"], json!([]));

    Ok(())
}

#[test]
fn test_output_file_and_compact() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;

    let output = test
        .command()
        .args(["--output", "docs.json", "--compact"])
        .output()?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Documented 1 component in"));

    let content = test.read_file("docs.json")?;
    assert_eq!(content.lines().count(), 1);
    let docs: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(docs[0]["name"], "Button");

    Ok(())
}

#[test]
fn test_ignored_and_non_component_files() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;
    test.write_file("node_modules/pkg/index.ts", BUTTON)?;
    test.write_file("dist/button.ts", BUTTON)?;
    test.write_file("legacy/old.ts", BUTTON)?;
    test.write_file("utils.ts", "export const answer: number = 42;\n")?;

    let docs = stdout_json(&test.command().args(["--ignore", "legacy/**"]).output()?)?;

    assert_eq!(docs.as_array().map(Vec::len), Some(1));
    assert_eq!(docs[0]["fileName"], "button.ts");

    Ok(())
}

#[test]
fn test_parse_errors_are_warnings() -> Result<()> {
    let test = CliTest::with_file("button.ts", BUTTON)?;
    test.write_file("broken.ts", "export class {")?;

    let output = test.command().arg("--verbose").output()?;
    let docs = stdout_json(&output)?;

    assert_eq!(docs.as_array().map(Vec::len), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"));
    assert!(stderr.contains("broken.ts"));

    Ok(())
}

#[test]
fn test_empty_root() -> Result<()> {
    let test = CliTest::new()?;
    let docs = stdout_json(&test.command().output()?)?;
    assert_eq!(docs, json!([]));
    Ok(())
}

#[test]
fn test_missing_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().args(["--root", "does-not-exist"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("does-not-exist"));

    Ok(())
}
