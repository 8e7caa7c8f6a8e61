use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PATTERN: &str = "**/*.ts";

/// Always ignored, on top of a source's own ignores.
pub const DEFAULT_IGNORE: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "node_modules/**",
    ".git/**",
    "dist/**",
];

/// One group of files documented together.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub root: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub options: SourceOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOptions {
    /// Project config to read compiler options from. Relative paths resolve
    /// against the source root. Takes precedence over `compiler_options`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<CompilerOptions>,
}

/// Compiler options. Only `allowJs` changes behavior; the rest is carried along.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub allow_js: bool,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

impl Source {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: default_pattern(),
            ignore: Vec::new(),
            options: SourceOptions::default(),
        }
    }

    /// Validate glob patterns.
    pub fn validate(&self) -> Result<()> {
        Pattern::new(&self.pattern)
            .with_context(|| format!("Invalid glob pattern in 'pattern': \"{}\"", self.pattern))?;
        for pattern in &self.ignore {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignore': \"{}\"", pattern))?;
        }
        Ok(())
    }

    /// Built-in ignores followed by the source's own.
    pub fn ignore_patterns(&self) -> Vec<String> {
        DEFAULT_IGNORE
            .iter()
            .map(|p| p.to_string())
            .chain(self.ignore.iter().cloned())
            .collect()
    }

    /// Effective compiler options of this source.
    pub fn compiler_options(&self) -> Result<CompilerOptions> {
        match &self.options.tsconfig_path {
            Some(path) => load_tsconfig(path, &self.root),
            None => Ok(self.options.compiler_options.clone().unwrap_or_default()),
        }
    }
}

/// Read a JSON array of sources.
pub fn load_sources(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let sources: Vec<Source> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    for source in &sources {
        source.validate()?;
    }
    Ok(sources)
}

// ============================================================
// tsconfig.json
// ============================================================

/// Load `compilerOptions` from a tsconfig file, following `extends`.
pub fn load_tsconfig(path: &Path, root: &Path) -> Result<CompilerOptions> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut chain = Vec::new();
    let options = load_tsconfig_chain(&path, &mut chain).with_context(|| {
        format!(
            "Cannot load custom tsconfig.json from provided path: {}",
            path.display()
        )
    })?;
    serde_json::from_value(Value::Object(options))
        .with_context(|| format!("Invalid compilerOptions in {}", path.display()))
}

fn load_tsconfig_chain(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Map<String, Value>> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    if chain.contains(&canonical) {
        let names: Vec<String> = chain
            .iter()
            .chain(std::iter::once(&canonical))
            .map(|p| p.display().to_string())
            .collect();
        bail!("Circular extends detected: {}", names.join(" -> "));
    }
    chain.push(canonical.clone());

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read {}", canonical.display()))?;
    let config: Value = serde_json::from_str(&strip_jsonc(&content))
        .with_context(|| format!("Failed to parse {}", canonical.display()))?;

    let base_dir = canonical.parent().unwrap_or(Path::new("."));
    let mut options = Map::new();
    for parent in extends_paths(&config, base_dir) {
        options.extend(load_tsconfig_chain(&parent, chain)?);
    }
    if let Some(Value::Object(own)) = config.get("compilerOptions") {
        options.extend(own.clone());
    }

    chain.pop();
    Ok(options)
}

/// Relative `extends` entries, resolved against the extending file's directory.
///
/// Package specifiers are skipped.
fn extends_paths(config: &Value, base_dir: &Path) -> Vec<PathBuf> {
    let specifiers: Vec<&str> = match config.get("extends") {
        Some(Value::String(single)) => vec![single.as_str()],
        Some(Value::Array(many)) => many.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    specifiers
        .into_iter()
        .filter(|s| s.starts_with('.') || Path::new(s).is_absolute())
        .map(|s| {
            let path = base_dir.join(s);
            if s.ends_with(".json") || path.exists() {
                return path;
            }
            // `./tsconfig.base` names `tsconfig.base.json`.
            let mut name = path.into_os_string();
            name.push(".json");
            PathBuf::from(name)
        })
        .collect()
}

/// Remove comments and trailing commas so tsconfig content parses as JSON.
fn strip_jsonc(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    // A comma is only written once the next token shows it is not trailing.
    let mut pending_comma = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => out.extend(chars.next()),
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            c if c.is_whitespace() => out.push(c),
            ',' => {
                if pending_comma {
                    out.push(',');
                }
                pending_comma = true;
            }
            '}' | ']' => {
                pending_comma = false;
                out.push(c);
            }
            _ => {
                if std::mem::take(&mut pending_comma) {
                    out.push(',');
                }
                in_string = c == '"';
                out.push(c);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_parse_source() {
        let json = r#"{
              "root": "./fixtures",
              "ignore": ["**/legacy/**"],
              "options": { "compilerOptions": { "allowJs": true, "strict": true } }
          }"#;
        let source: Source = serde_json::from_str(json).unwrap();

        assert_eq!(source.root, PathBuf::from("./fixtures"));
        assert_eq!(source.pattern, DEFAULT_PATTERN);
        assert_eq!(source.ignore, vec!["**/legacy/**"]);
        let options = source.compiler_options().unwrap();
        assert!(options.allow_js);
        assert_eq!(options.other.get("strict"), Some(&json!(true)));
    }

    #[test]
    fn test_default_ignores_are_additive() {
        let mut source = Source::new("fixtures");
        source.ignore = vec!["**/legacy/**".to_string()];

        let patterns = source.ignore_patterns();
        assert_eq!(patterns.len(), DEFAULT_IGNORE.len() + 1);
        assert_eq!(patterns[0], "**/node_modules/**");
        assert_eq!(patterns.last().map(String::as_str), Some("**/legacy/**"));
    }

    #[test]
    fn test_validate_invalid_pattern() {
        let mut source = Source::new("fixtures");
        source.ignore = vec!["[invalid".to_string()];

        let result = source.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignore"));
    }

    #[test]
    fn test_strip_jsonc() {
        let content = r#"{
  // line comment
  "compilerOptions": {
    /* block
       comment */
    "allowJs": true,
    "paths": { "a/*": ["./src/*"], },
    "url": "http://example.com//not-a-comment",
  },
}"#;
        let value: Value = serde_json::from_str(&strip_jsonc(content)).unwrap();
        assert_eq!(
            value,
            json!({
                "compilerOptions": {
                    "allowJs": true,
                    "paths": { "a/*": ["./src/*"] },
                    "url": "http://example.com//not-a-comment"
                }
            })
        );
    }

    #[test]
    fn test_tsconfig_relative_to_root() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "compilerOptions": { "allowJs": true, } }"#,
        )
        .unwrap();

        let mut source = Source::new(dir.path());
        source.options.tsconfig_path = Some(PathBuf::from("tsconfig.json"));
        source.options.compiler_options = Some(CompilerOptions::default());

        assert!(source.compiler_options().unwrap().allow_js);
    }

    #[test]
    fn test_tsconfig_extends_chain() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config").join("base.json"),
            r#"{ "compilerOptions": { "allowJs": true, "target": "es2015" } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "./config/base", "compilerOptions": { "target": "es2022" } }"#,
        )
        .unwrap();

        let options = load_tsconfig(Path::new("tsconfig.json"), dir.path()).unwrap();
        assert!(options.allow_js);
        assert_eq!(options.other.get("target"), Some(&json!("es2022")));
    }

    #[test]
    fn test_tsconfig_extends_dotted_name_without_json_suffix() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tsconfig.base.json"),
            r#"{ "compilerOptions": { "allowJs": true, "strict": true } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": ["./tsconfig.base"], "compilerOptions": { "strict": false } }"#,
        )
        .unwrap();

        let options = load_tsconfig(Path::new("tsconfig.json"), dir.path()).unwrap();
        assert!(options.allow_js);
        assert_eq!(options.other.get("strict"), Some(&json!(false)));
    }

    #[test]
    fn test_tsconfig_circular_extends() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = load_tsconfig(Path::new("a.json"), dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Circular extends detected"));
    }

    #[test]
    fn test_tsconfig_missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let err = load_tsconfig(Path::new("missing.json"), dir.path()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Cannot load custom tsconfig.json"));
        assert!(message.contains("missing.json"));
    }

    #[test]
    fn test_tsconfig_unparsable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{ not json").unwrap();

        let err = load_tsconfig(Path::new("tsconfig.json"), dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_load_sources() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docgen.json");
        fs::write(
            &path,
            r#"[{ "root": "a" }, { "root": "b", "pattern": "**/*.d.ts" }]"#,
        )
        .unwrap();

        let sources = load_sources(&path).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].pattern, "**/*.d.ts");
    }
}
