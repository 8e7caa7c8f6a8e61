//! Package and module names from file path conventions.
//!
//! Rules are matched against the file path relative to the source root, first
//! match wins:
//!
//! 1. `packages/<package>/(declarations|addon|src)/<module>`
//! 2. `(declarations|addon|src)/<module>`, package named after the source root
//! 3. anything else: package named after the source root, module is the whole path

use std::{
    path::{Component, Path},
    sync::LazyLock,
};

use regex::Regex;

static NAMING_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^packages/(?P<package>[^/]+)/(?:declarations|addon|src)/(?P<module>.+)$",
        r"^(?:declarations|addon|src)/(?P<module>.+)$",
    ]
    .into_iter()
    .map(|rule| Regex::new(rule).unwrap())
    .collect()
});

static MODULE_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.d\.ts|\.ts|\.gts|\.js|\.gjs)$").unwrap());

static INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/index$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleName {
    pub package: String,
    pub module: String,
}

/// Infer the package and module `file` belongs to.
pub fn infer_module_name(root: &Path, file: &Path) -> ModuleName {
    let relative = relative_path(root, file);
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    for rule in NAMING_RULES.iter() {
        if let Some(captures) = rule.captures(&relative) {
            let package = captures
                .name("package")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| root_name.clone());
            let module = captures
                .name("module")
                .map(|m| m.as_str())
                .unwrap_or(relative.as_str());
            return ModuleName {
                package,
                module: module_path(module),
            };
        }
    }

    ModuleName {
        package: root_name,
        module: module_path(&relative),
    }
}

/// `file` relative to `root`, `/`-separated.
pub fn relative_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn module_path(path: &str) -> String {
    let stripped = MODULE_SUFFIX_REGEX.replace(path, "");
    INDEX_REGEX.replace(&stripped, "").into_owned()
}
