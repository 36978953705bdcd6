//! Module graph construction.
//!
//! Modules get ids in discovery order (entry is `0`, then depth-first by
//! import order). Each module's text is rewritten so that every import,
//! re-export and `require('x')` call goes through the bundle registry.

use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::resolve::resolve;
use super::transform::{self, Binding, EditKind, member};
use super::{BundleOptions, ScriptError};
use crate::utils::path::normalize_path;

/// One bundled module.
#[derive(Debug, Clone)]
pub struct Module {
    pub path: PathBuf,
    /// File contents as read from disk.
    pub source: String,
    /// Body of the registry function.
    pub code: String,
    /// Zero-based source line for each line of `code`.
    pub lines: Vec<u32>,
    pub is_esm: bool,
}

/// Every module reachable from an entry.
#[derive(Debug)]
pub struct ModuleGraph {
    pub modules: Vec<Module>,
}

impl ModuleGraph {
    pub fn build(entry: &Path, options: &BundleOptions) -> Result<Self, ScriptError> {
        let define = Regex::new(&format!(r"\b{}\b", regex::escape(&options.define)))
            .map_err(|e| ScriptError::Syntax {
                path: entry.to_path_buf(),
                message: e.to_string(),
            })?;
        let mut builder = Builder {
            options,
            define,
            dev_value: if options.env.is_dev() { "true" } else { "false" },
            slots: Vec::new(),
            index: FxHashMap::default(),
        };
        builder.load(entry)?;

        let modules = builder.slots.into_iter().flatten().collect();
        Ok(Self { modules })
    }

    /// Whether the entry can be emitted without the registry runtime.
    pub fn is_standalone(&self) -> bool {
        matches!(self.modules.as_slice(), [only] if !only.is_esm)
    }
}

struct Builder<'a> {
    options: &'a BundleOptions,
    define: Regex,
    dev_value: &'static str,
    /// `None` while a module is being transformed (cycle in progress).
    slots: Vec<Option<Module>>,
    index: FxHashMap<PathBuf, usize>,
}

impl Builder<'_> {
    fn load(&mut self, path: &Path) -> Result<usize, ScriptError> {
        let path = normalize_path(path);
        if let Some(&id) = self.index.get(&path) {
            return Ok(id);
        }

        let id = self.slots.len();
        self.slots.push(None);
        self.index.insert(path.clone(), id);

        let source = fs::read_to_string(&path).map_err(|source| ScriptError::Io {
            path: path.clone(),
            source,
        })?;
        let defined = self.define.replace_all(&source, self.dev_value).into_owned();
        let mut module = self.transform(&path, &defined)?;
        module.source = source;
        self.slots[id] = Some(module);
        Ok(id)
    }

    fn dependency(&mut self, specifier: &str, importer: &Path) -> Result<usize, ScriptError> {
        let resolved = resolve(specifier, importer, &self.options.node_modules).ok_or_else(|| {
            ScriptError::Resolve {
                specifier: specifier.to_string(),
                importer: importer.to_path_buf(),
            }
        })?;
        self.load(&resolved)
    }

    fn transform(&mut self, path: &Path, source: &str) -> Result<Module, ScriptError> {
        let analysis = transform::analyze(source, path)?;

        let mut out = Output::with_capacity(source.len() + 256);
        if analysis.is_esm {
            out.insert("\"use strict\";\n");
            out.insert(&render_getters("exports", &analysis.exports));
        }

        let mut cursor = 0;
        for edit in &analysis.edits {
            out.copy(&source[cursor..edit.start]);
            let dep = match edit.kind.specifier() {
                Some(specifier) => Some(self.dependency(specifier, path)?),
                None => None,
            };
            out.replace(&source[edit.start..edit.end], &render_edit(&edit.kind, dep));
            cursor = edit.end;
        }
        out.copy(&source[cursor..]);

        Ok(Module {
            path: path.to_path_buf(),
            source: String::new(),
            code: out.code,
            lines: out.lines,
            is_esm: analysis.is_esm,
        })
    }

}

/// Rewritten module text that remembers where each line came from.
struct Output {
    code: String,
    lines: Vec<u32>,
    src_line: u32,
}

impl Output {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            code: String::with_capacity(capacity),
            lines: vec![0],
            src_line: 0,
        }
    }

    /// Generated text; its lines map to the current source line.
    fn insert(&mut self, text: &str) {
        for _ in text.matches('\n') {
            self.lines.push(self.src_line);
        }
        self.code.push_str(text);
    }

    /// Source text passed through unchanged.
    fn copy(&mut self, text: &str) {
        for _ in text.matches('\n') {
            self.src_line += 1;
            self.lines.push(self.src_line);
        }
        self.code.push_str(text);
    }

    /// Generated text standing in for `original`.
    fn replace(&mut self, original: &str, text: &str) {
        self.insert(text);
        self.src_line += original.matches('\n').count() as u32;
    }
}

fn dep_var(id: usize) -> String {
    format!("__quire_dep{id}")
}

fn render_edit(kind: &EditKind, dep: Option<usize>) -> String {
    let Some(id) = dep else {
        return match kind {
            EditKind::Replace(text) => text.clone(),
            _ => String::new(),
        };
    };
    if let EditKind::Require { .. } = kind {
        return format!("__quire_require({id})");
    }
    let var = dep_var(id);
    let mut out = format!("var {var} = __quire_require({id});");

    match kind {
        EditKind::Import { bindings, .. } => {
            for binding in bindings {
                let _ = match binding {
                    Binding::Default(local) => {
                        write!(out, " var {local} = __quire_default({var});")
                    }
                    Binding::Namespace(local) => write!(out, " var {local} = {var};"),
                    Binding::Named { imported, local } => {
                        write!(out, " var {local} = {};", member(&var, imported))
                    }
                };
            }
        }
        EditKind::ReExport { names, .. } => {
            let getters: Vec<_> = names
                .iter()
                .map(|(exported, imported)| {
                    let value = if imported == "*" {
                        var.clone()
                    } else {
                        member(&var, imported)
                    };
                    (exported.clone(), value)
                })
                .collect();
            out.push(' ');
            out.push_str(render_getters("exports", &getters).trim_end());
        }
        EditKind::ReExportAll { .. } => {
            let _ = write!(out, " __quire_reexport(exports, {var});");
        }
        EditKind::Replace(text) => out = text.clone(),
        EditKind::Require { .. } => {}
    }
    out
}

/// `__quire_export(exports, { name: function () { return local; } });`
fn render_getters(target: &str, exports: &[(String, String)]) -> String {
    let getters = exports
        .iter()
        .map(|(name, local)| {
            format!(
                "{}: function () {{ return {local}; }}",
                serde_json::Value::from(name.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("__quire_export({target}, {{ {getters} }});\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_import_bindings() {
        let kind = EditKind::Import {
            specifier: "hunt".into(),
            bindings: vec![
                Binding::Default("Hunt".into()),
                Binding::Named {
                    imported: "observe".into(),
                    local: "watch".into(),
                },
            ],
        };
        assert_eq!(
            render_edit(&kind, Some(2)),
            "var __quire_dep2 = __quire_require(2); var Hunt = __quire_default(__quire_dep2); var watch = __quire_dep2.observe;"
        );
    }

    #[test]
    fn test_render_getters() {
        let out = render_getters("exports", &[("default".into(), "__quire_default_export".into())]);
        assert_eq!(
            out,
            "__quire_export(exports, { \"default\": function () { return __quire_default_export; } });\n"
        );
    }

    #[test]
    fn test_output_tracks_source_lines() {
        let mut out = Output::with_capacity(64);
        out.insert("\"use strict\";\n");
        out.copy("a();\n");
        out.replace("import {\n  b\n} from './b';", "var b = 1;");
        out.copy("\nc();\n");
        assert_eq!(out.code, "\"use strict\";\na();\nvar b = 1;\nc();\n");
        // header, a(), import, c(), trailing line
        assert_eq!(out.lines, vec![0, 0, 1, 4, 5]);
    }

    #[test]
    fn test_render_require_keeps_call_expression() {
        let kind = EditKind::Require {
            specifier: "./a".into(),
        };
        assert_eq!(render_edit(&kind, Some(3)), "__quire_require(3)");
    }
}
