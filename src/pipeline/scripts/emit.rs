//! Bundle emission: registry IIFE, then source map or minification.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use parcel_sourcemap::{OriginalLocation, SourceMap};
use std::path::Path;

use super::{ModuleGraph, ScriptError};
use crate::core::BuildEnv;
use crate::embed::scripts::{RUNTIME_JS, RuntimeVars};

/// Rendered bundle text.
pub struct Layout {
    pub code: String,
    /// Output line on which each module's code begins, in id order.
    pub starts: Vec<u32>,
}

/// Concatenate the graph into one unminified IIFE.
pub fn render(graph: &ModuleGraph) -> Layout {
    if graph.is_standalone() {
        let code = graph.modules[0].code.trim_end();
        return Layout {
            code: format!("(function () {{\n{code}\n}})();\n"),
            starts: vec![1],
        };
    }

    let template = RUNTIME_JS.content();
    let mut line = template
        .find("__QUIRE_MODULES__")
        .map_or(0, |at| line_count(&template[..at]));

    let mut starts = Vec::with_capacity(graph.modules.len());
    let mut factories = Vec::with_capacity(graph.modules.len());
    for module in &graph.modules {
        let name = module
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let factory = format!(
            "// {name}\nfunction (module, exports, __quire_require) {{\n{}\n}}",
            module.code.trim_end()
        );
        starts.push(line + 2);
        // `,\n` separator
        line += line_count(&factory) + 1;
        factories.push(factory);
    }

    let code = RUNTIME_JS.render(&RuntimeVars {
        modules: factories.join(",\n"),
    });
    Layout { code, starts }
}

fn line_count(text: &str) -> u32 {
    text.matches('\n').count() as u32
}

/// Line-level source map from the bundle back to every module file.
pub fn source_map(graph: &ModuleGraph, layout: &Layout) -> SourceMap {
    let mut map = SourceMap::new("/");
    for (module, &start) in graph.modules.iter().zip(&layout.starts) {
        let source = map.add_source(&module.path.to_string_lossy());
        let _ = map.set_source_content(source as usize, &module.source);

        let body_lines = line_count(module.code.trim_end()) as usize + 1;
        for (offset, &original_line) in module.lines.iter().take(body_lines).enumerate() {
            map.add_mapping(
                start + offset as u32,
                0,
                Some(OriginalLocation::new(original_line, 0, source, None)),
            );
        }
    }
    map
}

/// Apply the env-specific finishing step.
///
/// Development keeps the code as laid out and appends an inline source
/// map; production runs two compression passes, mangling names on the
/// second.
pub fn finish(
    graph: &ModuleGraph,
    layout: Layout,
    entry: &Path,
    env: BuildEnv,
) -> Result<String, ScriptError> {
    match env {
        BuildEnv::Development => {
            let url = source_map(graph, &layout)
                .to_data_url(None)
                .map_err(|e| ScriptError::SourceMap {
                    path: entry.to_path_buf(),
                    message: format!("{e:?}"),
                })?;
            let mut code = layout.code;
            code.push_str("//# sourceMappingURL=");
            code.push_str(&url);
            code.push('\n');
            Ok(code)
        }
        BuildEnv::Production => {
            let first = minify(&layout.code, entry, false)?;
            minify(&first, entry, true)
        }
    }
}

fn source_type() -> SourceType {
    SourceType::mjs().with_module(false)
}

fn syntax_error<E: std::fmt::Display>(entry: &Path, errors: &[E]) -> ScriptError {
    ScriptError::Syntax {
        path: entry.to_path_buf(),
        message: errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// One compression pass with dead-code elimination.
pub fn minify(code: &str, entry: &Path, mangle: bool) -> Result<String, ScriptError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, source_type()).parse();
    if !ret.errors.is_empty() {
        return Err(syntax_error(entry, &ret.errors));
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: mangle.then(MangleOptions::default),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    Ok(Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code)
}
