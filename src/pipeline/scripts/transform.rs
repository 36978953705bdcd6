//! ES module syntax → registry function body.
//!
//! Top-level `import`/`export` statements and calls to the free `require`
//! function are located with the oxc parser and rewritten by span into
//! plain script that talks to the bundle runtime (`__quire_require`,
//! `__quire_export`, ...). Everything else in the module is copied
//! through untouched.

use oxc::allocator::Allocator;
use oxc::ast::ast::{
    Argument, CallExpression, Declaration, ExportDefaultDeclarationKind, Expression,
    ImportDeclarationSpecifier, ModuleExportName, Program, Statement,
};
use oxc::ast_visit::{Visit, walk};
use oxc::parser::Parser;
use oxc::semantic::{IsGlobalReference, Scoping, SemanticBuilder};
use oxc::span::{GetSpan, SourceType};
use std::path::Path;

use super::ScriptError;

/// Name bound to an anonymous `export default` value.
const DEFAULT_LOCAL: &str = "__quire_default_export";

/// Import/export statements found in one module.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Span rewrites, in source order.
    pub edits: Vec<Edit>,
    /// Local exports as `(exported, local binding)`.
    pub exports: Vec<(String, String)>,
    /// Whether the module uses ES module syntax at all.
    pub is_esm: bool,
}

impl Analysis {
    fn push(&mut self, start: usize, end: usize, kind: EditKind) {
        self.edits.push(Edit { start, end, kind });
    }
}

#[derive(Debug)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub kind: EditKind,
}

#[derive(Debug, PartialEq, Eq)]
pub enum EditKind {
    /// `import ... from 'x'` or `import 'x'`.
    Import {
        specifier: String,
        bindings: Vec<Binding>,
    },
    /// `export { a as b } from 'x'` / `export * as ns from 'x'`
    /// as `(exported, imported)`; `imported == "*"` is the namespace.
    ReExport {
        specifier: String,
        names: Vec<(String, String)>,
    },
    /// `export * from 'x'`.
    ReExportAll { specifier: String },
    /// `require('x')` where `require` is not a local binding.
    Require { specifier: String },
    /// Replace the span with literal text.
    Replace(String),
}

impl EditKind {
    /// Module specifier this edit depends on, if any.
    pub fn specifier(&self) -> Option<&str> {
        match self {
            Self::Import { specifier, .. }
            | Self::ReExport { specifier, .. }
            | Self::ReExportAll { specifier }
            | Self::Require { specifier } => Some(specifier),
            Self::Replace(_) => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Binding {
    Default(String),
    Namespace(String),
    Named { imported: String, local: String },
}

/// Parse `source` and collect the rewrites its module syntax needs.
///
/// Sources are parsed as modules first; CommonJS code that is not valid
/// in strict mode is retried as a classic script.
pub fn analyze(source: &str, path: &Path) -> Result<Analysis, ScriptError> {
    let allocator = Allocator::default();
    let module = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if module.errors.is_empty() {
        let mut analysis = collect(&module.program.body);
        collect_requires(&module.program, &mut analysis);
        return Ok(analysis);
    }

    let script_type = SourceType::mjs().with_module(false);
    let script = Parser::new(&allocator, source, script_type).parse();
    if script.errors.is_empty() {
        let mut analysis = Analysis::default();
        collect_requires(&script.program, &mut analysis);
        return Ok(analysis);
    }

    let message = module
        .errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    Err(ScriptError::Syntax {
        path: path.to_path_buf(),
        message,
    })
}

fn collect(body: &[Statement<'_>]) -> Analysis {
    let mut out = Analysis::default();

    for stmt in body {
        let span = stmt.span();
        let (start, end) = (span.start as usize, span.end as usize);

        match stmt {
            Statement::ImportDeclaration(decl) => {
                let bindings = decl
                    .specifiers
                    .iter()
                    .flatten()
                    .map(|spec| match spec {
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            Binding::Default(s.local.name.to_string())
                        }
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            Binding::Namespace(s.local.name.to_string())
                        }
                        ImportDeclarationSpecifier::ImportSpecifier(s) => Binding::Named {
                            imported: export_name(&s.imported),
                            local: s.local.name.to_string(),
                        },
                    })
                    .collect();
                out.push(start, end, EditKind::Import {
                    specifier: decl.source.value.to_string(),
                    bindings,
                });
            }

            Statement::ExportAllDeclaration(decl) => {
                let specifier = decl.source.value.to_string();
                match &decl.exported {
                    Some(name) => out.push(
                        start,
                        end,
                        EditKind::ReExport {
                            specifier,
                            names: vec![(export_name(name), "*".to_string())],
                        },
                    ),
                    None => out.push(start, end, EditKind::ReExportAll { specifier }),
                }
            }

            Statement::ExportNamedDeclaration(decl) => {
                if let Some(source_lit) = &decl.source {
                    let names = decl
                        .specifiers
                        .iter()
                        .map(|s| (export_name(&s.exported), export_name(&s.local)))
                        .collect();
                    out.push(start, end, EditKind::ReExport {
                        specifier: source_lit.value.to_string(),
                        names,
                    });
                } else if let Some(declaration) = &decl.declaration {
                    // `export const a = 1` → `const a = 1`
                    let inner = declaration.span().start as usize;
                    out.push(start, inner, EditKind::Replace(String::new()));
                    for name in declared_names(declaration) {
                        out.exports.push((name.clone(), name));
                    }
                } else {
                    for s in &decl.specifiers {
                        out.exports
                            .push((export_name(&s.exported), export_name(&s.local)));
                    }
                    out.push(start, end, EditKind::Replace(String::new()));
                }
            }

            Statement::ExportDefaultDeclaration(decl) => {
                let named = match &decl.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        func.id.as_ref().map(|id| id.name.to_string())
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        class.id.as_ref().map(|id| id.name.to_string())
                    }
                    _ => None,
                };
                let inner = decl.declaration.span();
                match named {
                    Some(name) => {
                        out.push(start, inner.start as usize, EditKind::Replace(String::new()));
                        out.exports.push(("default".to_string(), name));
                    }
                    None => {
                        // keep the expression text in place so nested edits stay disjoint
                        out.push(
                            start,
                            inner.start as usize,
                            EditKind::Replace(format!("var {DEFAULT_LOCAL} = ")),
                        );
                        out.push(inner.end as usize, end, EditKind::Replace(";".to_string()));
                        out.exports
                            .push(("default".to_string(), DEFAULT_LOCAL.to_string()));
                    }
                }
            }

            _ => continue,
        }
        out.is_esm = true;
    }

    out
}

/// Add a `Require` edit for every `require('x')` call that reaches the
/// global `require`, then restore source order.
fn collect_requires<'a>(program: &'a Program<'a>, analysis: &mut Analysis) {
    let semantic = SemanticBuilder::new().build(program).semantic;
    let mut finder = RequireFinder {
        scoping: semantic.scoping(),
        found: Vec::new(),
    };
    finder.visit_program(program);

    analysis.edits.extend(finder.found);
    analysis.edits.sort_by_key(|edit| edit.start);
}

struct RequireFinder<'s> {
    scoping: &'s Scoping,
    found: Vec<Edit>,
}

impl<'a> Visit<'a> for RequireFinder<'_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Some(specifier) = required_specifier(call, self.scoping) {
            self.found.push(Edit {
                start: call.span.start as usize,
                end: call.span.end as usize,
                kind: EditKind::Require { specifier },
            });
            return;
        }
        walk::walk_call_expression(self, call);
    }
}

fn required_specifier(call: &CallExpression<'_>, scoping: &Scoping) -> Option<String> {
    let Expression::Identifier(callee) = &call.callee else {
        return None;
    };
    if call.optional || callee.name != "require" || !callee.is_global_reference(scoping) {
        return None;
    }
    if call.arguments.len() != 1 {
        return None;
    }
    match call.arguments.first() {
        Some(Argument::StringLiteral(lit)) => Some(lit.value.to_string()),
        _ => None,
    }
}

fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
    match declaration {
        Declaration::VariableDeclaration(var) => var
            .declarations
            .iter()
            .flat_map(|d| d.id.get_binding_identifiers())
            .map(|id| id.name.to_string())
            .collect(),
        Declaration::FunctionDeclaration(func) => {
            func.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::ClassDeclaration(class) => {
            class.id.iter().map(|id| id.name.to_string()).collect()
        }
        _ => Vec::new(),
    }
}

/// Property access that stays valid for non-identifier export names.
pub fn member(object: &str, name: &str) -> String {
    let is_ident = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", serde_json::Value::from(name))
    }
}
