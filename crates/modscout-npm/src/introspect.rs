//! Structural export extraction for JavaScript and TypeScript sources.
//!
//! Sources are parsed with tree-sitter's TypeScript grammar (a superset of
//! modern JavaScript). The scanner understands:
//! - ES module exports: declarations, `export default`, export clauses and
//!   `export * from` re-exports (followed up to a depth limit)
//! - ambient declarations in `.d.ts` files
//! - CommonJS: `module.exports = {...}`, `exports.x = ...`, `module.exports.x = ...`
//!
//! Every `import`, `require()` and re-export target is collected as well.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use modscout_core::{ExportDescriptor, ExportKind, ParameterInfo, StructuralScan};
use tree_sitter::{Node, Parser};

use crate::error::{NpmError, Result};
use crate::parser::resolve_relative_file;
use crate::statement::is_relative;

/// Grammar flavour selected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Script,
    Jsx,
    /// `.d.ts`: top-level ambient declarations are part of the surface.
    Declaration,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
            Self::Declaration
        } else if name.ends_with(".tsx") || name.ends_with(".jsx") {
            Self::Jsx
        } else {
            Self::Script
        }
    }
}

/// Exports and imports of a single source file.
#[derive(Debug, Default)]
pub struct FileScan {
    pub scan: StructuralScan,
    /// Relative specifiers of `export * from` statements, in source order.
    pub star_reexports: Vec<String>,
}

/// Scans `entry` and follows `export * from './x'` up to `max_depth` levels.
pub fn scan_module(entry: &Path, max_depth: usize) -> StructuralScan {
    let mut visited = HashSet::new();
    scan_recursive(entry, max_depth, &mut visited)
}

fn scan_recursive(path: &Path, depth: usize, visited: &mut HashSet<PathBuf>) -> StructuralScan {
    if !visited.insert(path.to_path_buf()) {
        return StructuralScan::default();
    }

    let file = match scan_file(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("structural scan failed: {e}");
            return StructuralScan::default();
        }
    };

    let mut scan = file.scan;
    if depth == 0 {
        return scan;
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    for specifier in file.star_reexports {
        let Some(target) = resolve_relative_file(dir, &specifier) else {
            tracing::debug!("unresolved re-export '{}' in {}", specifier, path.display());
            continue;
        };
        let nested = scan_recursive(&target, depth - 1, visited);
        scan.merge(StructuralScan {
            exports: nested.exports,
            imports: Vec::new(),
        });
    }
    scan
}

/// Reads and scans one file.
pub fn scan_file(path: &Path) -> Result<FileScan> {
    let source = std::fs::read_to_string(path)?;
    scan_source(&source, Dialect::from_path(path))
        .map_err(|e| NpmError::source_parse(path.display().to_string(), e.to_string()))
}

/// Scans source text.
pub fn scan_source(source: &str, dialect: Dialect) -> Result<FileScan> {
    let mut parser = Parser::new();
    let language = match dialect {
        Dialect::Jsx => tree_sitter_typescript::LANGUAGE_TSX,
        Dialect::Script | Dialect::Declaration => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
    };
    parser
        .set_language(&language.into())
        .map_err(|e| NpmError::source_parse("<grammar>", e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| NpmError::source_parse("<source>", "parser returned no tree"))?;

    let mut scanner = Scanner {
        src: source.as_bytes(),
        dialect,
        locals: HashMap::new(),
        out: FileScan::default(),
    };
    scanner.run(tree.root_node());
    Ok(scanner.out)
}

struct Scanner<'s> {
    src: &'s [u8],
    dialect: Dialect,
    /// Top-level declarations by name, for export clauses and CommonJS objects.
    locals: HashMap<String, ExportDescriptor>,
    out: FileScan,
}

impl Scanner<'_> {
    fn run(&mut self, root: Node<'_>) {
        let top_level: Vec<Node<'_>> = root.named_children(&mut root.walk()).collect();

        for node in &top_level {
            for descriptor in self.declared(*node) {
                self.locals.insert(descriptor.name.clone(), descriptor);
            }
        }

        for node in &top_level {
            match node.kind() {
                "export_statement" => self.export_statement(*node),
                "expression_statement" => self.commonjs_assignment(*node),
                "ambient_declaration" if self.dialect == Dialect::Declaration => {
                    for descriptor in self.declared(*node) {
                        self.out.scan.push_export(descriptor);
                    }
                }
                _ => {}
            }
        }

        self.collect_imports(root);
    }

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.src).unwrap_or_default()
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .filter(|s| !s.is_empty())
    }

    fn string_value(&self, node: Node<'_>) -> String {
        self.text(node)
            .trim_matches(|c| c == '\'' || c == '"' || c == '`')
            .to_string()
    }

    /// Descriptors introduced by a declaration node.
    fn declared(&self, node: Node<'_>) -> Vec<ExportDescriptor> {
        match node.kind() {
            "function_declaration"
            | "generator_function_declaration"
            | "function_signature" => self
                .field_text(node, "name")
                .map(|name| vec![self.function_descriptor(name, node)])
                .unwrap_or_default(),
            "class_declaration" | "abstract_class_declaration" => {
                self.named(node, ExportKind::Class)
            }
            "interface_declaration" => self.named(node, ExportKind::Interface),
            "type_alias_declaration" | "enum_declaration" => self.named(node, ExportKind::Type),
            "internal_module" => self.named(node, ExportKind::Namespace),
            "module" => {
                // `declare module "x" { ... }` augments another module
                match node.child_by_field_name("name") {
                    Some(name) if name.kind() == "identifier" => {
                        vec![ExportDescriptor::new(self.text(name), ExportKind::Namespace)]
                    }
                    _ => Vec::new(),
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let declarators: Vec<Node<'_>> = node
                    .named_children(&mut node.walk())
                    .filter(|n| n.kind() == "variable_declarator")
                    .collect();
                declarators
                    .into_iter()
                    .filter_map(|d| self.variable_descriptor(d))
                    .collect()
            }
            "ambient_declaration" => node
                .named_children(&mut node.walk())
                .flat_map(|child| self.declared(child))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn named(&self, node: Node<'_>, kind: ExportKind) -> Vec<ExportDescriptor> {
        self.field_text(node, "name")
            .map(|name| vec![ExportDescriptor::new(name, kind)])
            .unwrap_or_default()
    }

    fn variable_descriptor(&self, declarator: Node<'_>) -> Option<ExportDescriptor> {
        let name_node = declarator.child_by_field_name("name")?;
        if name_node.kind() != "identifier" {
            return None;
        }
        let name = self.text(name_node).to_string();

        if let Some(value) = declarator.child_by_field_name("value") {
            match value_kind(value) {
                ExportKind::Function => return Some(self.function_descriptor(name, value)),
                ExportKind::Class => return Some(ExportDescriptor::new(name, ExportKind::Class)),
                _ => {}
            }
        }

        let descriptor = ExportDescriptor::new(name.clone(), ExportKind::Constant);
        Some(match self.annotation(declarator, "type") {
            Some(ty) => descriptor.with_signature(format!("{name}: {ty}")),
            None => descriptor,
        })
    }

    /// Function descriptor from any node carrying `parameters`/`return_type`.
    fn function_descriptor(&self, name: String, node: Node<'_>) -> ExportDescriptor {
        let parameters = match node.child_by_field_name("parameters") {
            Some(params) => self.parameters(params),
            // `x => x + 1`
            None => node
                .child_by_field_name("parameter")
                .map(|p| vec![ParameterInfo::new(self.text(p), "", false)])
                .unwrap_or_default(),
        };
        let return_type = self.annotation(node, "return_type");
        ExportDescriptor::function(name, parameters, return_type)
    }

    /// Text of a type annotation field without its leading colon.
    fn annotation(&self, node: Node<'_>, field: &str) -> Option<String> {
        self.field_text(node, field).map(|text| {
            text.trim_start()
                .trim_start_matches(':')
                .trim()
                .to_string()
        })
    }

    fn parameters(&self, params: Node<'_>) -> Vec<ParameterInfo> {
        params
            .named_children(&mut params.walk())
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .filter_map(|p| {
                let pattern = p.child_by_field_name("pattern")?;
                let name = collapse_whitespace(self.text(pattern));
                if name == "this" {
                    return None;
                }
                let type_name = self.annotation(p, "type").unwrap_or_default();
                let optional = p.kind() == "optional_parameter"
                    || p.child_by_field_name("value").is_some();
                Some(ParameterInfo::new(name, type_name, optional))
            })
            .collect()
    }

    fn has_token(node: Node<'_>, token: &str) -> bool {
        node.children(&mut node.walk()).any(|c| c.kind() == token)
    }

    fn export_statement(&mut self, node: Node<'_>) {
        let source = node
            .child_by_field_name("source")
            .map(|s| self.string_value(s));
        let is_default = Self::has_token(node, "default");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            for mut descriptor in self.declared(declaration) {
                if is_default {
                    descriptor.name = "default".to_string();
                }
                self.out.scan.push_export(descriptor);
            }
            return;
        }

        if is_default {
            if let Some(value) = node.child_by_field_name("value") {
                let descriptor = self.default_value(value);
                self.out.scan.push_export(descriptor);
            }
            return;
        }

        let clause = node
            .named_children(&mut node.walk())
            .find(|c| matches!(c.kind(), "export_clause" | "namespace_export"));

        match (clause, source) {
            (Some(clause), source) if clause.kind() == "export_clause" => {
                let specifiers: Vec<Node<'_>> = clause
                    .named_children(&mut clause.walk())
                    .filter(|s| s.kind() == "export_specifier")
                    .collect();
                for specifier in specifiers {
                    let Some(local) = self.field_text(specifier, "name") else {
                        continue;
                    };
                    let exported = self.field_text(specifier, "alias").unwrap_or_else(|| local.clone());
                    let mut descriptor = if source.is_some() {
                        ExportDescriptor::new(exported.clone(), ExportKind::Constant)
                    } else {
                        self.locals
                            .get(&local)
                            .cloned()
                            .unwrap_or_else(|| ExportDescriptor::new(local, ExportKind::Constant))
                    };
                    descriptor.name = exported;
                    self.out.scan.push_export(descriptor);
                }
            }
            // `export * as ns from 'x'`
            (Some(clause), Some(_)) => {
                if let Some(name) = clause.named_children(&mut clause.walk()).last() {
                    let name = self.string_value(name);
                    self.out
                        .scan
                        .push_export(ExportDescriptor::new(name, ExportKind::Namespace));
                }
            }
            // `export * from 'x'`
            (None, Some(source)) if is_relative(&source) => {
                self.out.star_reexports.push(source);
            }
            _ => {}
        }
    }

    fn default_value(&self, value: Node<'_>) -> ExportDescriptor {
        if value.kind() == "identifier" {
            if let Some(local) = self.locals.get(self.text(value)) {
                let mut descriptor = local.clone();
                descriptor.name = "default".to_string();
                return descriptor;
            }
        }
        match value_kind(value) {
            ExportKind::Function => self.function_descriptor("default".to_string(), value),
            kind => ExportDescriptor::new("default", kind),
        }
    }

    /// `module.exports = ...`, `exports.x = ...`, `module.exports.x = ...`
    fn commonjs_assignment(&mut self, statement: Node<'_>) {
        let Some(assignment) = statement
            .named_children(&mut statement.walk())
            .find(|n| n.kind() == "assignment_expression")
        else {
            return;
        };
        let (Some(left), Some(right)) = (
            assignment.child_by_field_name("left"),
            assignment.child_by_field_name("right"),
        ) else {
            return;
        };

        let target = collapse_whitespace(self.text(left));
        if target == "module.exports" {
            self.module_exports_value(right);
        } else if let Some(name) = target
            .strip_prefix("module.exports.")
            .or_else(|| target.strip_prefix("exports."))
        {
            if is_identifier(name) {
                let descriptor = self.value_descriptor(name.to_string(), right);
                self.out.scan.push_export(descriptor);
            }
        }
    }

    fn module_exports_value(&mut self, value: Node<'_>) {
        match value.kind() {
            "object" => {
                let members: Vec<Node<'_>> = value.named_children(&mut value.walk()).collect();
                for member in members {
                    let descriptor = match member.kind() {
                        "pair" => {
                            let (Some(key), Some(val)) = (
                                member.child_by_field_name("key"),
                                member.child_by_field_name("value"),
                            ) else {
                                continue;
                            };
                            self.value_descriptor(self.string_value(key), val)
                        }
                        "shorthand_property_identifier" => {
                            let name = self.text(member).to_string();
                            self.locals
                                .get(&name)
                                .cloned()
                                .unwrap_or_else(|| ExportDescriptor::new(name, ExportKind::Constant))
                        }
                        "method_definition" => match self.field_text(member, "name") {
                            Some(name) => self.function_descriptor(name, member),
                            None => continue,
                        },
                        _ => continue,
                    };
                    self.out.scan.push_export(descriptor);
                }
            }
            "identifier" => {
                let name = self.text(value).to_string();
                let descriptor = self
                    .locals
                    .get(&name)
                    .cloned()
                    .unwrap_or_else(|| ExportDescriptor::new(name, ExportKind::Constant));
                self.out.scan.push_export(descriptor);
            }
            _ => {
                let name = self
                    .field_text(value, "name")
                    .unwrap_or_else(|| "default".to_string());
                let descriptor = self.value_descriptor(name, value);
                self.out.scan.push_export(descriptor);
            }
        }
    }

    fn value_descriptor(&self, name: String, value: Node<'_>) -> ExportDescriptor {
        if value.kind() == "identifier" {
            if let Some(local) = self.locals.get(self.text(value)) {
                let mut descriptor = local.clone();
                descriptor.name = name;
                return descriptor;
            }
        }
        match value_kind(value) {
            ExportKind::Function => self.function_descriptor(name, value),
            kind => ExportDescriptor::new(name, kind),
        }
    }

    fn collect_imports(&mut self, root: Node<'_>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" | "export_statement" | "import_require_clause" => {
                    if let Some(source) = node.child_by_field_name("source") {
                        let target = self.string_value(source);
                        self.out.scan.push_import(target);
                    }
                }
                "call_expression" => {
                    if let Some(target) = self.call_target(node) {
                        self.out.scan.push_import(target);
                    }
                }
                _ => {}
            }

            let children: Vec<Node<'_>> = node.named_children(&mut node.walk()).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    /// Specifier of `require('x')` or `import('x')`.
    fn call_target(&self, call: Node<'_>) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        let is_loader = function.kind() == "import"
            || (function.kind() == "identifier" && self.text(function) == "require");
        if !is_loader {
            return None;
        }
        let arguments = call.child_by_field_name("arguments")?;
        let first = arguments.named_children(&mut arguments.walk()).next()?;
        matches!(first.kind(), "string" | "template_string").then(|| self.string_value(first))
    }
}

fn value_kind(node: Node<'_>) -> ExportKind {
    match node.kind() {
        "arrow_function" | "function_expression" | "function" | "generator_function" => {
            ExportKind::Function
        }
        "class" => ExportKind::Class,
        "object" => ExportKind::Namespace,
        _ => ExportKind::Constant,
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
