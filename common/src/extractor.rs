// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `ImportExtractor`: walks a parsed syntax tree and emits a normalized,
//! deduplicated list of import descriptors. Never rewrites names or
//! resolves aliases.

use ruff_python_ast::visitor::source_order::{walk_stmt, SourceOrderVisitor};
use ruff_python_ast::{ModModule, Stmt};
use ustr::Ustr;

use crate::descriptors::{ExtractedImports, FromImport, ImportTargets, PlainImport};

struct Walker {
    plain: Vec<PlainImport>,
    from: Vec<FromImport>,
}

impl Walker {
    fn new() -> Self {
        Walker {
            plain: Vec::new(),
            from: Vec::new(),
        }
    }

    fn push_plain(&mut self, package_name: Ustr) {
        let desc = PlainImport { package_name };
        if !self.plain.contains(&desc) {
            self.plain.push(desc);
        }
    }

    fn push_from(&mut self, package_name: Option<Ustr>, targets: ImportTargets, level: u32) {
        let desc = FromImport {
            package_name,
            targets,
            relative_level: level,
        };
        // FromImport has no derived Eq-friendly dedup key beyond structural
        // equality (ImportTargets derives PartialEq), so a linear scan is
        // fine: real files have a handful of import statements.
        if !self.from.iter().any(|d| *d == desc) {
            self.from.push(desc);
        }
    }
}

impl<'b> SourceOrderVisitor<'b> for Walker {
    fn visit_stmt(&mut self, stmt: &'b Stmt) {
        if let Some(imp) = stmt.as_import_stmt() {
            for alias in &imp.names {
                self.push_plain(Ustr::from(alias.name.as_str()));
            }
        } else if let Some(imp) = stmt.as_import_from_stmt() {
            let package_name = imp.module.as_ref().map(|m| Ustr::from(m.as_str()));
            let targets = if imp.names.len() == 1 && imp.names[0].name.as_str() == "*" {
                ImportTargets::Star
            } else {
                ImportTargets::Named(
                    imp.names
                        .iter()
                        .map(|alias| Ustr::from(alias.name.as_str()))
                        .collect(),
                )
            };
            self.push_from(package_name, targets, imp.level);
        } else {
            // Walk into nested bodies (function/class/if/try/with/for/while)
            // so imports guarded by runtime conditionals are still found;
            // no special-casing of `TYPE_CHECKING` blocks, matching how the
            // original tool's whole-tree `cstm.findall` search made no such
            // carve-out either.
            walk_stmt(self, stmt);
        }
    }

    fn visit_body(&mut self, body: &'b [Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }
}

/// `extract(tree) -> (Vec<Plain>, Vec<From>)`, deduplicated preserving
/// first occurrence.
pub fn extract(tree: &ModModule) -> ExtractedImports {
    let mut walker = Walker::new();
    walker.visit_body(&tree.body);
    ExtractedImports {
        plain: walker.plain,
        from: walker.from,
    }
}
