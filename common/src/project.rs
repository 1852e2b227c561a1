// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! The `Project` aggregate: `Module`, `Package`, and the maps that tie them
//! together. All mutation is confined to `ProjectParser`'s driver; everything
//! downstream (the graph builder, the serializer) only ever sees `&Project`.

use indexmap::{IndexMap, IndexSet};
use ruff_python_ast::ModModule;
use ruff_python_parser::Parsed;
use std::path::PathBuf;
use ustr::Ustr;

use crate::identifiers::{ModuleIdentifier, PackageType};

pub struct Module {
    pub id: ModuleIdentifier,
    pub path: Option<PathBuf>,
    pub tree: Option<Parsed<ModModule>>,
    pub submodules: IndexSet<ModuleIdentifier>,
}

impl Module {
    pub fn new(id: ModuleIdentifier, path: Option<PathBuf>) -> Self {
        Module {
            id,
            path,
            tree: None,
            submodules: IndexSet::new(),
        }
    }

    pub fn name(&self) -> Ustr {
        self.id.name
    }

    pub fn add_submodule(&mut self, sub: ModuleIdentifier) {
        self.submodules.insert(sub);
    }
}

pub struct Package {
    pub name: Ustr,
    pub path: Option<PathBuf>,
    pub kind: PackageType,
    pub modules: IndexSet<Ustr>,
}

impl Package {
    pub fn new(name: Ustr, path: Option<PathBuf>, kind: PackageType) -> Self {
        Package {
            name,
            path,
            kind,
            modules: IndexSet::new(),
        }
    }
}

/// Top-level aggregate. Invariants (enforced by construction, not checked
/// at runtime, since `ProjectParser` is the sole writer):
/// - (I1) every name in `root_modules` is a key of `modules`.
/// - (I2) every submodule name referenced by any `Module` is present as a
///   key in `modules` once parsing completes (it may be an unresolved stub).
/// - (I3) every module name in `modules` appears in exactly one
///   `Package.modules`.
/// - (I4) `modules` keys are unique — a second parse of the same name is a
///   no-op.
#[derive(Default)]
pub struct Project {
    pub root_modules: Vec<Ustr>,
    pub modules: IndexMap<Ustr, Module>,
    pub packages: IndexMap<Ustr, Package>,
}

impl Project {
    pub fn new() -> Self {
        Project::default()
    }

    pub fn has_module(&self, name: &Ustr) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get_module(&self, name: &Ustr) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn has_package(&self, name: &Ustr) -> bool {
        self.packages.contains_key(name)
    }

    pub fn get_package(&self, name: &Ustr) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Registers `module` into `Project.modules` and ties it to `package`,
    /// creating the `Package` record if this is the first member seen for
    /// it (I3's "first classified member decides the package" rule lives
    /// in `PackageClassifier`; this just performs the bookkeeping).
    pub fn insert_module(
        &mut self,
        module: Module,
        package_name: Ustr,
        package_path: Option<PathBuf>,
        package_kind: PackageType,
    ) {
        let name = module.name();
        self.modules.insert(name, module);
        let pkg = self
            .packages
            .entry(package_name)
            .or_insert_with(|| Package::new(package_name, package_path, package_kind));
        pkg.modules.insert(name);
    }
}
