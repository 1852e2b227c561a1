// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `ImportResolver`: converts extracted import descriptors into resolved
//! submodule identifiers, applying the package-vs-module and star-import
//! policy. Grounded near-verbatim in the original tool's
//! `ImportHandler.resolve_module_imports`.

use log::warn;

use crate::descriptors::{ExtractedImports, ImportTargets};
use crate::finder::ModuleFinder;
use crate::identifiers::ModuleIdentifier;
use crate::project::Module;

pub fn resolve(finder: &ModuleFinder, module: &mut Module, imports: &ExtractedImports) {
    for plain in &imports.plain {
        let id = finder.find_top_level(plain.package_name.as_str());
        module.add_submodule(id);
    }

    for from in &imports.from {
        let base: ModuleIdentifier = if from.is_relative() {
            let name = from.package_name.as_deref();
            match finder.find_relative(name, from.relative_level, &module.id) {
                Some(id) => id,
                None => continue,
            }
        } else {
            match &from.package_name {
                Some(pkg) => finder.find_top_level(pkg.as_str()),
                None => {
                    warn!(
                        "empty import name for an absolute import in {}",
                        module.id.name
                    );
                    continue;
                }
            }
        };

        let star = matches!(from.targets, ImportTargets::Star);
        if !base.is_resolved() || !base.is_package_module() || star {
            module.add_submodule(base);
            continue;
        }

        let ImportTargets::Named(targets) = &from.targets else {
            unreachable!("star handled above");
        };
        for target in targets {
            let candidate = format!("{}.{}", base.name, target);
            match finder.try_find_top_level(&candidate) {
                Some(sub_id) => module.add_submodule(sub_id),
                None => module.add_submodule(base.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{FromImport, PlainImport};
    use crate::identifiers::Origin;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use ustr::Ustr;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn star_import_depends_on_package_only() {
        let dir = tempdir().unwrap();
        write(dir.path(), "pkg/__init__.py", "");
        let finder = ModuleFinder::new(vec![dir.path().to_path_buf()]);
        let main_id = ModuleIdentifier::resolved(
            "main",
            crate::identifiers::ModuleSpec {
                origin: Origin::File(dir.path().join("main.py")),
                canonical_name: Ustr::from("main"),
            },
        );
        let mut module = Module::new(main_id, Some(dir.path().join("main.py")));
        let imports = ExtractedImports {
            plain: vec![],
            from: vec![FromImport {
                package_name: Some(Ustr::from("pkg")),
                targets: ImportTargets::Star,
                relative_level: 0,
            }],
        };
        resolve(&finder, &mut module, &imports);
        assert_eq!(module.submodules.len(), 1);
        assert_eq!(module.submodules[0].name.as_str(), "pkg");
    }

    #[test]
    fn from_import_resolves_to_submodule_not_package() {
        let dir = tempdir().unwrap();
        write(dir.path(), "pkg/__init__.py", "");
        write(dir.path(), "pkg/impl.py", "");
        let finder = ModuleFinder::new(vec![dir.path().to_path_buf()]);
        let main_id = ModuleIdentifier::new("main");
        let mut module = Module::new(main_id, Some(dir.path().join("main.py")));
        let imports = ExtractedImports {
            plain: vec![],
            from: vec![FromImport {
                package_name: Some(Ustr::from("pkg")),
                targets: ImportTargets::Named(vec![Ustr::from("impl")]),
                relative_level: 0,
            }],
        };
        resolve(&finder, &mut module, &imports);
        assert_eq!(module.submodules[0].name.as_str(), "pkg.impl");
    }

    #[test]
    fn from_import_of_a_name_depends_on_package() {
        let dir = tempdir().unwrap();
        write(dir.path(), "pkg/__init__.py", "fixed_message = 'hi'\n");
        let finder = ModuleFinder::new(vec![dir.path().to_path_buf()]);
        let main_id = ModuleIdentifier::new("main");
        let mut module = Module::new(main_id, Some(dir.path().join("main.py")));
        let imports = ExtractedImports {
            plain: vec![],
            from: vec![FromImport {
                package_name: Some(Ustr::from("pkg")),
                targets: ImportTargets::Named(vec![Ustr::from("fixed_message")]),
                relative_level: 0,
            }],
        };
        resolve(&finder, &mut module, &imports);
        assert_eq!(module.submodules[0].name.as_str(), "pkg");
    }

    #[test]
    fn plain_import_is_appended_directly() {
        let dir = tempdir().unwrap();
        write(dir.path(), "util.py", "");
        let finder = ModuleFinder::new(vec![dir.path().to_path_buf()]);
        let mut module = Module::new(ModuleIdentifier::new("main"), Some(dir.path().join("main.py")));
        let imports = ExtractedImports {
            plain: vec![PlainImport {
                package_name: Ustr::from("util"),
            }],
            from: vec![],
        };
        resolve(&finder, &mut module, &imports);
        assert_eq!(module.submodules[0].name.as_str(), "util");
    }
}
