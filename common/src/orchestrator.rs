// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `ProjectParser`: the BFS orchestrator tying every other component
//! together. Grounded in the newer, purely-syntactic variant of the
//! original tool's driver (`project_parser.py`), not the older
//! libcst/execution-based `project_importer.py`, which this
//! specification's non-goals explicitly reject.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use ustr::Ustr;

use crate::cache;
use crate::classifier;
use crate::error::CoreError;
use crate::extractor;
use crate::finder::ModuleFinder;
use crate::identifiers::{
    ModuleIdentifier, ModuleSpec, Origin, PackageType, KNOWN_PATHOLOGICAL_MODULES,
    TOP_SCRIPT_SENTINEL,
};
use crate::parser::parse_source_file;
use crate::project::{Module, Project};
use crate::resolver;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// `--shallow-std`: don't enqueue submodules of `StandardLib` packages.
    pub shallow_stdlib: bool,
}

pub fn parse_project(
    entry: &Path,
    cache_path: Option<&Path>,
    options: ParseOptions,
) -> Result<Project, CoreError> {
    if !entry.exists() {
        return Err(CoreError::EntryMissing(entry.to_path_buf()));
    }

    let mut project = Project::new();

    let entry_dir = entry
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let mut finder = ModuleFinder::new(vec![entry_dir]);
    if let Ok(pythonpath) = std::env::var("PYTHONPATH") {
        for dir in std::env::split_paths(&pythonpath) {
            finder.push_root(dir);
        }
    }

    // Loaded once as a side table, never bulk-merged into `project` up
    // front: a cache hit only ever replaces the parse+extract+resolve
    // pipeline for the one name being popped off the queue below, so that
    // unreachable cached modules never leak into the output graph and
    // reachable ones still go through ordinary queue expansion.
    let mut cache_table = cache_path.map(cache::load).unwrap_or_default();

    let entry_name = entry
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("main")
        .to_string();

    let mut queue: VecDeque<ModuleIdentifier> = VecDeque::new();

    let entry_id = ModuleIdentifier::resolved(
        entry_name.as_str(),
        ModuleSpec {
            origin: Origin::File(entry.to_path_buf()),
            canonical_name: Ustr::from(entry_name.as_str()),
        },
    );
    project.root_modules.push(entry_id.name);
    let entry_module = build_module(&finder, entry_id);
    install_module(&mut project, entry_module, options, &mut queue);

    while let Some(id) = queue.pop_front() {
        if project.has_module(&id.name) {
            continue;
        }
        let module = match cache_table.take(&id.name) {
            Some(cached) => cached,
            None => build_module(&finder, id),
        };
        install_module(&mut project, module, options, &mut queue);
    }

    Ok(project)
}

/// Classifies `module` into a Package, registers it into `project`, and
/// enqueues its submodules subject to the shallow-set policy. Shared by
/// both freshly-parsed modules and cache hits, since a cache hit still
/// has to participate in queue expansion exactly like any other module.
fn install_module(
    project: &mut Project,
    module: Module,
    options: ParseOptions,
    queue: &mut VecDeque<ModuleIdentifier>,
) {
    let name = module.name();
    let path = module.path.clone();
    let c = classifier::classify(project, name.as_str(), path.as_deref());

    let submodules: Vec<ModuleIdentifier> = module.submodules.iter().cloned().collect();
    project.insert_module(module, c.package_name, c.package_path, c.package_kind);

    let shallow = options.shallow_stdlib && c.package_kind == PackageType::StandardLib;
    if !shallow {
        for sub in submodules {
            queue.push_back(sub);
        }
    }
}

/// Builds a `Module` for `id`, running the state machine's LOCATED/PARSED
/// transitions and — unless the file is a special-cased or non-parsable
/// origin — resolving its imports in place.
fn build_module(finder: &ModuleFinder, id: ModuleIdentifier) -> Module {
    let path = id.spec.as_ref().and_then(|s| s.origin.as_path()).cloned();

    if id.name.as_str() == TOP_SCRIPT_SENTINEL {
        return Module::new(id, None);
    }
    if KNOWN_PATHOLOGICAL_MODULES.contains(&id.name.as_str()) {
        debug!("skipping known-pathological module {}", id.name);
        return Module::new(id, path);
    }

    let origin_parsable = id
        .spec
        .as_ref()
        .map(|s| s.origin.is_parsable())
        .unwrap_or(false);
    if !origin_parsable {
        return Module::new(id, path);
    }

    let file_path = path.clone().expect("parsable origin implies a path");
    let mut module = Module::new(id, path);
    match parse_source_file(&file_path) {
        Ok((_source, parsed)) => {
            let extracted = extractor::extract(parsed.syntax());
            module.tree = Some(parsed);
            resolver::resolve(finder, &mut module, &extracted);
        }
        Err(e) => {
            warn!("failed to parse {}: {}", file_path.display(), e);
        }
    }
    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn entry_missing_aborts() {
        let err = parse_project(Path::new("/nonexistent/main.py"), None, ParseOptions::default());
        assert!(matches!(err, Err(CoreError::EntryMissing(_))));
    }

    #[test]
    fn single_local_dependency() {
        let dir = tempdir().unwrap();
        write(dir.path(), "main.py", "from util import f\n");
        write(dir.path(), "util.py", "def f(): pass\n");

        let project = parse_project(&dir.path().join("main.py"), None, ParseOptions::default()).unwrap();
        assert!(project.has_module(&Ustr::from("main")));
        assert!(project.has_module(&Ustr::from("util")));
        let main = project.get_module(&Ustr::from("main")).unwrap();
        assert_eq!(main.submodules[0].name.as_str(), "util");
    }

    #[test]
    fn shallow_stdlib_still_adds_direct_edge() {
        let dir = tempdir().unwrap();
        write(dir.path(), "main.py", "import os\n");

        let opts = ParseOptions { shallow_stdlib: true };
        let project = parse_project(&dir.path().join("main.py"), None, opts).unwrap();
        assert!(project.has_module(&Ustr::from("os")));
        let main = project.get_module(&Ustr::from("main")).unwrap();
        assert_eq!(main.submodules[0].name.as_str(), "os");
    }

    #[test]
    fn package_grouping_by_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "main.py", "import os\n");
        let project = parse_project(
            &dir.path().join("main.py"),
            None,
            ParseOptions { shallow_stdlib: true },
        )
        .unwrap();
        assert!(project.has_package(&Ustr::from("stdlib")));
        let stdlib = project.get_package(&Ustr::from("stdlib")).unwrap();
        assert!(stdlib.modules.contains(&Ustr::from("os")));
    }

    #[test]
    fn cache_entries_unreachable_from_entry_do_not_leak_into_the_graph() {
        let dir = tempdir().unwrap();
        write(dir.path(), "main.py", "import os\n");
        let cache_path = dir.path().join("cache.json");
        fs::write(
            &cache_path,
            r#"{"version":"1.0","packages":{"stdlib":{
                "os":{"name":"os","path":null},
                "sys":{"name":"sys","path":null},
                "json":{"name":"json","path":null},
                "re":{"name":"re","path":null}
            }}}"#,
        )
        .unwrap();

        let project = parse_project(&dir.path().join("main.py"), Some(&cache_path), ParseOptions::default())
            .unwrap();

        assert!(project.has_module(&Ustr::from("main")));
        assert!(project.has_module(&Ustr::from("os")));
        assert!(!project.has_module(&Ustr::from("sys")));
        assert!(!project.has_module(&Ustr::from("json")));
        assert!(!project.has_module(&Ustr::from("re")));
        assert_eq!(project.modules.len(), 2);
    }
}
