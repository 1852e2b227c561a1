// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `ProjectCache`: load/save a persisted snapshot of the standard
//! library's modules and submodules, so that repeat runs skip re-parsing
//! it. Grounded near 1:1 in the original tool's `project_cache.py`: same
//! version tag, same "stdlib package only" scope, same lazy submodule
//! resolution on load.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::identifiers::{ModuleIdentifier, ModuleSpec, Origin, PackageType, STDLIB_PACKAGE_NAME};
use crate::project::{Module, Project};

/// Matches the original tool's `ProjectCache.SAVE_VERSION`; kept stable so
/// hand-authored fixture caches remain loadable across reimplementations.
pub const CACHE_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct CachedModule {
    name: String,
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    submodules: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: String,
    packages: IndexMap<String, IndexMap<String, CachedModule>>,
}

/// Restored state: stub `Module`s (no syntax tree) plus their recorded
/// submodule identifiers, keyed by module name and not yet installed into
/// any `Project`. A side table consulted per-module by the orchestrator's
/// BFS, not bulk-merged up front — a cache hit replaces the
/// parse+extract+resolve pipeline for exactly one name at a time, and that
/// name's cached submodule identifiers still have to pass through queue
/// expansion themselves (SPEC_FULL §4.6).
#[derive(Default)]
pub struct LoadedCache {
    modules: HashMap<Ustr, Module>,
}

impl LoadedCache {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Removes and returns a cached module by name, if present. Taking by
    /// value rather than borrowing means a given cache entry is installed
    /// at most once, matching invariant I4.
    pub fn take(&mut self, name: &Ustr) -> Option<Module> {
        self.modules.remove(name)
    }
}

/// Refuses payloads without a matching version tag; logs and returns an
/// empty cache rather than erroring, per the `CacheLoadFailure` policy.
pub fn load(path: &Path) -> LoadedCache {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!("failed to read cache file {}: {}", path.display(), e);
            return LoadedCache::default();
        }
    };
    if raw.trim().is_empty() {
        return LoadedCache::default();
    }
    let parsed: CacheFile = match serde_json::from_str(&raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("malformed cache payload in {}: {}", path.display(), e);
            return LoadedCache::default();
        }
    };
    if parsed.version != CACHE_VERSION {
        warn!(
            "cache version mismatch in {} (found {}, expected {}); ignoring",
            path.display(),
            parsed.version,
            CACHE_VERSION
        );
        return LoadedCache::default();
    }

    let mut loaded = LoadedCache::default();
    for (_package_name, modules) in parsed.packages {
        for (module_name, info) in modules {
            let path = info.path.map(std::path::PathBuf::from);
            let spec = ModuleSpec {
                origin: match &path {
                    Some(p) => Origin::File(p.clone()),
                    None => Origin::Builtin,
                },
                canonical_name: Ustr::from(module_name.as_str()),
            };
            let name = Ustr::from(module_name.as_str());
            let mut module = Module::new(ModuleIdentifier::resolved(module_name.as_str(), spec), path);
            // Submodule Modules may not yet exist in any Project; they are
            // represented as pure (unresolved-spec) identifiers here and
            // resolved lazily when the orchestrator actually enqueues them.
            for sub in info.submodules {
                module.add_submodule(ModuleIdentifier::new(sub));
            }
            loaded.modules.insert(name, module);
        }
    }
    loaded
}

/// Persists only the standard library's modules — the one package class
/// whose membership is considered stable enough to cache by default.
pub fn save(path: &Path, project: &Project) -> std::io::Result<()> {
    let Some(stdlib) = project.get_package(&Ustr::from(STDLIB_PACKAGE_NAME)) else {
        return write_file(path, &CacheFile {
            version: CACHE_VERSION.to_string(),
            packages: IndexMap::new(),
        });
    };

    let mut modules = IndexMap::new();
    for name in &stdlib.modules {
        let Some(module) = project.get_module(name) else {
            continue;
        };
        modules.insert(
            name.to_string(),
            CachedModule {
                name: name.to_string(),
                path: module.path.as_ref().map(|p| p.display().to_string()),
                submodules: module.submodules.iter().map(|s| s.name.to_string()).collect(),
            },
        );
    }

    let mut packages = IndexMap::new();
    packages.insert(STDLIB_PACKAGE_NAME.to_string(), modules);
    write_file(
        path,
        &CacheFile {
            version: CACHE_VERSION.to_string(),
            packages,
        },
    )
}

fn write_file(path: &Path, cache: &CacheFile) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(cache)?;
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_cache_file_yields_empty_cache() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join("nope.json"));
        assert!(loaded.is_empty());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"version":"0.1","packages":{}}"#).unwrap();
        let loaded = load(&path);
        assert!(loaded.is_empty());
    }

    #[test]
    fn round_trip_save_and_load() {
        let dir = tempdir().unwrap();
        let mut project = Project::new();
        let os_id = ModuleIdentifier::resolved(
            "os",
            ModuleSpec {
                origin: Origin::Builtin,
                canonical_name: Ustr::from("os"),
            },
        );
        let module = Module::new(os_id, None);
        project.insert_module(module, Ustr::from(STDLIB_PACKAGE_NAME), None, PackageType::StandardLib);

        let cache_path = dir.path().join("cache.json");
        save(&cache_path, &project).unwrap();
        let mut loaded = load(&cache_path);
        assert!(!loaded.is_empty());
        assert!(loaded.take(&Ustr::from("os")).is_some());
        assert!(loaded.take(&Ustr::from("os")).is_none());
    }
}
